// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM seal/open with the nonce carried inside the blob.
//!
//! Blob layout: `ciphertext || tag (16 bytes) || nonce (12 bytes)`.
//! Every call to [`seal`] draws a fresh 96-bit nonce from the system CSPRNG.

use passvault_core::{Encryptor, PassvaultError};
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

use crate::key::EncryptionKey;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// Smallest valid blob: an empty plaintext still carries a tag and a nonce.
pub const MIN_BLOB_LEN: usize = TAG_LEN + NONCE_LEN;

fn aead_key(key: &EncryptionKey) -> Result<LessSafeKey, PassvaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| PassvaultError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key`, returning a self-contained blob.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> Result<Vec<u8>, PassvaultError> {
    let aead = aead_key(key)?;

    let rng = SystemRandom::new();
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|_| PassvaultError::Crypto("failed to generate random nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let mut blob = Vec::with_capacity(plaintext.len() + MIN_BLOB_LEN);
    blob.extend_from_slice(plaintext);
    aead.seal_in_place_append_tag(nonce, Aad::empty(), &mut blob)
        .map_err(|_| PassvaultError::Crypto("AES-256-GCM encryption failed".to_string()))?;
    blob.extend_from_slice(&nonce_bytes);

    Ok(blob)
}

/// Decrypt a blob produced by [`seal`].
///
/// A wrong key, a truncated blob, or any flipped bit fails the tag check and
/// returns [`PassvaultError::Crypto`].
pub fn open(key: &EncryptionKey, blob: &[u8]) -> Result<Vec<u8>, PassvaultError> {
    if blob.len() < MIN_BLOB_LEN {
        return Err(PassvaultError::Crypto(format!(
            "ciphertext too short: {} bytes, need at least {MIN_BLOB_LEN}",
            blob.len()
        )));
    }
    let aead = aead_key(key)?;

    let (sealed, nonce_bytes) = blob.split_at(blob.len() - NONCE_LEN);
    let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
        .map_err(|_| PassvaultError::Crypto("malformed nonce".to_string()))?;

    let mut in_out = sealed.to_vec();
    let plaintext = aead
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| {
            PassvaultError::Crypto("AES-256-GCM decryption failed -- wrong key or corrupted data".to_string())
        })?;

    Ok(plaintext.to_vec())
}

/// [`Encryptor`] backed by AES-256-GCM with a configured key.
#[derive(Debug, Clone)]
pub struct AesGcmEncryptor {
    key: EncryptionKey,
}

impl AesGcmEncryptor {
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }
}

impl Encryptor for AesGcmEncryptor {
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, PassvaultError> {
        seal(&self.key, plaintext.as_bytes())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, PassvaultError> {
        let plaintext = open(&self.key, ciphertext)?;
        String::from_utf8(plaintext).map_err(|e| {
            debug!("decrypted payload is not UTF-8");
            PassvaultError::Crypto(format!("decrypted value is not valid UTF-8: {}", e.utf8_error()))
        })
    }
}
