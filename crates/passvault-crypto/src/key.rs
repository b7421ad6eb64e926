// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The 256-bit data encryption key.

use passvault_core::PassvaultError;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Key length in bytes for AES-256.
pub const KEY_LEN: usize = 32;

/// A 32-byte AES-256-GCM key, zeroed on drop.
///
/// Debug output intentionally omits the key bytes.
#[derive(Clone)]
pub struct EncryptionKey(Zeroizing<[u8; KEY_LEN]>);

impl EncryptionKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Parse a key from its 64-character hex form.
    pub fn from_hex(encoded: &str) -> Result<Self, PassvaultError> {
        let decoded = Zeroizing::new(
            hex::decode(encoded.trim())
                .map_err(|e| PassvaultError::Config(format!("encryption key is not valid hex: {e}")))?,
        );
        let bytes: [u8; KEY_LEN] = decoded.as_slice().try_into().map_err(|_| {
            PassvaultError::Config(format!(
                "encryption key must be {KEY_LEN} bytes ({} hex chars), got {} bytes",
                KEY_LEN * 2,
                decoded.len()
            ))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Generate a random key from the system CSPRNG.
    pub fn generate() -> Result<Self, PassvaultError> {
        let rng = SystemRandom::new();
        let mut key = [0u8; KEY_LEN];
        rng.fill(&mut key)
            .map_err(|_| PassvaultError::Crypto("failed to generate random key".to_string()))?;
        Ok(Self::from_bytes(key))
    }

    /// Hex encoding, for printing a freshly generated key once.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&self.0[..]))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EncryptionKey").field(&"[REDACTED]").finish()
    }
}
