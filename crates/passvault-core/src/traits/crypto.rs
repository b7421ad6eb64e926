// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encryption-at-rest trait.

use crate::error::PassvaultError;

/// Symmetric encryption of secret payloads.
///
/// Implementations own the key, which is injected at construction. The
/// returned ciphertext must be self-contained: everything except the key that
/// is needed to decrypt it (nonce, tag) travels inside the blob.
pub trait Encryptor: Send + Sync {
    /// Encrypt a UTF-8 payload.
    fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, PassvaultError>;

    /// Decrypt a blob produced by [`Encryptor::encrypt`].
    ///
    /// Fails with [`PassvaultError::Crypto`] on a wrong key or any corruption;
    /// never returns partially decrypted data.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<String, PassvaultError>;
}
