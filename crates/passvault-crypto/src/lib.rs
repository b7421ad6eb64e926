// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic primitives for Passvault.
//!
//! - [`cipher`]: AES-256-GCM encryption of secret payloads, nonce carried in the blob
//! - [`key`]: the 256-bit data encryption key, loaded from hex config
//! - [`password`]: Argon2id hashing of user passwords

pub mod cipher;
pub mod key;
pub mod password;

pub use cipher::AesGcmEncryptor;
pub use key::EncryptionKey;
pub use password::{KdfParams, hash_password, verify_password};
