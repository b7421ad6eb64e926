// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashing for the user directory.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! so verification reads the cost parameters back from the stored value.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use passvault_core::PassvaultError;
use ring::rand::{SecureRandom, SystemRandom};
use tracing::debug;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    fn hasher(&self) -> Result<Argon2<'static>, PassvaultError> {
        let params = Params::new(self.memory_cost, self.iterations, self.parallelism, None)
            .map_err(|e| PassvaultError::Crypto(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

fn generate_salt() -> Result<SaltString, PassvaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| PassvaultError::Crypto("failed to generate random salt".to_string()))?;
    SaltString::encode_b64(&salt)
        .map_err(|e| PassvaultError::Crypto(format!("failed to encode salt: {e}")))
}

/// Hash `password` with a fresh random salt, returning a PHC string.
pub fn hash_password(password: &str, params: &KdfParams) -> Result<String, PassvaultError> {
    let salt = generate_salt()?;
    let hash = params
        .hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PassvaultError::Crypto(format!("Argon2id hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch. A stored value that does not parse is a
/// [`PassvaultError::Crypto`] error, not a mismatch.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PassvaultError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| PassvaultError::Crypto(format!("stored password hash is malformed: {e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            debug!(error = %e, "password verification failed");
            Err(PassvaultError::Crypto(format!("password verification failed: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost for fast tests.
    const FAST: KdfParams = KdfParams {
        memory_cost: 32768,
        iterations: 2,
        parallelism: 1,
    };

    #[test]
    fn hash_is_phc_argon2id() {
        let hash = hash_password("correct horse", &FAST).unwrap();
        assert!(hash.starts_with("$argon2id$v=19$m=32768,t=2,p=1$"), "got: {hash}");
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hash = hash_password("correct horse", &FAST).unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("correct horse", &FAST).unwrap();
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("repeat", &FAST).unwrap();
        let b = hash_password("repeat", &FAST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_error() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, PassvaultError::Crypto(_)));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = KdfParams {
            memory_cost: 1,
            iterations: 0,
            parallelism: 0,
        };
        assert!(hash_password("pw", &params).is_err());
    }

    #[test]
    fn defaults_match_recommended_costs() {
        let params = KdfParams::default();
        assert_eq!(params.memory_cost, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
    }
}
