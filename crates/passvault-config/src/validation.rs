// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! All failures are collected; validation does not stop at the first one.

use crate::diagnostic::ConfigError;
use crate::model::PassvaultConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// OWASP minimum Argon2id memory cost (19 MiB).
pub const MIN_KDF_MEMORY_COST: u32 = 19456;

pub fn validate_config(config: &PassvaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.server.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "server.log_level `{}` must be one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation("storage.database_path must not be empty"));
    }

    if let Some(key) = &config.encryption.key {
        let key = key.trim();
        if key.len() != 64 || !key.bytes().all(|b| b.is_ascii_hexdigit()) {
            // Never echo the key itself.
            errors.push(ConfigError::validation(format!(
                "encryption.key must be 64 hex characters (32 bytes), got {} characters",
                key.len()
            )));
        }
    }

    if config.secrets.max_secret_length == 0 {
        errors.push(ConfigError::validation("secrets.max_secret_length must be at least 1"));
    }

    if config.users.min_password_length == 0 {
        errors.push(ConfigError::validation("users.min_password_length must be at least 1"));
    }

    if config.users.kdf_memory_cost < MIN_KDF_MEMORY_COST {
        errors.push(ConfigError::validation(format!(
            "users.kdf_memory_cost must be at least {MIN_KDF_MEMORY_COST} (19 MiB), got {}",
            config.users.kdf_memory_cost
        )));
    }

    if config.users.kdf_iterations < 2 {
        errors.push(ConfigError::validation(format!(
            "users.kdf_iterations must be at least 2, got {}",
            config.users.kdf_iterations
        )));
    }

    if config.users.kdf_parallelism < 1 {
        errors.push(ConfigError::validation(format!(
            "users.kdf_parallelism must be at least 1, got {}",
            config.users.kdf_parallelism
        )));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &PassvaultConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&PassvaultConfig::default()).is_ok());
    }

    #[test]
    fn bad_log_level() {
        let mut config = PassvaultConfig::default();
        config.server.log_level = "loud".into();
        assert!(messages(&config)[0].contains("server.log_level"));
    }

    #[test]
    fn uppercase_log_level_is_accepted() {
        let mut config = PassvaultConfig::default();
        config.server.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn short_key_is_rejected_without_echo() {
        let mut config = PassvaultConfig::default();
        config.encryption.key = Some("deadbeef".into());
        let msgs = messages(&config);
        assert!(msgs[0].contains("encryption.key"));
        assert!(!msgs[0].contains("deadbeef"));
    }

    #[test]
    fn valid_key_passes() {
        let mut config = PassvaultConfig::default();
        config.encryption.key = Some("0f".repeat(32));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = PassvaultConfig::default();
        config.storage.database_path = "  ".into();
        config.secrets.max_secret_length = 0;
        config.users.kdf_memory_cost = 1024;
        config.users.kdf_iterations = 1;
        config.users.kdf_parallelism = 0;
        assert_eq!(messages(&config).len(), 5);
    }
}
