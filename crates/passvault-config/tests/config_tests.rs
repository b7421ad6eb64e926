// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading.

use figment::Jail;
use passvault_config::diagnostic::ConfigError;
use passvault_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn full_config_deserializes() {
    let toml = r#"
[server]
log_level = "debug"

[storage]
database_path = "/tmp/passvault-test.db"
wal_mode = false

[encryption]
key = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"

[secrets]
max_secret_length = 250
allow_anonymous_create = true

[users]
min_password_length = 12
kdf_memory_cost = 32768
kdf_iterations = 2
kdf_parallelism = 1
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/passvault-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.encryption.key.as_deref().map(str::len), Some(64));
    assert_eq!(config.secrets.max_secret_length, 250);
    assert!(config.secrets.allow_anonymous_create);
    assert_eq!(config.users.min_password_length, 12);
    assert_eq!(config.users.kdf_memory_cost, 32768);
    assert_eq!(config.users.kdf_iterations, 2);
    assert_eq!(config.users.kdf_parallelism, 1);
}

#[test]
fn empty_config_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults are valid");
    assert_eq!(config.secrets.max_secret_length, 100);
    assert!(!config.secrets.allow_anonymous_create);
    assert!(config.encryption.key.is_none());
}

#[test]
fn unknown_section_is_rejected() {
    let err = load_config_from_str("[vault]\nkey = \"x\"\n").unwrap_err();
    assert!(format!("{err}").contains("vault"), "got: {err}");
}

#[test]
fn typo_produces_suggestion() {
    let errors = load_and_validate_str("[secrets]\nallow_anonymous_creat = true\n").unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { suggestion: Some(s), .. } if s == "allow_anonymous_create"
    )));
}

#[test]
fn wrong_type_is_invalid_type() {
    let errors = load_and_validate_str("[secrets]\nmax_secret_length = \"lots\"\n").unwrap_err();
    assert!(
        errors.iter().any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

#[test]
fn validation_errors_surface_through_loader() {
    let errors = load_and_validate_str("[users]\nkdf_iterations = 1\n").unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_iterations"))
    ));
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            "[secrets]\nmax_secret_length = 50\n\n[storage]\ndatabase_path = \"file.db\"\n",
        )?;
        jail.set_env("PASSVAULT_SECRETS_MAX_SECRET_LENGTH", "75");
        jail.set_env("PASSVAULT_SERVER_LOG_LEVEL", "warn");

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.secrets.max_secret_length, 75);
        assert_eq!(config.server.log_level, "warn");
        assert_eq!(config.storage.database_path, "file.db");
        Ok(())
    });
}

#[test]
fn password_variable_is_not_configuration() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "")?;
        jail.set_env("PASSVAULT_PASSWORD", "hunter22");
        jail.set_env("PASSVAULT_USERS_MIN_PASSWORD_LENGTH", "10");

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.users.min_password_length, 10);
        Ok(())
    });
}

#[test]
fn encryption_key_from_env() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "")?;
        let key = "ab".repeat(32);
        jail.set_env("PASSVAULT_ENCRYPTION_KEY", &key);

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.encryption.key.as_deref(), Some(key.as_str()));
        Ok(())
    });
}
