// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account registration and password authentication.

use std::sync::Arc;

use passvault_config::model::UsersConfig;
use passvault_core::{PassvaultError, UserRecord, UserRepository};
use passvault_crypto::{KdfParams, hash_password, verify_password};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

/// Longest accepted username.
pub const MAX_USERNAME_LENGTH: usize = 256;

/// Password policy and hashing cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSettings {
    pub min_password_length: usize,
    pub kdf: KdfParams,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::from(&UsersConfig::default())
    }
}

impl From<&UsersConfig> for UserSettings {
    fn from(config: &UsersConfig) -> Self {
        Self {
            min_password_length: config.min_password_length,
            kdf: KdfParams {
                memory_cost: config.kdf_memory_cost,
                iterations: config.kdf_iterations,
                parallelism: config.kdf_parallelism,
            },
        }
    }
}

/// Usernames are 1 to 256 characters of ASCII letters, digits and `-._@+`.
pub fn validate_username(username: &str) -> Result<(), PassvaultError> {
    if username.is_empty() {
        return Err(PassvaultError::Validation("username must not be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(PassvaultError::Validation(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '@' | '+')))
    {
        return Err(PassvaultError::Validation(format!(
            "username contains invalid character `{bad}`; allowed: letters, digits and -._@+"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    settings: UserSettings,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, settings: UserSettings) -> Self {
        Self { users, settings }
    }

    /// Create an account. The password is stored only as an Argon2id hash.
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<(), PassvaultError> {
        validate_username(username)?;
        let length = password.expose_secret().chars().count();
        if length < self.settings.min_password_length {
            return Err(PassvaultError::Validation(format!(
                "password must be at least {} characters",
                self.settings.min_password_length
            )));
        }
        if self.users.find_user(username).await?.is_some() {
            return Err(PassvaultError::UserExists(username.to_string()));
        }

        let kdf = self.settings.kdf;
        let password = SecretString::from(password.expose_secret().to_owned());
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password(password.expose_secret(), &kdf))
                .await
                .map_err(|e| PassvaultError::Internal(format!("password hashing task failed: {e}")))??;

        self.users
            .insert_user(&UserRecord {
                username: username.to_string(),
                password_hash,
                created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            })
            .await?;
        info!(username, "user registered");
        Ok(())
    }

    /// Check a username and password, returning the canonical username.
    ///
    /// Unknown users and wrong passwords are the same
    /// [`PassvaultError::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<String, PassvaultError> {
        let Some(user) = self.users.find_user(username).await? else {
            debug!(username, "authentication failed: unknown user");
            return Err(PassvaultError::InvalidCredentials);
        };

        let password = SecretString::from(password.expose_secret().to_owned());
        let stored = user.password_hash.clone();
        let valid =
            tokio::task::spawn_blocking(move || verify_password(password.expose_secret(), &stored))
                .await
                .map_err(|e| PassvaultError::Internal(format!("password check task failed: {e}")))??;

        if !valid {
            warn!(username, "authentication failed: wrong password");
            return Err(PassvaultError::InvalidCredentials);
        }
        debug!(username, "user authenticated");
        Ok(user.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_usernames() {
        for name in ["alice", "Bob.Smith", "carol_99", "dave-o", "erin+test@example.com", "x"] {
            assert!(validate_username(name).is_ok(), "{name} should be valid");
        }
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH)).is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        for name in ["", "has space", "semi;colon", "slash/name", "ünïcode", "tab\tname"] {
            let err = validate_username(name).unwrap_err();
            assert!(matches!(err, PassvaultError::Validation(_)), "{name:?}");
        }
        assert!(validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn settings_follow_config() {
        let settings = UserSettings::default();
        assert_eq!(settings.min_password_length, 8);
        assert_eq!(settings.kdf, KdfParams::default());
    }
}
