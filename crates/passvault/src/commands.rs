// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand handlers.

use std::sync::Arc;

use passvault_config::PassvaultConfig;
use passvault_core::{HealthStatus, PassvaultError, PluginAdapter, SecretId, StorageAdapter, Visibility};
use passvault_crypto::{AesGcmEncryptor, EncryptionKey};
use passvault_policy::VisibilityChange;
use passvault_service::{
    CreateSecret, SecretService, SecretSettings, UserService, UserSettings, VisibilityUpdated,
};
use passvault_storage::SqliteStorage;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

/// Process exit status for each failure class.
pub mod exit {
    pub const FAILURE: u8 = 1;
    pub const CONFIG: u8 = 2;
    pub const UNAUTHORIZED: u8 = 3;
    pub const NOT_FOUND: u8 = 4;
    pub const REJECTED: u8 = 5;
}

pub fn exit_code(err: &PassvaultError) -> u8 {
    match err {
        PassvaultError::Config(_) => exit::CONFIG,
        PassvaultError::InvalidCredentials | PassvaultError::AccessDenied => exit::UNAUTHORIZED,
        PassvaultError::NotFoundOrForbidden => exit::NOT_FOUND,
        e if e.is_client_error() => exit::REJECTED,
        _ => exit::FAILURE,
    }
}

/// Print a fresh hex-encoded encryption key.
pub fn keygen() -> Result<(), PassvaultError> {
    let key = EncryptionKey::generate()?;
    println!("{}", key.to_hex().as_str());
    Ok(())
}

pub fn encryptor(config: &PassvaultConfig) -> Result<Arc<AesGcmEncryptor>, PassvaultError> {
    let encoded = config.encryption.key.as_deref().ok_or_else(|| {
        PassvaultError::Config(
            "encryption.key is not set; generate one with `passvault keygen` and export PASSVAULT_ENCRYPTION_KEY"
                .to_string(),
        )
    })?;
    Ok(Arc::new(AesGcmEncryptor::new(EncryptionKey::from_hex(encoded)?)))
}

/// An opened database with the services built on top of it.
pub struct Vault {
    storage: Arc<SqliteStorage>,
    users: UserService,
    secrets: Option<SecretService>,
}

impl Vault {
    /// Open storage and build the user service. The secret service is only
    /// built when `with_secrets` is set, so account commands work without a
    /// configured key.
    pub async fn open(config: &PassvaultConfig, with_secrets: bool) -> Result<Self, PassvaultError> {
        let cipher = if with_secrets { Some(encryptor(config)?) } else { None };
        let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);
        let users = UserService::new(storage.clone(), UserSettings::from(&config.users));
        let secrets = cipher.map(|encryptor| {
            SecretService::new(
                storage.clone(),
                storage.clone(),
                encryptor,
                SecretSettings::from(&config.secrets),
            )
        });
        Ok(Self {
            storage,
            users,
            secrets,
        })
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn secrets(&self) -> Result<&SecretService, PassvaultError> {
        self.secrets
            .as_ref()
            .ok_or_else(|| PassvaultError::Internal("vault opened without secret service".to_string()))
    }

    /// Resolve the acting identity. `None` stays anonymous.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&SecretString>,
    ) -> Result<Option<String>, PassvaultError> {
        match (username, password) {
            (Some(username), Some(password)) => {
                self.users.authenticate(username, password).await.map(Some)
            }
            (Some(_), None) => Err(PassvaultError::InvalidCredentials),
            (None, _) => Ok(None),
        }
    }

    pub async fn close(self) -> Result<(), PassvaultError> {
        self.storage.close().await
    }
}

pub async fn register(
    vault: &Vault,
    username: &str,
    password: &SecretString,
) -> Result<(), PassvaultError> {
    vault.users().register(username, password).await?;
    println!("registered {username}");
    Ok(())
}

pub async fn create(
    vault: &Vault,
    actor: Option<&str>,
    visibility: Visibility,
    share: Vec<String>,
    plaintext: SecretString,
) -> Result<SecretId, PassvaultError> {
    let request = CreateSecret {
        plaintext,
        visibility,
        share_list: (!share.is_empty()).then_some(share),
    };
    let id = vault.secrets()?.create(actor, request).await?;
    println!("{id}");
    Ok(id)
}

pub async fn get(
    vault: &Vault,
    actor: Option<&str>,
    id: &SecretId,
) -> Result<SecretString, PassvaultError> {
    let revealed = vault.secrets()?.get(id, actor).await?;
    debug!(%id, visibility = %revealed.visibility, "printing secret");
    println!("{}", revealed.plaintext.expose_secret());
    Ok(revealed.plaintext)
}

/// Build the requested change. `--clear-shares` sends an explicit empty list;
/// no `--share` flags at all leaves the list unspecified.
pub fn visibility_change(visibility: Visibility, share: Vec<String>, clear_shares: bool) -> VisibilityChange {
    let share_list = if clear_shares {
        Some(Vec::new())
    } else if share.is_empty() {
        None
    } else {
        Some(share)
    };
    VisibilityChange {
        visibility,
        share_list,
    }
}

pub async fn update(
    vault: &Vault,
    actor: Option<&str>,
    id: &SecretId,
    change: VisibilityChange,
) -> Result<VisibilityUpdated, PassvaultError> {
    let updated = vault.secrets()?.update_visibility(id, actor, change).await?;
    if updated.share_list.is_empty() {
        println!("{}", updated.visibility);
    } else {
        println!("{} ({})", updated.visibility, updated.share_list.join(", "));
    }
    Ok(updated)
}

/// Verify the key parses and the database answers.
pub async fn check(config: &PassvaultConfig) -> Result<(), PassvaultError> {
    match encryptor(config) {
        Ok(_) => println!("encryption key: ok"),
        Err(e) => {
            warn!(error = %e, "encryption key unusable");
            return Err(e);
        }
    }

    let storage = SqliteStorage::open(config.storage.clone()).await?;
    let status = storage.health_check().await?;
    storage.close().await?;
    match status {
        HealthStatus::Healthy => {
            info!(path = %config.storage.database_path, "storage healthy");
            println!("storage: ok ({})", config.storage.database_path);
            Ok(())
        }
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            Err(PassvaultError::storage(format!("storage unhealthy: {reason}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passvault_core::DuplicateEntry;

    const PASSWORD: &str = "correct-horse-battery";

    fn config(dir: &tempfile::TempDir) -> PassvaultConfig {
        let mut config = PassvaultConfig::default();
        config.storage.database_path = dir.path().join("vault.db").display().to_string();
        config.encryption.key = Some("ab".repeat(32));
        config.users.kdf_memory_cost = 32768;
        config.users.kdf_iterations = 2;
        config.users.kdf_parallelism = 1;
        config
    }

    fn password() -> SecretString {
        SecretString::from(PASSWORD.to_string())
    }

    #[test]
    fn exit_codes_by_failure_class() {
        assert_eq!(exit_code(&PassvaultError::Config("x".into())), exit::CONFIG);
        assert_eq!(exit_code(&PassvaultError::InvalidCredentials), exit::UNAUTHORIZED);
        assert_eq!(exit_code(&PassvaultError::AccessDenied), exit::UNAUTHORIZED);
        assert_eq!(exit_code(&PassvaultError::NotFoundOrForbidden), exit::NOT_FOUND);
        assert_eq!(exit_code(&PassvaultError::ShareListRequired), exit::REJECTED);
        assert_eq!(
            exit_code(&PassvaultError::DuplicateUsername {
                duplicates: vec![DuplicateEntry {
                    username: "bob".into(),
                    count: 2
                }]
            }),
            exit::REJECTED
        );
        assert_eq!(exit_code(&PassvaultError::Crypto("x".into())), exit::FAILURE);
        assert_eq!(exit_code(&PassvaultError::storage("disk full")), exit::FAILURE);
    }

    #[test]
    fn missing_key_is_config_error() {
        let mut config = PassvaultConfig::default();
        config.encryption.key = None;
        let err = encryptor(&config).unwrap_err();
        assert_eq!(exit_code(&err), exit::CONFIG);
    }

    #[test]
    fn visibility_change_flags() {
        let change = visibility_change(Visibility::Shared, vec!["bob".into()], false);
        assert_eq!(change.share_list, Some(vec!["bob".to_string()]));

        let change = visibility_change(Visibility::Shared, Vec::new(), true);
        assert_eq!(change.share_list, Some(Vec::new()));

        let change = visibility_change(Visibility::Public, Vec::new(), false);
        assert_eq!(change.share_list, None);
    }

    #[tokio::test]
    async fn register_create_share_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let vault = Vault::open(&config, true).await.unwrap();

        register(&vault, "alice", &password()).await.unwrap();
        register(&vault, "bob", &password()).await.unwrap();

        let alice = vault.login(Some("alice"), Some(&password())).await.unwrap();
        let id = create(
            &vault,
            alice.as_deref(),
            Visibility::Shared,
            vec!["bob".into()],
            SecretString::from("HelloWorld".to_string()),
        )
        .await
        .unwrap();

        let bob = vault.login(Some("bob"), Some(&password())).await.unwrap();
        let plaintext = get(&vault, bob.as_deref(), &id).await.unwrap();
        assert_eq!(plaintext.expose_secret(), "HelloWorld");

        let err = get(&vault, None, &id).await.unwrap_err();
        assert_eq!(exit_code(&err), exit::NOT_FOUND);

        for target in [Visibility::Public, Visibility::Private] {
            let err = update(
                &vault,
                alice.as_deref(),
                &id,
                visibility_change(target, Vec::new(), false),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, PassvaultError::IllegalTransition { .. }));
            assert_eq!(exit_code(&err), exit::REJECTED);
        }
        assert!(get(&vault, bob.as_deref(), &id).await.is_ok());

        let updated = update(
            &vault,
            alice.as_deref(),
            &id,
            visibility_change(Visibility::Shared, Vec::new(), true),
        )
        .await
        .unwrap();
        assert_eq!(updated.visibility, Visibility::Shared);
        assert!(updated.share_list.is_empty());

        let err = get(&vault, bob.as_deref(), &id).await.unwrap_err();
        assert_eq!(exit_code(&err), exit::NOT_FOUND);
        assert!(get(&vault, alice.as_deref(), &id).await.is_ok());

        vault.close().await.unwrap();
    }

    #[tokio::test]
    async fn private_secret_flips_to_public() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(&config(&dir), true).await.unwrap();
        register(&vault, "alice", &password()).await.unwrap();

        let alice = vault.login(Some("alice"), Some(&password())).await.unwrap();
        let id = create(
            &vault,
            alice.as_deref(),
            Visibility::Private,
            Vec::new(),
            SecretString::from("HelloWorld".to_string()),
        )
        .await
        .unwrap();
        assert!(get(&vault, None, &id).await.is_err());

        let updated = update(
            &vault,
            alice.as_deref(),
            &id,
            visibility_change(Visibility::Public, Vec::new(), false),
        )
        .await
        .unwrap();
        assert_eq!(updated.visibility, Visibility::Public);
        assert!(get(&vault, None, &id).await.is_ok());

        vault.close().await.unwrap();
    }

    #[tokio::test]
    async fn login_without_password_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(&config(&dir), false).await.unwrap();
        register(&vault, "alice", &password()).await.unwrap();

        let err = vault.login(Some("alice"), None).await.unwrap_err();
        assert!(matches!(err, PassvaultError::InvalidCredentials));
        assert_eq!(vault.login(None, None).await.unwrap(), None);

        let wrong = SecretString::from("not-the-password".to_string());
        let err = vault.login(Some("alice"), Some(&wrong)).await.unwrap_err();
        assert_eq!(exit_code(&err), exit::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn account_commands_work_without_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir);
        config.encryption.key = None;

        let vault = Vault::open(&config, false).await.unwrap();
        register(&vault, "alice", &password()).await.unwrap();
        assert!(vault.secrets().is_err());
        vault.close().await.unwrap();

        assert!(matches!(
            Vault::open(&config, true).await,
            Err(PassvaultError::Config(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_before_storage_opens() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(&dir);
        config.encryption.key = None;

        let err = Vault::open(&config, true).await.err().unwrap();
        assert!(matches!(err, PassvaultError::Config(_)));
        assert!(!dir.path().join("vault.db").exists());
    }

    #[tokio::test]
    async fn check_reports_healthy_storage() {
        let dir = tempfile::tempdir().unwrap();
        check(&config(&dir)).await.unwrap();
    }
}
