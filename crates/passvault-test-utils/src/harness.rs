// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fully wired services for integration tests.
//!
//! `TestHarness` builds a [`SecretService`] and a [`UserService`] over either
//! the in-memory adapters or a SQLite database in a temp directory, with a
//! random encryption key and a set of pre-registered users.

use std::sync::Arc;

use passvault_config::model::StorageConfig;
use passvault_core::{
    PassvaultError, Secret, SecretId, SecretStore, UserDirectory, UserRepository,
};
use passvault_crypto::{AesGcmEncryptor, EncryptionKey, KdfParams};
use passvault_service::{SecretService, SecretSettings, UserService, UserSettings};
use passvault_storage::SqliteStorage;
use secrecy::SecretString;
use tracing::debug;

use crate::memory::{InMemorySecretStore, InMemoryUserDirectory};

/// Password given to every user the harness registers.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Cheapest Argon2id parameters that still exercise the real code path.
pub fn fast_kdf() -> KdfParams {
    KdfParams {
        memory_cost: 32768,
        iterations: 2,
        parallelism: 1,
    }
}

/// Which adapters back the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Memory,
    Sqlite,
}

pub struct TestHarnessBuilder {
    backend: Backend,
    users: Vec<String>,
    settings: SecretSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            backend: Backend::default(),
            users: Vec::new(),
            settings: SecretSettings::default(),
        }
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Register these users with [`TEST_PASSWORD`].
    pub fn with_users<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn allow_anonymous_create(mut self, allow: bool) -> Self {
        self.settings.allow_anonymous_create = allow;
        self
    }

    pub fn max_secret_length(mut self, max: usize) -> Self {
        self.settings.max_secret_length = max;
        self
    }

    pub async fn build(self) -> Result<TestHarness, PassvaultError> {
        let encryptor = Arc::new(AesGcmEncryptor::new(EncryptionKey::generate()?));

        let (store, directory, repository, temp_dir): (
            Arc<dyn SecretStore>,
            Arc<dyn UserDirectory>,
            Arc<dyn UserRepository>,
            Option<tempfile::TempDir>,
        ) = match self.backend {
            Backend::Memory => {
                let users = Arc::new(InMemoryUserDirectory::new());
                let store: Arc<dyn SecretStore> = Arc::new(InMemorySecretStore::new());
                let directory: Arc<dyn UserDirectory> = users.clone();
                let repository: Arc<dyn UserRepository> = users;
                (store, directory, repository, None)
            }
            Backend::Sqlite => {
                let temp_dir = tempfile::TempDir::new().map_err(PassvaultError::storage)?;
                let storage = Arc::new(
                    SqliteStorage::open(StorageConfig {
                        database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
                        wal_mode: true,
                    })
                    .await?,
                );
                let store: Arc<dyn SecretStore> = storage.clone();
                let directory: Arc<dyn UserDirectory> = storage.clone();
                let repository: Arc<dyn UserRepository> = storage;
                (store, directory, repository, Some(temp_dir))
            }
        };

        let users = UserService::new(
            repository,
            UserSettings {
                kdf: fast_kdf(),
                ..UserSettings::default()
            },
        );
        let password = SecretString::from(TEST_PASSWORD.to_string());
        for name in &self.users {
            users.register(name, &password).await?;
        }

        debug!(backend = ?self.backend, users = self.users.len(), "test harness ready");
        Ok(TestHarness {
            secrets: SecretService::new(store.clone(), directory, encryptor, self.settings),
            users,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// Wired services plus direct store access for assertions.
pub struct TestHarness {
    pub secrets: SecretService,
    pub users: UserService,
    /// The store behind `secrets`, for reading state without policy checks.
    pub store: Arc<dyn SecretStore>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The stored record, bypassing read access checks.
    pub async fn stored(&self, id: &SecretId) -> Option<Secret> {
        self.store.get_by_id(id).await.ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_memory_harness_with_users() {
        let harness = TestHarness::builder().with_users(["alice"]).build().await.unwrap();
        let password = SecretString::from(TEST_PASSWORD.to_string());
        assert_eq!(harness.users.authenticate("alice", &password).await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn builds_sqlite_harness() {
        let harness = TestHarness::builder()
            .backend(Backend::Sqlite)
            .with_users(["alice"])
            .build()
            .await
            .unwrap();
        assert!(harness.stored(&SecretId::new()).await.is_none());
    }
}
