// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the secret store and user directory.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use passvault_config::model::StorageConfig;
use passvault_core::{
    AdapterType, HealthStatus, PassvaultError, PluginAdapter, Secret, SecretId, SecretStore,
    StorageAdapter, UserDirectory, UserRecord, UserRepository,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage.
///
/// One instance serves as both the [`SecretStore`] and the user directory.
/// The database is opened by [`StorageAdapter::initialize`]; every other
/// call fails with a storage error until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Construct and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, PassvaultError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    fn db(&self) -> Result<&Database, PassvaultError> {
        self.db
            .get()
            .ok_or_else(|| PassvaultError::storage("storage not initialized -- call initialize() first"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SecretStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PassvaultError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PassvaultError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), PassvaultError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| PassvaultError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), PassvaultError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl SecretStore for SqliteStorage {
    async fn create(&self, secret: Secret) -> Result<Secret, PassvaultError> {
        queries::secrets::insert_secret(self.db()?, secret).await
    }

    async fn get_by_id(&self, id: &SecretId) -> Result<Option<Secret>, PassvaultError> {
        queries::secrets::get_secret(self.db()?, id).await
    }

    async fn update_visibility(&self, secret: Secret) -> Result<Secret, PassvaultError> {
        queries::secrets::update_secret_visibility(self.db()?, secret).await
    }
}

#[async_trait]
impl UserDirectory for SqliteStorage {
    async fn exists(&self, username: &str) -> Result<bool, PassvaultError> {
        queries::users::user_exists(self.db()?, username).await
    }
}

#[async_trait]
impl UserRepository for SqliteStorage {
    async fn insert_user(&self, user: &UserRecord) -> Result<(), PassvaultError> {
        queries::users::insert_user(self.db()?, user).await
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, PassvaultError> {
        queries::users::find_user(self.db()?, username).await
    }
}
