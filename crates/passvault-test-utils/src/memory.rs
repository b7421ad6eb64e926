// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use passvault_core::{
    AdapterType, HealthStatus, PassvaultError, PluginAdapter, Secret, SecretId, SecretStore,
    UserDirectory, UserRecord, UserRepository,
};

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Map-backed [`SecretStore`] with the same timestamp and missing-id
/// behavior as the SQLite store.
#[derive(Default)]
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<SecretId, Secret>>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored copy of a secret, bypassing any policy.
    pub async fn snapshot(&self, id: &SecretId) -> Option<Secret> {
        self.secrets.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.secrets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.secrets.read().await.is_empty()
    }
}

#[async_trait]
impl PluginAdapter for InMemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SecretStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PassvaultError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PassvaultError> {
        Ok(())
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn create(&self, secret: Secret) -> Result<Secret, PassvaultError> {
        let mut secrets = self.secrets.write().await;
        if secrets.contains_key(&secret.id) {
            return Err(PassvaultError::storage(format!("secret {} already exists", secret.id)));
        }
        let stamp = now();
        let secret = Secret {
            created_at: stamp.clone(),
            updated_at: stamp,
            ..secret
        };
        secrets.insert(secret.id, secret.clone());
        Ok(secret)
    }

    async fn get_by_id(&self, id: &SecretId) -> Result<Option<Secret>, PassvaultError> {
        Ok(self.secrets.read().await.get(id).cloned())
    }

    async fn update_visibility(&self, secret: Secret) -> Result<Secret, PassvaultError> {
        let mut secrets = self.secrets.write().await;
        let Some(stored) = secrets.get_mut(&secret.id) else {
            return Err(PassvaultError::storage(format!("secret {} does not exist", secret.id)));
        };
        stored.visibility = secret.visibility;
        stored.share_list = secret.share_list;
        stored.updated_at = now();
        Ok(stored.clone())
    }
}

/// Map-backed user directory.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory that knows `names`. Their password hashes are placeholders
    /// that never verify.
    pub fn with_users<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let users = names
            .into_iter()
            .map(|name| {
                let username = name.into();
                let record = UserRecord {
                    username: username.clone(),
                    password_hash: "!".to_string(),
                    created_at: now(),
                };
                (username, record)
            })
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl PluginAdapter for InMemoryUserDirectory {
    fn name(&self) -> &str {
        "memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::UserDirectory
    }

    async fn health_check(&self) -> Result<HealthStatus, PassvaultError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), PassvaultError> {
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn exists(&self, username: &str) -> Result<bool, PassvaultError> {
        Ok(self.users.read().await.contains_key(username))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserDirectory {
    async fn insert_user(&self, user: &UserRecord) -> Result<(), PassvaultError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(PassvaultError::UserExists(user.username.clone()));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, PassvaultError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

/// A store that is always down.
#[derive(Debug, Default)]
pub struct FailingSecretStore;

impl FailingSecretStore {
    fn err() -> PassvaultError {
        PassvaultError::storage("database is unavailable")
    }
}

#[async_trait]
impl PluginAdapter for FailingSecretStore {
    fn name(&self) -> &str {
        "failing"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SecretStore
    }

    async fn health_check(&self) -> Result<HealthStatus, PassvaultError> {
        Ok(HealthStatus::Unhealthy("database is unavailable".to_string()))
    }

    async fn shutdown(&self) -> Result<(), PassvaultError> {
        Ok(())
    }
}

#[async_trait]
impl SecretStore for FailingSecretStore {
    async fn create(&self, _secret: Secret) -> Result<Secret, PassvaultError> {
        Err(Self::err())
    }

    async fn get_by_id(&self, _id: &SecretId) -> Result<Option<Secret>, PassvaultError> {
        Err(Self::err())
    }

    async fn update_visibility(&self, _secret: Secret) -> Result<Secret, PassvaultError> {
        Err(Self::err())
    }
}
