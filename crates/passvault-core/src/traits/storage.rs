// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence traits for secrets.

use async_trait::async_trait;

use crate::error::PassvaultError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Secret, SecretId};

/// Lifecycle of a storage backend that needs explicit setup.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), PassvaultError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), PassvaultError>;
}

/// CRUD over secret records.
///
/// Pure persistence: implementations apply no business rules. Concurrent
/// `update_visibility` calls on the same id are last-write-wins.
#[async_trait]
pub trait SecretStore: PluginAdapter {
    /// Persist a new secret and return it as stored.
    async fn create(&self, secret: Secret) -> Result<Secret, PassvaultError>;

    /// Fetch a secret by id. An unknown id is `Ok(None)`, not an error.
    async fn get_by_id(&self, id: &SecretId) -> Result<Option<Secret>, PassvaultError>;

    /// Overwrite the visibility and share list of an existing secret.
    ///
    /// Returns the record as stored, with a refreshed `updated_at`.
    async fn update_visibility(&self, secret: Secret) -> Result<Secret, PassvaultError>;
}
