// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Passvault password vault.
//!
//! Holds the workspace error type, the secret and user domain types, and the
//! collaborator traits (store, user directory, encryptor) that the services
//! are written against.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DuplicateEntry, PassvaultError};
pub use types::{AdapterType, HealthStatus, Secret, SecretId, UserRecord, Visibility};

pub use traits::{
    Encryptor, PluginAdapter, SecretStore, StorageAdapter, UserDirectory, UserRepository,
};
