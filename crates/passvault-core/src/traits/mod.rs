// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the services.
//!
//! Async traits use `#[async_trait]` so they can be held as `Arc<dyn _>`.

pub mod adapter;
pub mod crypto;
pub mod storage;
pub mod users;

pub use adapter::PluginAdapter;
pub use crypto::Encryptor;
pub use storage::{SecretStore, StorageAdapter};
pub use users::{UserDirectory, UserRepository};
