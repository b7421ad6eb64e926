// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User directory and account persistence traits.

use async_trait::async_trait;

use crate::error::PassvaultError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserRecord;

/// Resolves usernames to existence. Used to validate share lists.
#[async_trait]
pub trait UserDirectory: PluginAdapter {
    /// Returns `true` if a user with this exact name is registered.
    async fn exists(&self, username: &str) -> Result<bool, PassvaultError>;
}

/// Account persistence backing registration and authentication.
#[async_trait]
pub trait UserRepository: UserDirectory {
    /// Insert a new account. A taken username is [`PassvaultError::UserExists`].
    async fn insert_user(&self, user: &UserRecord) -> Result<(), PassvaultError>;

    /// Look up an account by username.
    async fn find_user(&self, username: &str) -> Result<Option<UserRecord>, PassvaultError>;
}
