// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Passvault password vault.

use std::fmt;

use thiserror::Error;

use crate::types::Visibility;

/// A username that appeared more than once in a requested share list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateEntry {
    /// The repeated username.
    pub username: String,
    /// How many times it appeared in the request.
    pub count: usize,
}

impl fmt::Display for DuplicateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} times)", self.username, self.count)
    }
}

/// The primary error type used across all Passvault crates.
///
/// Every variant except [`PassvaultError::Storage`] and
/// [`PassvaultError::Internal`] is an expected, typed outcome that a caller
/// maps to a user-facing response.
#[derive(Debug, Error)]
pub enum PassvaultError {
    /// The secret does not exist or the caller may not read it.
    ///
    /// Both cases share one variant so that callers cannot probe for the
    /// existence of private secrets.
    #[error("secret not found")]
    NotFoundOrForbidden,

    /// A non-owner (or anonymous caller) attempted to mutate a secret.
    #[error("access denied: only the owner may change a secret")]
    AccessDenied,

    /// The requested visibility change crosses the Shared boundary.
    #[error("cannot change visibility from {from} to {to}: shared visibility can only be edited")]
    IllegalTransition { from: Visibility, to: Visibility },

    /// The requested state equals the current state.
    #[error("no changes applied: requested state matches the current state")]
    NoOpChange,

    /// The owner listed themselves in the share list.
    #[error("owner `{owner}` cannot be in the share list")]
    OwnerInShareList { owner: String },

    /// The share list contains repeated usernames.
    #[error("duplicate usernames in share list: {}", join(duplicates))]
    DuplicateUsername { duplicates: Vec<DuplicateEntry> },

    /// The share list names users that are not registered.
    #[error("unknown users: {}", usernames.join(", "))]
    UnknownUsers { usernames: Vec<String> },

    /// A share list was supplied for a non-shared visibility.
    #[error("a share list can only be applied to shared secrets")]
    ShareListNotApplicable,

    /// A shared secret was requested without a share list.
    #[error("a share list is required for shared secrets")]
    ShareListRequired,

    /// Encryption or decryption failed (wrong key, corrupted data).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Input rejected before reaching the policy engine.
    #[error("validation error: {0}")]
    Validation(String),

    /// Registration attempted with a username that is already taken.
    #[error("username `{0}` is already registered")]
    UserExists(String),

    /// Unknown username or wrong password. Deliberately not more specific.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Configuration errors (missing key, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PassvaultError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Returns `true` for outcomes caused by the request rather than by the
    /// service itself. Callers map these to 4xx-style responses.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Storage { .. } | Self::Internal(_) | Self::Config(_) | Self::Crypto(_)
        )
    }
}

fn join(entries: &[DuplicateEntry]) -> String {
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
