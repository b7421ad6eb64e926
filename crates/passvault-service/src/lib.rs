// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Services that callers drive: secrets and user accounts.
//!
//! [`SecretService`] ties the store, the user directory, the encryptor and
//! the policy engine together. [`UserService`] registers and authenticates
//! accounts. Both hold only `Arc` handles and can be shared across tasks.

pub mod secrets;
pub mod users;

pub use secrets::{CreateSecret, RevealedSecret, SecretService, SecretSettings, VisibilityUpdated};
pub use users::{UserService, UserSettings, validate_username};
