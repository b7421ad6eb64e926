// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Passvault integration tests.
//!
//! - [`InMemorySecretStore`] - secret store backed by a map
//! - [`InMemoryUserDirectory`] - user directory and repository backed by a map
//! - [`FailingSecretStore`] - store whose every call is a storage error
//! - [`TestHarness`] - wired services over either backend

pub mod harness;
pub mod memory;

pub use harness::{Backend, TEST_PASSWORD, TestHarness, fast_kdf};
pub use memory::{FailingSecretStore, InMemorySecretStore, InMemoryUserDirectory};
