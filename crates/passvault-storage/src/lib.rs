// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for Passvault.
//!
//! WAL-mode SQLite with embedded refinery migrations. All statements go
//! through tokio-rusqlite's single background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
