// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visibility policy engine.
//!
//! Pure functions over [`Secret`](passvault_core::Secret) values: who may read
//! a secret, and which visibility changes its owner may make. Nothing here
//! performs I/O. Directory lookups happen in the caller, which passes the
//! names it could not resolve into [`validate_transition`].

pub mod access;
pub mod share_list;
pub mod transition;

pub use access::{authorize_owner, can_read};
pub use share_list::{find_duplicates, validate_initial_share_list};
pub use transition::{Transition, VisibilityChange, names_to_verify, validate_transition};
