// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Visibility transitions.
//!
//! Two kinds of change are legal: flipping between private and public, and
//! editing the share list of a shared secret. Crossing into or out of shared
//! is rejected. Validation never touches the secret; the caller applies the
//! returned [`Transition`] only on success.

use std::collections::HashSet;

use passvault_core::{PassvaultError, Secret, Visibility};
use tracing::debug;

use crate::access::authorize_owner;
use crate::share_list::{check_members, distinct};

/// A requested visibility change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityChange {
    pub visibility: Visibility,
    /// Required when staying shared; must be absent or empty otherwise.
    pub share_list: Option<Vec<String>>,
}

impl VisibilityChange {
    pub fn to(visibility: Visibility) -> Self {
        Self {
            visibility,
            share_list: None,
        }
    }

    pub fn share_with<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visibility: Visibility::Shared,
            share_list: Some(names.into_iter().map(Into::into).collect()),
        }
    }
}

/// A validated change, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Private to public or back.
    Flip { from: Visibility, to: Visibility },
    /// New member list for a shared secret. May be empty.
    EditShareList { share_list: Vec<String> },
}

impl Transition {
    /// Write the change into `secret`.
    pub fn apply(self, secret: &mut Secret) {
        match self {
            Transition::Flip { to, .. } => {
                secret.visibility = to;
                secret.share_list.clear();
            }
            Transition::EditShareList { share_list } => {
                secret.visibility = Visibility::Shared;
                secret.share_list = share_list;
            }
        }
    }
}

/// Names the caller must look up in the user directory before calling
/// [`validate_transition`]. Empty unless this is a share list edit.
pub fn names_to_verify(current: &Secret, change: &VisibilityChange) -> Vec<String> {
    match (&change.share_list, current.visibility, change.visibility) {
        (Some(names), Visibility::Shared, Visibility::Shared) => distinct(names)
            .into_iter()
            .filter(|name| !current.is_owned_by(name))
            .collect(),
        _ => Vec::new(),
    }
}

/// Validate `change` against the current state of `current`.
///
/// Checks run in a fixed order and the first failure wins: ownership, the
/// shared boundary, then the rules for the kind of change. `unknown` lists
/// requested names that are not registered users.
pub fn validate_transition(
    current: &Secret,
    change: &VisibilityChange,
    actor: Option<&str>,
    unknown: &[String],
) -> Result<Transition, PassvaultError> {
    let owner = authorize_owner(current, actor)?;

    let from = current.visibility;
    let to = change.visibility;
    match (from == Visibility::Shared, to == Visibility::Shared) {
        (true, true) => edit_share_list(current, owner, change.share_list.as_deref(), unknown),
        (false, false) => flip(from, to, change.share_list.as_deref()),
        _ => {
            debug!(%from, %to, "transition crosses the shared boundary");
            Err(PassvaultError::IllegalTransition { from, to })
        }
    }
}

fn edit_share_list(
    current: &Secret,
    owner: &str,
    requested: Option<&[String]>,
    unknown: &[String],
) -> Result<Transition, PassvaultError> {
    let requested = requested.ok_or(PassvaultError::ShareListRequired)?;

    let before: HashSet<&str> = current.share_list.iter().map(String::as_str).collect();
    let after: HashSet<&str> = requested.iter().map(String::as_str).collect();
    if before == after {
        return Err(PassvaultError::NoOpChange);
    }

    check_members(Some(owner), requested, unknown)?;

    Ok(Transition::EditShareList {
        share_list: distinct(requested),
    })
}

fn flip(
    from: Visibility,
    to: Visibility,
    requested: Option<&[String]>,
) -> Result<Transition, PassvaultError> {
    if requested.is_some_and(|names| !names.is_empty()) {
        return Err(PassvaultError::ShareListNotApplicable);
    }
    if from == to {
        return Err(PassvaultError::NoOpChange);
    }
    Ok(Transition::Flip { from, to })
}
