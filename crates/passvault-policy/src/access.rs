// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read access and ownership checks.

use passvault_core::{PassvaultError, Secret, Visibility};

/// Whether `user` may read `secret`.
///
/// Owners always may. Anyone, anonymous callers included, may read a public
/// secret. A shared secret is readable by the users on its share list.
pub fn can_read(secret: &Secret, user: Option<&str>) -> bool {
    if secret.visibility == Visibility::Public {
        return true;
    }
    let Some(user) = user else {
        return false;
    };
    if secret.is_owned_by(user) {
        return true;
    }
    secret.visibility == Visibility::Shared && secret.share_list.iter().any(|name| name == user)
}

/// Require `actor` to be the owner of `secret`.
///
/// Anonymous actors and secrets without an owner always fail.
pub fn authorize_owner<'a>(
    secret: &Secret,
    actor: Option<&'a str>,
) -> Result<&'a str, PassvaultError> {
    match actor {
        Some(actor) if secret.is_owned_by(actor) => Ok(actor),
        _ => Err(PassvaultError::AccessDenied),
    }
}
