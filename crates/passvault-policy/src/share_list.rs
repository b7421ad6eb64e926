// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Share list membership rules.

use std::collections::HashMap;

use passvault_core::{DuplicateEntry, PassvaultError};

/// Usernames that appear more than once, in order of first appearance.
pub fn find_duplicates(names: &[String]) -> Vec<DuplicateEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<DuplicateEntry> = Vec::new();
    for name in names {
        let count = counts[name.as_str()];
        if count > 1 && !duplicates.iter().any(|d| d.username == *name) {
            duplicates.push(DuplicateEntry {
                username: name.clone(),
                count,
            });
        }
    }
    duplicates
}

/// Distinct names in request order.
pub(crate) fn distinct(names: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}

/// Owner exclusion, duplicates, then directory membership.
pub(crate) fn check_members(
    owner: Option<&str>,
    names: &[String],
    unknown: &[String],
) -> Result<(), PassvaultError> {
    if let Some(owner) = owner.filter(|owner| names.iter().any(|n| n == owner)) {
        return Err(PassvaultError::OwnerInShareList {
            owner: owner.to_string(),
        });
    }

    let duplicates = find_duplicates(names);
    if !duplicates.is_empty() {
        return Err(PassvaultError::DuplicateUsername { duplicates });
    }

    let missing: Vec<String> = distinct(names)
        .into_iter()
        .filter(|name| unknown.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(PassvaultError::UnknownUsers { usernames: missing });
    }

    Ok(())
}

/// Validate the share list of a secret being created as shared.
///
/// `unknown` holds the names the caller could not find in the user
/// directory. Returns the list to store.
pub fn validate_initial_share_list(
    owner: Option<&str>,
    names: &[String],
    unknown: &[String],
) -> Result<Vec<String>, PassvaultError> {
    if names.is_empty() {
        return Err(PassvaultError::ShareListRequired);
    }
    check_members(owner, names, unknown)?;
    Ok(names.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicates_report_counts_in_first_seen_order() {
        let dups = find_duplicates(&names(&["carol", "bob", "carol", "bob", "dave", "bob"]));
        assert_eq!(
            dups,
            vec![
                DuplicateEntry { username: "carol".into(), count: 2 },
                DuplicateEntry { username: "bob".into(), count: 3 },
            ]
        );
    }

    #[test]
    fn no_duplicates() {
        assert!(find_duplicates(&names(&["a", "b", "c"])).is_empty());
        assert!(find_duplicates(&[]).is_empty());
    }

    #[test]
    fn empty_initial_list_is_required() {
        let err = validate_initial_share_list(Some("alice"), &[], &[]).unwrap_err();
        assert!(matches!(err, PassvaultError::ShareListRequired));
    }

    #[test]
    fn owner_is_checked_before_duplicates() {
        let err =
            validate_initial_share_list(Some("alice"), &names(&["bob", "bob", "alice"]), &[])
                .unwrap_err();
        assert!(matches!(err, PassvaultError::OwnerInShareList { owner } if owner == "alice"));
    }

    #[test]
    fn duplicates_are_checked_before_unknown_users() {
        let err = validate_initial_share_list(
            Some("alice"),
            &names(&["ghost", "ghost"]),
            &names(&["ghost"]),
        )
        .unwrap_err();
        assert!(matches!(err, PassvaultError::DuplicateUsername { .. }));
    }

    #[test]
    fn unknown_users_follow_request_order() {
        let err = validate_initial_share_list(
            Some("alice"),
            &names(&["zed", "bob", "amy"]),
            &names(&["amy", "zed"]),
        )
        .unwrap_err();
        match err {
            PassvaultError::UnknownUsers { usernames } => assert_eq!(usernames, names(&["zed", "amy"])),
            other => panic!("expected UnknownUsers, got {other:?}"),
        }
    }

    #[test]
    fn valid_list_is_returned() {
        let list = validate_initial_share_list(Some("alice"), &names(&["bob", "carol"]), &[]).unwrap();
        assert_eq!(list, names(&["bob", "carol"]));
    }

    #[test]
    fn distinct_keeps_first_occurrence() {
        assert_eq!(distinct(&names(&["b", "a", "b", "c", "a"])), names(&["b", "a", "c"]));
    }
}
