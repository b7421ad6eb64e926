// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret persistence.
//!
//! The share list is stored as a JSON array of usernames.

use std::str::FromStr;

use passvault_core::{PassvaultError, Secret, SecretId, Visibility};
use rusqlite::types::Type;
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str =
    "SELECT id, ciphertext, owner, visibility, share_list, created_at, updated_at FROM secrets";

fn conversion_err(
    column: usize,
    source: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(source))
}

fn row_to_secret(row: &Row<'_>) -> Result<Secret, rusqlite::Error> {
    let id: String = row.get(0)?;
    let visibility: String = row.get(3)?;
    let share_list: String = row.get(4)?;
    Ok(Secret {
        id: SecretId::from_str(&id).map_err(|e| conversion_err(0, e))?,
        ciphertext: row.get(1)?,
        owner: row.get(2)?,
        visibility: Visibility::from_str(&visibility).map_err(|e| conversion_err(3, e))?,
        share_list: serde_json::from_str(&share_list).map_err(|e| conversion_err(4, e))?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Insert a new secret, stamping both timestamps.
pub async fn insert_secret(db: &Database, secret: Secret) -> Result<Secret, PassvaultError> {
    let share_list = serde_json::to_string(&secret.share_list).map_err(PassvaultError::storage)?;
    let stamp = now();
    let secret = Secret {
        created_at: stamp.clone(),
        updated_at: stamp,
        ..secret
    };

    let row = secret.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO secrets (id, ciphertext, owner, visibility, share_list, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.id.to_string(),
                    row.ciphertext,
                    row.owner,
                    row.visibility.to_string(),
                    share_list,
                    row.created_at,
                    row.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

    Ok(secret)
}

/// Fetch a secret by id.
pub async fn get_secret(db: &Database, id: &SecretId) -> Result<Option<Secret>, PassvaultError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_secret) {
                Ok(secret) => Ok(Some(secret)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite visibility and share list, refreshing `updated_at`.
///
/// Ciphertext, owner and `created_at` are never written here.
pub async fn update_secret_visibility(
    db: &Database,
    secret: Secret,
) -> Result<Secret, PassvaultError> {
    let share_list = serde_json::to_string(&secret.share_list).map_err(PassvaultError::storage)?;
    let secret = Secret {
        updated_at: now(),
        ..secret
    };

    let id = secret.id.to_string();
    let visibility = secret.visibility.to_string();
    let updated_at = secret.updated_at.clone();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE secrets SET visibility = ?2, share_list = ?3, updated_at = ?4 WHERE id = ?1",
                params![id, visibility, share_list, updated_at],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(PassvaultError::storage(format!(
            "secret {} does not exist",
            secret.id
        )));
    }
    Ok(secret)
}
