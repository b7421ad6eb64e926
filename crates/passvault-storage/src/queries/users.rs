// SPDX-FileCopyrightText: 2026 Passvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User account persistence.

use passvault_core::{PassvaultError, UserRecord};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Insert a user. A taken username is [`PassvaultError::UserExists`].
pub async fn insert_user(db: &Database, user: &UserRecord) -> Result<(), PassvaultError> {
    let user = user.clone();
    let username = user.username.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(username) DO NOTHING",
                params![user.username, user.password_hash, user.created_at],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if inserted == 0 {
        return Err(PassvaultError::UserExists(username));
    }
    Ok(())
}

/// Look up a user by exact username.
pub async fn find_user(db: &Database, username: &str) -> Result<Option<UserRecord>, PassvaultError> {
    let username = username.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok(UserRecord {
                        username: row.get(0)?,
                        password_hash: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

pub async fn user_exists(db: &Database, username: &str) -> Result<bool, PassvaultError> {
    let username = username.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                params![username],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(username: &str) -> UserRecord {
        UserRecord {
            username: username.into(),
            password_hash: "$argon2id$v=19$m=32768,t=2,p=1$c2FsdA$aGFzaA".into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
        }
    }

    #[tokio::test]
    async fn insert_find_exists() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("users.db").to_str().unwrap())
            .await
            .unwrap();

        insert_user(&db, &record("alice")).await.unwrap();
        assert!(user_exists(&db, "alice").await.unwrap());
        assert!(!user_exists(&db, "bob").await.unwrap());
        assert_eq!(find_user(&db, "alice").await.unwrap(), Some(record("alice")));
        assert_eq!(find_user(&db, "bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("users.db").to_str().unwrap())
            .await
            .unwrap();
        insert_user(&db, &record("Alice")).await.unwrap();
        assert!(!user_exists(&db, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_user_exists() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("users.db").to_str().unwrap())
            .await
            .unwrap();
        insert_user(&db, &record("alice")).await.unwrap();
        let err = insert_user(&db, &record("alice")).await.unwrap_err();
        assert!(matches!(err, PassvaultError::UserExists(name) if name == "alice"));
    }
}
