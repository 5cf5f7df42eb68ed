// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use survivor_pool_domain::{Participant, Role};
use tracing::debug;

use crate::data_models::{SessionRecord, UserRecord};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::queries::rows::{SessionRow, UserRow};

/// Normalizes an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Retrieves an account by email, case-insensitively.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored role is unknown.
/// Returns `Ok(None)` if no account has this email.
pub fn find_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserRecord>, PersistenceError> {
    let normalized: String = normalize_email(email);
    debug!(email = %normalized, "Looking up user by email");

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::email.eq(&normalized))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(UserRecord::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves an account by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored role is unknown.
pub fn find_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserRecord>, PersistenceError> {
    users::table
        .find(user_id)
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserRecord::try_from)
        .transpose()
}

/// Lists competing accounts ordered by name, then id.
///
/// Administrators never appear.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_participants(
    conn: &mut SqliteConnection,
) -> Result<Vec<Participant>, PersistenceError> {
    let rows: Vec<(i64, String, i32)> = users::table
        .filter(users::role.eq(Role::User.as_str()))
        .order((users::name.asc(), users::user_id.asc()))
        .select((users::user_id, users::name, users::is_eliminated))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(user_id, name, is_eliminated)| Participant {
            user_id,
            name,
            is_eliminated: is_eliminated != 0,
        })
        .collect())
}

/// Counts administrator accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_administrators(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table
        .filter(users::role.eq(Role::Superadmin.as_str()))
        .count()
        .get_result(conn)?)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionRecord>, PersistenceError> {
    Ok(sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?
        .map(SessionRecord::from))
}

/// Checks a plain-text password against a bcrypt hash.
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::PasswordHashing(format!("Failed to verify password: {e}")))
}
