// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use survivor_pool_domain::Role;
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::queries::users::normalize_email;

/// Creates an account.
///
/// The email is trimmed and lowercased before storage, so uniqueness is
/// case-insensitive.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The login email
/// * `name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The account role
/// * `now` - Civil timestamp for `created_at`/`updated_at`
/// * `cost` - The bcrypt cost factor
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the email is taken, or
/// another error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    email: &str,
    name: &str,
    password: &str,
    role: Role,
    now: &str,
    cost: u32,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = normalize_email(email);

    let password_hash: String = bcrypt::hash(password, cost)
        .map_err(|e| PersistenceError::PasswordHashing(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::email.eq(&normalized_email),
            users::name.eq(name.trim()),
            users::password_hash.eq(&password_hash),
            users::role.eq(role.as_str()),
            users::created_at.eq(now),
            users::updated_at.eq(now),
        ))
        .execute(conn)?;

    let user_id: i64 = last_insert_rowid(conn)?;
    info!(user_id, email = %normalized_email, role = %role, "Created user");
    Ok(user_id)
}

/// Flags the given users as eliminated.
///
/// Only rows not yet eliminated are touched, so the returned count is the
/// number of users whose flag flipped in this call. There is no inverse.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn eliminate_users(
    conn: &mut SqliteConnection,
    user_ids: &[i64],
    now: &str,
) -> Result<usize, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let flipped: usize = diesel::update(users::table)
        .filter(users::user_id.eq_any(user_ids))
        .filter(users::is_eliminated.eq(0))
        .set((users::is_eliminated.eq(1), users::updated_at.eq(now)))
        .execute(conn)?;

    debug!(requested = user_ids.len(), flipped, "Applied eliminations");
    Ok(flipped)
}

/// Stores a new session.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    now: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(now),
            sessions::last_activity_at.eq(now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = last_insert_rowid(conn)?;
    debug!(session_id, user_id, "Created session");
    Ok(session_id)
}

/// Records activity on a session.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn touch_session(
    conn: &mut SqliteConnection,
    session_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.find(session_id))
        .set(sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token.
///
/// # Returns
///
/// The number of sessions removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
            .execute(conn)?,
    )
}

/// Deletes every session whose expiry precedes `now_utc`.
///
/// Expiries are stored in one fixed-width UTC format, so text order is
/// chronological order.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now_utc: &str,
) -> Result<usize, PersistenceError> {
    let removed: usize =
        diesel::delete(sessions::table.filter(sessions::expires_at.lt(now_utc))).execute(conn)?;
    if removed > 0 {
        info!(removed, "Removed expired sessions");
    }
    Ok(removed)
}
