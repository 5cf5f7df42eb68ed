// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use survivor_pool::Actor;
use survivor_pool_domain::{Clock, Role};
use survivor_pool_persistence::{
    Persistence, PersistenceError, SessionRecord, UnitOfWork, UserRecord, verify_password,
};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Session expiries are stored in one fixed-width UTC format so that text
/// comparison in the database matches chronological order.
const EXPIRY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

/// Random bytes per session token.
const TOKEN_BYTES: usize = 32;

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's account id.
    pub user_id: i64,
    /// The caller's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    /// The caller as seen by operation planning.
    #[must_use]
    pub const fn to_core_actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the caller administers the pool.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action being attempted, for the error message
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` unless the actor is a superadmin.
    pub fn authorize_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.role.is_admin() {
            return Ok(());
        }
        Err(AuthError::Forbidden {
            action: action.to_string(),
            required_role: Role::Superadmin.to_string(),
        })
    }
}

/// A session opened by login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Bearer token.
    pub token: String,
    /// Expiry instant, `YYYY-MM-DDTHH:MM:SSZ`.
    pub expires_at: String,
}

/// Session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials and opens a session.
    ///
    /// Unknown emails, wrong passwords and deactivated accounts all fail the
    /// same way.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `clock` - The time source
    /// * `session_days` - Session lifetime
    /// * `email` - The login email
    /// * `password` - The plain-text password
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or storage fails.
    pub fn login(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        session_days: u32,
        email: &str,
        password: &str,
    ) -> Result<(UserRecord, IssuedSession), AuthError> {
        persistence
            .unit_of_work(|uow| -> Result<(UserRecord, IssuedSession), AuthError> {
                let user: UserRecord = uow
                    .find_user_by_email(email)
                    .map_err(Self::map_persistence_error)?
                    .ok_or_else(Self::invalid_credentials)?;

                if !user.is_active {
                    info!(user_id = user.user_id, "Refused deactivated account");
                    return Err(AuthError::AuthenticationFailed {
                        reason: String::from("Account is deactivated"),
                    });
                }

                if !verify_password(password, &user.password_hash)
                    .map_err(Self::map_persistence_error)?
                {
                    debug!(user_id = user.user_id, "Password mismatch");
                    return Err(Self::invalid_credentials());
                }

                let now_utc: String = format_expiry(clock.now_utc())?;
                uow.delete_expired_sessions(&now_utc)
                    .map_err(Self::map_persistence_error)?;

                let session: IssuedSession =
                    Self::open_session(uow, clock, session_days, user.user_id)
                        .map_err(Self::map_persistence_error)?;
                info!(user_id = user.user_id, "User logged in");
                Ok((user, session))
            })
    }

    /// Opens a session for an account inside an existing unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be stored.
    pub fn open_session(
        uow: &mut UnitOfWork<'_>,
        clock: &dyn Clock,
        session_days: u32,
        user_id: i64,
    ) -> Result<IssuedSession, PersistenceError> {
        let token: String = Self::generate_session_token();
        let expires: OffsetDateTime = clock.now_utc() + Duration::days(i64::from(session_days));
        let expires_at: String =
            format_expiry(expires).map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

        uow.create_session(&token, user_id, &clock.civil_timestamp(), &expires_at)?;
        Ok(IssuedSession { token, expires_at })
    }

    /// Resolves a bearer token to its account.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `clock` - The time source
    /// * `session_token` - The bearer token
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or the account
    /// is gone or deactivated.
    pub fn validate_session(
        persistence: &mut Persistence,
        clock: &dyn Clock,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserRecord), AuthError> {
        persistence.unit_of_work(|uow| -> Result<(AuthenticatedActor, UserRecord), AuthError> {
            let session: SessionRecord = uow
                .find_session(session_token)
                .map_err(Self::map_persistence_error)?
                .ok_or_else(|| AuthError::AuthenticationFailed {
                    reason: String::from("Invalid session token"),
                })?;

            let expires_at: OffsetDateTime = parse_expiry(&session.expires_at)?;
            if clock.now_utc() >= expires_at {
                return Err(AuthError::AuthenticationFailed {
                    reason: String::from("Session expired"),
                });
            }

            let user: UserRecord = uow
                .find_user_by_id(session.user_id)
                .map_err(Self::map_persistence_error)?
                .ok_or_else(|| AuthError::AuthenticationFailed {
                    reason: String::from("Account not found"),
                })?;

            if !user.is_active {
                return Err(AuthError::AuthenticationFailed {
                    reason: String::from("Account is deactivated"),
                });
            }

            uow.touch_session(session.session_id, &clock.civil_timestamp())
                .map_err(Self::map_persistence_error)?;

            Ok((AuthenticatedActor::new(user.user_id, user.role), user))
        })
    }

    /// Ends a session.
    ///
    /// Logging out an already-deleted session succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        let removed: usize = persistence
            .unit_of_work(|uow| uow.delete_session(session_token))
            .map_err(Self::map_persistence_error)?;
        if removed == 0 {
            warn!("Logout for unknown session");
        }
        Ok(())
    }

    fn generate_session_token() -> String {
        let bytes: [u8; TOKEN_BYTES] = rand::random();
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn invalid_credentials() -> AuthError {
        AuthError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        }
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::StorageFailure {
            message: err.to_string(),
        }
    }
}

fn format_expiry(instant: OffsetDateTime) -> Result<String, AuthError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(EXPIRY_FORMAT)
        .map_err(|e| AuthError::StorageFailure {
            message: format!("Failed to format expiration time: {e}"),
        })
}

fn parse_expiry(value: &str) -> Result<OffsetDateTime, AuthError> {
    PrimitiveDateTime::parse(value, EXPIRY_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| AuthError::StorageFailure {
            message: format!("Failed to parse session expiration: {e}"),
        })
}

impl From<PersistenceError> for AuthError {
    fn from(err: PersistenceError) -> Self {
        AuthenticationService::map_persistence_error(err)
    }
}
