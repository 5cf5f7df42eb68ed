// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-token session extraction.
//!
//! Handlers that need a caller take [`SessionUser`] as an argument; the
//! request is rejected with 401 before the handler runs if the token is
//! missing, unknown or expired, or the account is deactivated.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use survivor_pool_api::{
    AuthError, AuthenticatedActor, AuthenticationService, INTERNAL_ERROR_MESSAGE,
};
use survivor_pool_persistence::UserRecord;
use tracing::{debug, error, warn};

use crate::{AppState, ErrorResponse};

/// An authenticated caller.
///
/// Holds the actor, the account record, and the bearer token the request
/// carried.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the token via `AuthenticationService::validate_session`
/// 3. Return the actor and account
pub struct SessionUser(pub AuthenticatedActor, pub UserRecord, pub String);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header is not a bearer token");
                SessionError::InvalidAuthorizationHeader
            })?;

        let mut persistence = state.persistence.lock().await;
        let (actor, user): (AuthenticatedActor, UserRecord) =
            AuthenticationService::validate_session(&mut persistence, state.clock.as_ref(), token)
                .map_err(|e| match e {
                    AuthError::StorageFailure { message } => {
                        error!(error = %message, "Session lookup failed");
                        SessionError::StorageFailure
                    }
                    other => {
                        debug!(error = %other, "Session validation failed");
                        SessionError::InvalidSession(other.to_string())
                    }
                })?;

        debug!(user_id = actor.user_id, role = %actor.role, "Session validated");
        Ok(Self(actor, user, token.to_string()))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
    /// The session store could not be read.
    StorageFailure,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            Self::MissingAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Missing Authorization header"),
            ),
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                String::from("Invalid Authorization header format. Expected: 'Bearer <token>'"),
            ),
            Self::InvalidSession(reason) => (StatusCode::UNAUTHORIZED, reason),
            Self::StorageFailure => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from(INTERNAL_ERROR_MESSAGE),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}
