// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use survivor_pool::CoreError;
use survivor_pool_domain::DomainError;
use survivor_pool_persistence::PersistenceError;
use tracing::error;

/// Message returned to callers in place of any internal failure detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be identified.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is identified but may not perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Account or session storage could not be read or written.
    StorageFailure {
        /// A description of the failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden {
                action,
                required_role,
            } => {
                write!(f, "Forbidden: '{action}' requires {required_role} role")
            }
            Self::StorageFailure { message } => write!(f, "Session storage failed: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, unknown or expired credentials.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller's role does not permit the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A referenced resource does not exist.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation is not legal given the current matchweek or match state.
    InvalidState {
        /// The rule that blocked the operation.
        rule: String,
        /// A human-readable description.
        message: String,
    },
    /// A uniqueness rule would be violated.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description.
        message: String,
    },
    /// Malformed or out-of-range input.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An unexpected failure. The message never carries internal detail once
    /// it leaves this crate.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden {
                action,
                required_role,
            } => {
                write!(f, "Forbidden: '{action}' requires {required_role} role")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidState { rule, message } => {
                write!(f, "Invalid state ({rule}): {message}")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Logs an internal failure against the operation that raised it and
    /// replaces its detail with an opaque message. Other errors pass through
    /// unchanged.
    ///
    /// # Arguments
    ///
    /// * `operation` - The operation name
    /// * `ids` - The ids involved, as `key=value` pairs
    #[must_use]
    pub fn in_operation(self, operation: &str, ids: &str) -> Self {
        match self {
            Self::Internal { message } => {
                error!(operation, ids, error = %message, "Operation failed");
                Self::Internal {
                    message: String::from(INTERNAL_ERROR_MESSAGE),
                }
            }
            other => other,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Forbidden {
                action,
                required_role,
            } => Self::Forbidden {
                action,
                required_role,
            },
            AuthError::StorageFailure { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("password"),
            message: err.to_string(),
        }
    }
}

/// Storage failures are internal unless a handler maps them explicitly,
/// as with [`conflict_on_duplicate`].
impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Maps a unique-constraint rejection to `ApiError::Conflict`.
///
/// # Arguments
///
/// * `rule` - The uniqueness rule name
/// * `message` - The caller-facing description
#[must_use]
pub fn conflict_on_duplicate(
    rule: &str,
    message: String,
) -> impl FnOnce(PersistenceError) -> ApiError {
    let rule: String = rule.to_string();
    move |err: PersistenceError| match err {
        PersistenceError::UniqueViolation(_) => ApiError::Conflict { rule, message },
        other => ApiError::from(other),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidScore(score) => ApiError::InvalidInput {
            field: String::from("score"),
            message: format!("Invalid score {score}: must be between 0 and 65535"),
        },
        DomainError::InvalidWeekNumber(week) => ApiError::InvalidInput {
            field: String::from("week_number"),
            message: format!("Invalid week number {week}: must be between 1 and 65535"),
        },
        DomainError::InvalidTeam(msg) => ApiError::InvalidInput {
            field: String::from("team"),
            message: msg,
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidEmail(email) => ApiError::InvalidInput {
            field: String::from("email"),
            message: format!("'{email}' is not a valid email address"),
        },
        DomainError::TeamPlaysItself { team_id } => ApiError::InvalidInput {
            field: String::from("matches"),
            message: format!("Team {team_id} cannot play itself"),
        },
        DomainError::TeamScheduledTwice { team_id } => ApiError::InvalidInput {
            field: String::from("matches"),
            message: format!("Team {team_id} appears in more than one match"),
        },
        DomainError::InvalidDateRange {
            start_date,
            end_date,
        } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message: format!("End date {end_date} is before start date {start_date}"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::KickoffParseError { value, error } => ApiError::InvalidInput {
            field: String::from("kickoff"),
            message: format!("Failed to parse kickoff '{value}': {error}"),
        },
        DomainError::TeamNotInMatch { team_id, match_id } => ApiError::InvalidState {
            rule: String::from("pick_team_in_match"),
            message: format!("Team {team_id} does not play in match {match_id}"),
        },
        // Stored values that fail to parse are data corruption, not input.
        corrupt @ (DomainError::InvalidRole(_)
        | DomainError::InvalidMatchStatus(_)
        | DomainError::InvalidPickResult(_)
        | DomainError::InvalidTimezone(_)) => ApiError::Internal {
            message: corrupt.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::AdministratorCannotPick => ApiError::Forbidden {
            action: String::from("submit_pick"),
            required_role: String::from("user"),
        },
        CoreError::MatchweekNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Matchweek"),
            message: format!("Matchweek {id} does not exist"),
        },
        CoreError::WeekNumberNotFound(week) => ApiError::ResourceNotFound {
            resource_type: String::from("Matchweek"),
            message: format!("No matchweek has week number {week}"),
        },
        CoreError::MatchweekClosed { matchweek_id } => ApiError::InvalidState {
            rule: String::from("matchweek_active"),
            message: format!("Matchweek {matchweek_id} is not active; changes are closed"),
        },
        CoreError::TeamAlreadyUsed {
            team_id,
            used_in_matchweek_id,
        } => ApiError::Conflict {
            rule: String::from("team_used_once"),
            message: format!(
                "Team {team_id} was already used in matchweek {used_in_matchweek_id}"
            ),
        },
        CoreError::TeamNotPlaying {
            team_id,
            matchweek_id,
        } => ApiError::InvalidState {
            rule: String::from("team_has_active_match"),
            message: format!(
                "Team {team_id} does not play in matchweek {matchweek_id} or its match is inactive"
            ),
        },
        CoreError::MatchNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Match"),
            message: format!("Match {id} does not exist"),
        },
        CoreError::TeamNotFound(id) => ApiError::InvalidInput {
            field: String::from("matches"),
            message: format!("Team {id} does not exist"),
        },
        CoreError::MatchesHavePicks {
            matchweek_id,
            pick_count,
        } => ApiError::Conflict {
            rule: String::from("matches_without_picks"),
            message: format!(
                "{pick_count} pick(s) reference the matches of matchweek {matchweek_id}"
            ),
        },
        CoreError::EmptyMatchSelection => ApiError::InvalidInput {
            field: String::from("match_ids"),
            message: String::from("At least one match id is required"),
        },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
