// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport-agnostic operation layer for the survivor pool.
//!
//! Handlers take typed request records, authenticate and authorize the
//! caller, validate input, and run each operation in one unit of work.
//! Every inner error reaches callers only through [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, IssuedSession};
pub use error::{
    ApiError, AuthError, INTERNAL_ERROR_MESSAGE, conflict_on_duplicate, translate_core_error,
    translate_domain_error,
};
pub use handlers::{
    available_teams, bootstrap_admin, create_matchweek, create_team, current_matchweek,
    current_week_matches, delete_matches_by_week, finalize_match, leaderboard, list_all_matches,
    list_matchweeks, list_teams, login, logout, matches_by_week, own_picks, register,
    replace_matches, set_matches_active, set_matchweek_active, submit_pick, weekly_selections,
    whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AckResponse, AffectedCountResponse, CreateMatchweekRequest, CreateTeamRequest,
    CreatedCountResponse, CurrentWeekMatchesResponse, DeletedCountResponse, FinalizeMatchRequest,
    FinalizeMatchResponse, LoginRequest, LoginResponse, MatchEntry, MatchInfo, MatchweekInfo,
    OwnPickInfo, PickOutcome, RegisterRequest, RegisterResponse, ReplaceMatchesRequest,
    SetMatchesActiveRequest, SetMatchweekActiveRequest, StandingInfo, StandingPickInfo,
    SubmitPickRequest, SubmitPickResponse, TeamInfo, UserInfo, WeeklySelectionInfo,
};
pub use survivor_pool_domain::{Role, StandingsScope};
