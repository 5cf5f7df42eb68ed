// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod availability;
mod clock;
mod error;
mod outcome;
mod standings;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use availability::available_teams;
pub use clock::{Clock, DEFAULT_TIMEZONE, FixedClock, SystemClock, parse_timezone};
pub use outcome::{classify_outcome, classify_pick};
pub use standings::{Standing, StandingPick, StandingsScope, compute_standings};

// Re-export public types
pub use error::DomainError;
pub use types::{
    Match, MatchStatus, Matchweek, NewMatch, Participant, Pick, PickHistoryEntry, PickResult, Role,
    Side, Team,
};
pub use validation::{
    format_date, format_kickoff, parse_date, parse_kickoff, validate_account_fields,
    validate_match_slate, validate_matchweek_dates, validate_score, validate_team_fields,
    validate_week_number,
};

pub use chrono_tz::Tz;
