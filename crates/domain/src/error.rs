// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A score is negative or too large to represent.
    InvalidScore(i64),
    /// A matchweek number is outside the supported range.
    InvalidWeekNumber(i64),
    /// A team name or short code is empty or invalid.
    InvalidTeam(String),
    /// A user's display name is empty or invalid.
    InvalidName(String),
    /// An email address is malformed.
    InvalidEmail(String),
    /// Role string is not recognized.
    InvalidRole(String),
    /// Match status string is not recognized.
    InvalidMatchStatus(String),
    /// Pick result string is not recognized.
    InvalidPickResult(String),
    /// A match lists the same team on both sides.
    TeamPlaysItself {
        /// The repeated team.
        team_id: i64,
    },
    /// A team is scheduled more than once within one matchweek.
    TeamScheduledTwice {
        /// The repeated team.
        team_id: i64,
    },
    /// A pick references a team that is on neither side of its match.
    TeamNotInMatch {
        /// The picked team.
        team_id: i64,
        /// The match the pick references.
        match_id: i64,
    },
    /// Matchweek ends before it starts.
    InvalidDateRange {
        /// The start date.
        start_date: time::Date,
        /// The end date.
        end_date: time::Date,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a kickoff timestamp.
    KickoffParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Time zone name is not a known IANA zone.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidScore(score) => {
                write!(
                    f,
                    "Invalid score {score}: scores must be between 0 and 65535"
                )
            }
            Self::InvalidWeekNumber(week) => {
                write!(f, "Invalid week number {week}: must be between 1 and 65535")
            }
            Self::InvalidTeam(msg) => write!(f, "Invalid team: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidRole(role) => write!(f, "Unknown role: {role}"),
            Self::InvalidMatchStatus(status) => write!(f, "Unknown match status: {status}"),
            Self::InvalidPickResult(result) => write!(f, "Unknown pick result: {result}"),
            Self::TeamPlaysItself { team_id } => {
                write!(f, "Team {team_id} cannot play against itself")
            }
            Self::TeamScheduledTwice { team_id } => {
                write!(
                    f,
                    "Team {team_id} is scheduled more than once in the matchweek"
                )
            }
            Self::TeamNotInMatch { team_id, match_id } => {
                write!(f, "Team {team_id} does not play in match {match_id}")
            }
            Self::InvalidDateRange {
                start_date,
                end_date,
            } => write!(
                f,
                "Matchweek end date {end_date} is before start date {start_date}"
            ),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::KickoffParseError { value, error } => {
                write!(f, "Failed to parse kickoff '{value}': {error}")
            }
            Self::InvalidTimezone(zone) => write!(f, "Invalid time zone: {zone}"),
        }
    }
}

impl std::error::Error for DomainError {}
