// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_domain::DomainError;

/// Errors that can occur while planning an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Administrators do not compete.
    AdministratorCannotPick,
    /// Matchweek does not exist.
    MatchweekNotFound(i64),
    /// No matchweek has the given week number.
    WeekNumberNotFound(u16),
    /// Picks for the matchweek are closed.
    MatchweekClosed {
        /// The closed matchweek.
        matchweek_id: i64,
    },
    /// The caller already consumed this team in another matchweek.
    TeamAlreadyUsed {
        /// The team.
        team_id: i64,
        /// The matchweek that consumed it.
        used_in_matchweek_id: i64,
    },
    /// The team has no active match in the matchweek.
    TeamNotPlaying {
        /// The team.
        team_id: i64,
        /// The matchweek.
        matchweek_id: i64,
    },
    /// Match does not exist.
    MatchNotFound(i64),
    /// Team does not exist.
    TeamNotFound(i64),
    /// Removing the matchweek's matches would orphan picks.
    MatchesHavePicks {
        /// The matchweek.
        matchweek_id: i64,
        /// Number of picks referencing its matches.
        pick_count: usize,
    },
    /// A bulk activity change named no matches.
    EmptyMatchSelection,
    /// A domain rule was violated.
    DomainViolation(DomainError),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdministratorCannotPick => {
                write!(f, "Administrators cannot take part in the pool")
            }
            Self::MatchweekNotFound(id) => write!(f, "Matchweek {id} not found"),
            Self::WeekNumberNotFound(week) => write!(f, "Week {week} not found"),
            Self::MatchweekClosed { matchweek_id } => write!(
                f,
                "Matchweek {matchweek_id} is not active; changes are closed"
            ),
            Self::TeamAlreadyUsed {
                team_id,
                used_in_matchweek_id,
            } => write!(
                f,
                "Team {team_id} was already used in matchweek {used_in_matchweek_id}"
            ),
            Self::TeamNotPlaying {
                team_id,
                matchweek_id,
            } => write!(
                f,
                "Team {team_id} does not play in matchweek {matchweek_id} or its match is inactive"
            ),
            Self::MatchNotFound(id) => write!(f, "Match {id} not found"),
            Self::TeamNotFound(id) => write!(f, "Team {id} not found"),
            Self::MatchesHavePicks {
                matchweek_id,
                pick_count,
            } => write!(
                f,
                "Matchweek {matchweek_id} has {pick_count} pick(s) on its matches"
            ),
            Self::EmptyMatchSelection => write!(f, "At least one match id is required"),
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
