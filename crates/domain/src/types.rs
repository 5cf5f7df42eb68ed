// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, PrimitiveDateTime};

/// Account role.
///
/// Administrators run the pool but never compete in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A competing participant.
    #[default]
    User,
    /// A pool administrator.
    Superadmin,
}

impl Role {
    /// Returns the stored string form of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Superadmin => "superadmin",
        }
    }

    /// Whether this role may run administrative operations.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Superadmin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A competing user as seen by the standings computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// The user's id.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Whether a losing pick has eliminated this user.
    pub is_eliminated: bool,
}

/// A club that can be picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// The team's id.
    pub team_id: i64,
    /// Full display name, unique across the league.
    pub name: String,
    /// Short code, e.g. "AME".
    pub short_name: String,
    /// Crest image reference.
    pub logo_url: Option<String>,
    /// Home venue.
    pub stadium: Option<String>,
}

/// A season round grouping matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchweek {
    /// The matchweek's id.
    pub matchweek_id: i64,
    /// Sequence number, unique within the season.
    pub week_number: u16,
    /// Optional label, e.g. "Jornada 7".
    pub name: Option<String>,
    /// Optional season label.
    pub season: Option<String>,
    /// First day of the round.
    pub start_date: Date,
    /// Last day of the round.
    pub end_date: Date,
    /// Whether picks are currently open for this round.
    pub is_active: bool,
}

/// Lifecycle status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Not yet started.
    #[default]
    Scheduled,
    /// In progress.
    Live,
    /// Final score recorded.
    Finished,
}

impl MatchStatus {
    /// Returns the stored string form of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Live => "live",
            Self::Finished => "finished",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "live" => Ok(Self::Live),
            "finished" => Ok(Self::Finished),
            _ => Err(DomainError::InvalidMatchStatus(s.to_string())),
        }
    }
}

/// Which side of a fixture a team occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The home team.
    Home,
    /// The away team.
    Away,
}

/// A fixture between two distinct teams within one matchweek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// The match's id.
    pub match_id: i64,
    /// The matchweek this match belongs to.
    pub matchweek_id: i64,
    /// Home team.
    pub home_team_id: i64,
    /// Away team.
    pub away_team_id: i64,
    /// Scheduled kickoff in league-local civil time.
    pub kickoff: PrimitiveDateTime,
    /// Lifecycle status.
    pub status: MatchStatus,
    /// Suspended matches are excluded from picking.
    pub is_active: bool,
    /// Home score once entered.
    pub home_score: Option<u16>,
    /// Away score once entered.
    pub away_score: Option<u16>,
}

impl Match {
    /// Returns the side `team_id` occupies, or `None` if it does not play here.
    #[must_use]
    pub const fn side_of(&self, team_id: i64) -> Option<Side> {
        if self.home_team_id == team_id {
            Some(Side::Home)
        } else if self.away_team_id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Whether `team_id` plays in this match.
    #[must_use]
    pub const fn involves(&self, team_id: i64) -> bool {
        self.side_of(team_id).is_some()
    }
}

/// A fixture to be created by a bulk replacement, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    /// Home team.
    pub home_team_id: i64,
    /// Away team.
    pub away_team_id: i64,
    /// Scheduled kickoff.
    pub kickoff: PrimitiveDateTime,
}

/// Outcome of a pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PickResult {
    /// The match has not been finalized.
    #[default]
    Pending,
    /// The picked team won.
    Win,
    /// The match was drawn.
    Draw,
    /// The picked team lost.
    Loss,
}

impl PickResult {
    /// Returns the stored string form of this result.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Win => "win",
            Self::Draw => "draw",
            Self::Loss => "loss",
        }
    }

    /// Whether the pick survived: `None` while pending.
    ///
    /// Draws survive.
    #[must_use]
    pub const fn is_correct(&self) -> Option<bool> {
        match self {
            Self::Pending => None,
            Self::Win | Self::Draw => Some(true),
            Self::Loss => Some(false),
        }
    }

    /// Leaderboard points: win 3, draw 1, otherwise 0.
    #[must_use]
    pub const fn points(&self) -> u32 {
        match self {
            Self::Win => 3,
            Self::Draw => 1,
            Self::Pending | Self::Loss => 0,
        }
    }
}

impl FromStr for PickResult {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "win" => Ok(Self::Win),
            "draw" => Ok(Self::Draw),
            "loss" => Ok(Self::Loss),
            _ => Err(DomainError::InvalidPickResult(s.to_string())),
        }
    }
}

/// A user's team selection for one matchweek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    /// The pick's id.
    pub pick_id: i64,
    /// Owner.
    pub user_id: i64,
    /// Matchweek the pick belongs to.
    pub matchweek_id: i64,
    /// Chosen team.
    pub team_id: i64,
    /// The match the chosen team plays in that matchweek.
    pub match_id: i64,
    /// Current outcome.
    pub result: PickResult,
}

/// Records which matchweek consumed a team for a user.
///
/// At most one entry exists per `(user_id, team_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickHistoryEntry {
    /// Owner.
    pub user_id: i64,
    /// Consumed team.
    pub team_id: i64,
    /// Matchweek that consumed it.
    pub matchweek_id: i64,
}
