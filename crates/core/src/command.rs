// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_domain::{NewMatch, Role};

/// The caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The caller's user id.
    pub user_id: i64,
    /// The caller's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Submit or change the caller's pick for a matchweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPick {
    /// The team being picked.
    pub team_id: i64,
    /// The matchweek the pick is for.
    pub matchweek_id: i64,
}

/// Record a final score and resolve every pick on the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeMatch {
    /// The match being finalized.
    pub match_id: i64,
    /// Validated home score.
    pub home_score: u16,
    /// Validated away score.
    pub away_score: u16,
}

/// Open or close a matchweek for picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMatchweekActive {
    /// Target matchweek.
    pub matchweek_id: i64,
    /// Desired state.
    pub is_active: bool,
}

/// Replace every match of a matchweek with a new slate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceMatches {
    /// Target matchweek.
    pub matchweek_id: i64,
    /// The complete new slate.
    pub matches: Vec<NewMatch>,
}

/// Suspend or reinstate a set of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMatchesActive {
    /// Target matches.
    pub match_ids: Vec<i64>,
    /// Desired state.
    pub is_active: bool,
}
