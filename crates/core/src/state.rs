// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loaded contexts and the write plans derived from them.
//!
//! A context is read inside the same transaction that later applies the
//! plan, so every precondition checked against it still holds at write time.

use std::collections::HashSet;
use survivor_pool_domain::{Match, Matchweek, NewMatch, Pick, PickHistoryEntry, PickResult};

/// Everything `plan_pick` needs to know about the caller and the matchweek.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickContext {
    /// The target matchweek, if it exists.
    pub matchweek: Option<Matchweek>,
    /// The caller's entire pick history.
    pub history: Vec<PickHistoryEntry>,
    /// The active match in the matchweek featuring the team, if any.
    pub playing_match: Option<Match>,
    /// The caller's current pick for the matchweek, if any.
    pub existing_pick: Option<Pick>,
}

/// How a pick row is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickWrite {
    /// First pick of the matchweek.
    Insert {
        /// Owner.
        user_id: i64,
        /// Matchweek.
        matchweek_id: i64,
        /// Chosen team.
        team_id: i64,
        /// The team's match.
        match_id: i64,
    },
    /// Overwrite the existing pick and reset its result to pending.
    Update {
        /// The pick being changed.
        pick_id: i64,
        /// Chosen team.
        team_id: i64,
        /// The team's match.
        match_id: i64,
    },
}

impl PickWrite {
    /// Whether this write creates a new pick.
    #[must_use]
    pub const fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }

    /// The match the written pick references.
    #[must_use]
    pub const fn match_id(&self) -> i64 {
        match self {
            Self::Insert { match_id, .. } | Self::Update { match_id, .. } => *match_id,
        }
    }
}

/// How the caller's pick history changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryChange {
    /// The team did not change.
    Unchanged,
    /// Claim `claimed_team_id` for this matchweek, releasing the previous
    /// team of the same matchweek if there was one.
    Claim {
        /// Owner.
        user_id: i64,
        /// Matchweek.
        matchweek_id: i64,
        /// Team given back by a change of mind.
        released_team_id: Option<i64>,
        /// Team now consumed.
        claimed_team_id: i64,
    },
}

/// The writes a pick submission performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickPlan {
    /// The pick row write.
    pub write: PickWrite,
    /// The history reconciliation.
    pub history: HistoryChange,
}

/// Everything `resolve_match` needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FinalizeContext {
    /// The target match, if it exists.
    pub fixture: Option<Match>,
    /// Every pick referencing the match.
    pub picks: Vec<Pick>,
}

/// The new result of one pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickResolution {
    /// The pick.
    pub pick_id: i64,
    /// Its owner.
    pub user_id: i64,
    /// The classified outcome.
    pub result: PickResult,
}

/// The writes a finalization performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizePlan {
    /// The match being finalized.
    pub match_id: i64,
    /// Home score to store.
    pub home_score: u16,
    /// Away score to store.
    pub away_score: u16,
    /// One entry per pick on the match.
    pub resolutions: Vec<PickResolution>,
    /// Owners of losing picks, deduplicated and sorted.
    pub eliminate_user_ids: Vec<i64>,
}

impl FinalizePlan {
    /// Number of picks resolved.
    #[must_use]
    pub const fn processed_count(&self) -> usize {
        self.resolutions.len()
    }

    /// Number of losing picks.
    #[must_use]
    pub fn losing_count(&self) -> usize {
        self.resolutions
            .iter()
            .filter(|r| r.result == PickResult::Loss)
            .count()
    }
}

/// The writes a matchweek activation change performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationPlan {
    /// Target matchweek.
    pub matchweek_id: i64,
    /// Desired state.
    pub is_active: bool,
    /// Clear every other matchweek first.
    pub deactivate_others: bool,
}

/// Everything a slate replacement or removal needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlateContext {
    /// The target matchweek, if it exists.
    pub matchweek: Option<Matchweek>,
    /// Ids of every team in the league.
    pub known_team_ids: HashSet<i64>,
    /// Picks referencing the matchweek's current matches.
    pub pick_count: usize,
}

/// The writes a slate replacement performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlatePlan {
    /// Target matchweek.
    pub matchweek_id: i64,
    /// Matches to insert after the existing ones are removed.
    pub matches: Vec<NewMatch>,
}
