// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leaderboard standings.
//!
//! Standings are a read-only projection recomputed from picks on every call.
//!
//! ## Ordering Rules
//!
//! Participants are ordered by:
//! 1. Not eliminated before eliminated
//! 2. Last week alive (highest first)
//! 3. Points (highest first)
//! 4. Correct picks (highest first)
//!
//! Remaining ties keep the order participants were supplied in, which the
//! caller fixes as name order.
//!
//! ## Last Week Alive
//!
//! For a surviving participant this is the highest week number they picked
//! in (0 with no picks). For an eliminated participant it is the week of
//! their earliest losing pick. If an eliminated participant has no losing
//! pick, which happens after a score correction because elimination is never
//! reversed, the highest picked week is used and the standing is flagged as
//! inferred.

use crate::types::{Participant, PickResult};
use std::cmp::Ordering;

/// How much per-pick detail a standings computation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandingsScope {
    /// Totals only.
    Summary,
    /// Totals plus every pick ordered by week.
    Detailed,
}

/// One pick as it contributes to the standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingPick {
    /// Owner of the pick.
    pub user_id: i64,
    /// The pick's matchweek.
    pub matchweek_id: i64,
    /// The matchweek's sequence number.
    pub week_number: u16,
    /// Picked team.
    pub team_id: i64,
    /// Picked team's name.
    pub team_name: String,
    /// Picked team's short code.
    pub team_short_name: String,
    /// Picked team's crest.
    pub team_logo_url: Option<String>,
    /// Outcome so far.
    pub result: PickResult,
}

/// A participant's aggregated position on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// 1-based rank.
    pub position: usize,
    /// The participant's id.
    pub user_id: i64,
    /// Display name.
    pub name: String,
    /// Elimination flag.
    pub is_eliminated: bool,
    /// Number of picks made.
    pub total_picks: usize,
    /// Picks resolved as a win or a draw.
    pub correct_picks: usize,
    /// Picks resolved as a loss.
    pub losses: usize,
    /// Sum of pick points.
    pub points: u32,
    /// See the module documentation.
    pub last_week_alive: u16,
    /// Set when an eliminated participant had no losing pick to date it by.
    pub last_week_inferred: bool,
    /// Picks ordered by week; empty in summary scope.
    pub picks: Vec<StandingPick>,
}

/// Computes the ordered leaderboard.
///
/// # Arguments
///
/// * `participants` - Competing users in tie-break order
/// * `picks` - Every pick belonging to those users, in any order
/// * `scope` - Whether to attach per-pick detail
///
/// # Returns
///
/// One standing per participant, sorted and numbered from 1. Picks whose
/// owner is not in `participants` are ignored.
#[must_use]
pub fn compute_standings(
    participants: &[Participant],
    picks: &[StandingPick],
    scope: StandingsScope,
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = participants
        .iter()
        .map(|participant| {
            let mut own: Vec<StandingPick> = picks
                .iter()
                .filter(|pick| pick.user_id == participant.user_id)
                .cloned()
                .collect();
            own.sort_by_key(|pick| pick.week_number);
            aggregate(participant, own, scope)
        })
        .collect();

    standings.sort_by(compare_standings);

    for (index, standing) in standings.iter_mut().enumerate() {
        standing.position = index + 1;
    }

    standings
}

fn aggregate(participant: &Participant, own: Vec<StandingPick>, scope: StandingsScope) -> Standing {
    let correct_picks: usize = own
        .iter()
        .filter(|pick| pick.result.is_correct() == Some(true))
        .count();
    let losses: usize = own
        .iter()
        .filter(|pick| pick.result == PickResult::Loss)
        .count();
    let points: u32 = own.iter().map(|pick| pick.result.points()).sum();
    let latest_week: u16 = own.iter().map(|pick| pick.week_number).max().unwrap_or(0);

    let (last_week_alive, last_week_inferred) = if participant.is_eliminated {
        own.iter()
            .find(|pick| pick.result == PickResult::Loss)
            .map_or((latest_week, true), |loss| (loss.week_number, false))
    } else {
        (latest_week, false)
    };

    Standing {
        position: 0,
        user_id: participant.user_id,
        name: participant.name.clone(),
        is_eliminated: participant.is_eliminated,
        total_picks: own.len(),
        correct_picks,
        losses,
        points,
        last_week_alive,
        last_week_inferred,
        picks: match scope {
            StandingsScope::Summary => Vec::new(),
            StandingsScope::Detailed => own,
        },
    }
}

fn compare_standings(a: &Standing, b: &Standing) -> Ordering {
    a.is_eliminated
        .cmp(&b.is_eliminated)
        .then_with(|| b.last_week_alive.cmp(&a.last_week_alive))
        .then_with(|| b.points.cmp(&a.points))
        .then_with(|| b.correct_picks.cmp(&a.correct_picks))
}
