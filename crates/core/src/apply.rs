// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{
    Actor, FinalizeMatch, ReplaceMatches, SetMatchesActive, SetMatchweekActive, SubmitPick,
};
use crate::error::CoreError;
use crate::state::{
    ActivationPlan, FinalizeContext, FinalizePlan, HistoryChange, PickContext, PickPlan,
    PickResolution, PickWrite, SlateContext, SlatePlan,
};
use survivor_pool_domain::{
    Match, Matchweek, PickHistoryEntry, PickResult, classify_pick, validate_match_slate,
};

/// Plans a pick submission.
///
/// Preconditions are checked in a fixed order and the first failure wins:
/// 1. The caller is not an administrator
/// 2. The matchweek exists
/// 3. The matchweek is active
/// 4. The team is not in the caller's history for another matchweek
/// 5. The team has an active match in the matchweek
///
/// # Arguments
///
/// * `actor` - The caller
/// * `context` - The loaded matchweek, history, match and existing pick
/// * `command` - The submission
///
/// # Returns
///
/// * `Ok(PickPlan)` describing the pick write and history reconciliation
/// * `Err(CoreError)` naming the first failed precondition
///
/// # Errors
///
/// Returns an error if any precondition above fails.
pub fn plan_pick(
    actor: &Actor,
    context: &PickContext,
    command: SubmitPick,
) -> Result<PickPlan, CoreError> {
    if actor.role.is_admin() {
        return Err(CoreError::AdministratorCannotPick);
    }

    let matchweek: &Matchweek = context
        .matchweek
        .as_ref()
        .filter(|mw| mw.matchweek_id == command.matchweek_id)
        .ok_or(CoreError::MatchweekNotFound(command.matchweek_id))?;

    if !matchweek.is_active {
        return Err(CoreError::MatchweekClosed {
            matchweek_id: matchweek.matchweek_id,
        });
    }

    // Re-submitting the current week's team is not a reuse
    if let Some(used) = context.history.iter().find(|entry: &&PickHistoryEntry| {
        entry.user_id == actor.user_id
            && entry.team_id == command.team_id
            && entry.matchweek_id != command.matchweek_id
    }) {
        return Err(CoreError::TeamAlreadyUsed {
            team_id: command.team_id,
            used_in_matchweek_id: used.matchweek_id,
        });
    }

    let fixture: &Match = context
        .playing_match
        .as_ref()
        .filter(|m| {
            m.matchweek_id == command.matchweek_id && m.is_active && m.involves(command.team_id)
        })
        .ok_or(CoreError::TeamNotPlaying {
            team_id: command.team_id,
            matchweek_id: command.matchweek_id,
        })?;

    let plan: PickPlan = match &context.existing_pick {
        Some(existing) => PickPlan {
            write: PickWrite::Update {
                pick_id: existing.pick_id,
                team_id: command.team_id,
                match_id: fixture.match_id,
            },
            history: if existing.team_id == command.team_id {
                HistoryChange::Unchanged
            } else {
                HistoryChange::Claim {
                    user_id: actor.user_id,
                    matchweek_id: command.matchweek_id,
                    released_team_id: Some(existing.team_id),
                    claimed_team_id: command.team_id,
                }
            },
        },
        None => PickPlan {
            write: PickWrite::Insert {
                user_id: actor.user_id,
                matchweek_id: command.matchweek_id,
                team_id: command.team_id,
                match_id: fixture.match_id,
            },
            history: HistoryChange::Claim {
                user_id: actor.user_id,
                matchweek_id: command.matchweek_id,
                released_team_id: None,
                claimed_team_id: command.team_id,
            },
        },
    };

    Ok(plan)
}

/// Plans the resolution of every pick on a finished match.
///
/// Results are recomputed from scratch on every call, so re-finalizing with
/// the same score yields the same plan. The plan only ever adds users to the
/// eliminated set; it never names users to restore.
///
/// # Arguments
///
/// * `context` - The match and every pick referencing it
/// * `command` - The final score
///
/// # Errors
///
/// Returns an error if:
/// - The match does not exist
/// - A pick's team plays on neither side of the match
pub fn resolve_match(
    context: &FinalizeContext,
    command: FinalizeMatch,
) -> Result<FinalizePlan, CoreError> {
    let fixture: &Match = context
        .fixture
        .as_ref()
        .filter(|m| m.match_id == command.match_id)
        .ok_or(CoreError::MatchNotFound(command.match_id))?;

    let mut resolutions: Vec<PickResolution> = Vec::with_capacity(context.picks.len());
    for pick in &context.picks {
        let result: PickResult = classify_pick(
            fixture,
            pick.team_id,
            command.home_score,
            command.away_score,
        )?;
        resolutions.push(PickResolution {
            pick_id: pick.pick_id,
            user_id: pick.user_id,
            result,
        });
    }

    let mut eliminate_user_ids: Vec<i64> = resolutions
        .iter()
        .filter(|r| r.result.is_correct() == Some(false))
        .map(|r| r.user_id)
        .collect();
    eliminate_user_ids.sort_unstable();
    eliminate_user_ids.dedup();

    Ok(FinalizePlan {
        match_id: fixture.match_id,
        home_score: command.home_score,
        away_score: command.away_score,
        resolutions,
        eliminate_user_ids,
    })
}

/// Plans a matchweek activation change.
///
/// Activating clears every other matchweek in the same write; deactivating
/// touches only the target.
///
/// # Errors
///
/// Returns `CoreError::MatchweekNotFound` if the matchweek does not exist.
pub fn plan_matchweek_activation(
    matchweek: Option<&Matchweek>,
    command: SetMatchweekActive,
) -> Result<ActivationPlan, CoreError> {
    let matchweek: &Matchweek = matchweek
        .filter(|mw| mw.matchweek_id == command.matchweek_id)
        .ok_or(CoreError::MatchweekNotFound(command.matchweek_id))?;

    Ok(ActivationPlan {
        matchweek_id: matchweek.matchweek_id,
        is_active: command.is_active,
        deactivate_others: command.is_active,
    })
}

/// Plans a full replacement of a matchweek's matches.
///
/// # Errors
///
/// Returns an error if:
/// - The matchweek does not exist
/// - The slate is structurally invalid
/// - A referenced team does not exist
/// - Picks reference the matches being replaced
pub fn plan_slate_replacement(
    context: &SlateContext,
    command: ReplaceMatches,
) -> Result<SlatePlan, CoreError> {
    let matchweek: &Matchweek = context
        .matchweek
        .as_ref()
        .filter(|mw| mw.matchweek_id == command.matchweek_id)
        .ok_or(CoreError::MatchweekNotFound(command.matchweek_id))?;

    validate_match_slate(&command.matches)?;

    for fixture in &command.matches {
        for team_id in [fixture.home_team_id, fixture.away_team_id] {
            if !context.known_team_ids.contains(&team_id) {
                return Err(CoreError::TeamNotFound(team_id));
            }
        }
    }

    ensure_no_picks(matchweek, context.pick_count)?;

    Ok(SlatePlan {
        matchweek_id: matchweek.matchweek_id,
        matches: command.matches,
    })
}

/// Plans the removal of every match in a matchweek looked up by week number.
///
/// # Returns
///
/// The id of the matchweek whose matches are removed.
///
/// # Errors
///
/// Returns an error if:
/// - No matchweek has `week_number`
/// - Picks reference the matches being removed
pub fn plan_slate_removal(context: &SlateContext, week_number: u16) -> Result<i64, CoreError> {
    let matchweek: &Matchweek = context
        .matchweek
        .as_ref()
        .filter(|mw| mw.week_number == week_number)
        .ok_or(CoreError::WeekNumberNotFound(week_number))?;

    ensure_no_picks(matchweek, context.pick_count)?;
    Ok(matchweek.matchweek_id)
}

/// Normalizes a bulk match activity change.
///
/// # Returns
///
/// The distinct match ids in first-seen order.
///
/// # Errors
///
/// Returns `CoreError::EmptyMatchSelection` if no ids were supplied.
pub fn plan_match_activity(command: &SetMatchesActive) -> Result<Vec<i64>, CoreError> {
    if command.match_ids.is_empty() {
        return Err(CoreError::EmptyMatchSelection);
    }

    let mut distinct: Vec<i64> = Vec::with_capacity(command.match_ids.len());
    for id in &command.match_ids {
        if !distinct.contains(id) {
            distinct.push(*id);
        }
    }
    Ok(distinct)
}

const fn ensure_no_picks(matchweek: &Matchweek, pick_count: usize) -> Result<(), CoreError> {
    if pick_count > 0 {
        return Err(CoreError::MatchesHavePicks {
            matchweek_id: matchweek.matchweek_id,
            pick_count,
        });
    }
    Ok(())
}
