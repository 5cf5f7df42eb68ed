// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pick and pick-history mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use survivor_pool::{FinalizePlan, HistoryChange, PickPlan, PickWrite};
use survivor_pool_domain::PickResult;
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::{user_selections, user_team_history};
use crate::error::PersistenceError;
use crate::mutations::league::record_final_score;
use crate::mutations::users::eliminate_users;

/// Writes a planned pick and reconciles the history.
///
/// A written pick always starts pending with no correctness flag.
///
/// # Returns
///
/// The id of the written pick.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn apply_pick_plan(
    conn: &mut SqliteConnection,
    plan: &PickPlan,
    now: &str,
) -> Result<i64, PersistenceError> {
    let pick_id: i64 = match plan.write {
        PickWrite::Insert {
            user_id,
            matchweek_id,
            team_id,
            match_id,
        } => {
            diesel::insert_into(user_selections::table)
                .values((
                    user_selections::user_id.eq(user_id),
                    user_selections::matchweek_id.eq(matchweek_id),
                    user_selections::team_id.eq(team_id),
                    user_selections::match_id.eq(match_id),
                    user_selections::result.eq(PickResult::Pending.as_str()),
                    user_selections::is_correct.eq(None::<i32>),
                    user_selections::created_at.eq(now),
                    user_selections::updated_at.eq(now),
                ))
                .execute(conn)?;
            last_insert_rowid(conn)?
        }
        PickWrite::Update {
            pick_id,
            team_id,
            match_id,
        } => {
            diesel::update(user_selections::table.find(pick_id))
                .set((
                    user_selections::team_id.eq(team_id),
                    user_selections::match_id.eq(match_id),
                    user_selections::result.eq(PickResult::Pending.as_str()),
                    user_selections::is_correct.eq(None::<i32>),
                    user_selections::updated_at.eq(now),
                ))
                .execute(conn)?;
            pick_id
        }
    };

    if let HistoryChange::Claim {
        user_id,
        matchweek_id,
        released_team_id,
        claimed_team_id,
    } = plan.history
    {
        if let Some(released) = released_team_id {
            let removed: usize = diesel::delete(
                user_team_history::table
                    .filter(user_team_history::user_id.eq(user_id))
                    .filter(user_team_history::team_id.eq(released))
                    .filter(user_team_history::matchweek_id.eq(matchweek_id)),
            )
            .execute(conn)?;
            debug!(user_id, team_id = released, removed, "Released team");
        }

        diesel::insert_into(user_team_history::table)
            .values((
                user_team_history::user_id.eq(user_id),
                user_team_history::team_id.eq(claimed_team_id),
                user_team_history::matchweek_id.eq(matchweek_id),
                user_team_history::created_at.eq(now),
                user_team_history::updated_at.eq(now),
            ))
            .on_conflict((user_team_history::user_id, user_team_history::team_id))
            .do_update()
            .set((
                user_team_history::matchweek_id.eq(matchweek_id),
                user_team_history::updated_at.eq(now),
            ))
            .execute(conn)?;
    }

    Ok(pick_id)
}

/// Writes a match finalization: score, pick results, eliminations.
///
/// # Returns
///
/// The number of users newly eliminated.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn apply_finalize_plan(
    conn: &mut SqliteConnection,
    plan: &FinalizePlan,
    now: &str,
) -> Result<usize, PersistenceError> {
    record_final_score(conn, plan.match_id, plan.home_score, plan.away_score, now)?;

    for resolution in &plan.resolutions {
        diesel::update(user_selections::table.find(resolution.pick_id))
            .set((
                user_selections::result.eq(resolution.result.as_str()),
                user_selections::is_correct.eq(resolution.result.is_correct().map(i32::from)),
                user_selections::updated_at.eq(now),
            ))
            .execute(conn)?;
    }

    let newly_eliminated: usize = eliminate_users(conn, &plan.eliminate_user_ids, now)?;

    info!(
        match_id = plan.match_id,
        processed = plan.processed_count(),
        losing = plan.losing_count(),
        newly_eliminated,
        "Finalized match"
    );
    Ok(newly_eliminated)
}
