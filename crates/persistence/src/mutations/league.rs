// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Team, matchweek and match mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use survivor_pool::{ActivationPlan, SlatePlan};
use survivor_pool_domain::{MatchStatus, format_date, format_kickoff};
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::{NewMatchweek, NewTeam};
use crate::diesel_schema::{matches, matchweeks, teams};
use crate::error::PersistenceError;

/// Creates a team.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the name is taken.
pub fn create_team(
    conn: &mut SqliteConnection,
    team: &NewTeam,
    now: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(teams::table)
        .values((
            teams::name.eq(team.name.trim()),
            teams::short_name.eq(team.short_name.trim()),
            teams::logo_url.eq(team.logo_url.as_deref()),
            teams::stadium.eq(team.stadium.as_deref()),
            teams::created_at.eq(now),
        ))
        .execute(conn)?;

    let team_id: i64 = last_insert_rowid(conn)?;
    info!(team_id, name = %team.name, "Created team");
    Ok(team_id)
}

/// Creates an inactive matchweek.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the week number is taken.
pub fn create_matchweek(
    conn: &mut SqliteConnection,
    matchweek: &NewMatchweek,
    now: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(matchweeks::table)
        .values((
            matchweeks::week_number.eq(i32::from(matchweek.week_number)),
            matchweeks::name.eq(matchweek.name.as_deref()),
            matchweeks::season.eq(matchweek.season.as_deref()),
            matchweeks::start_date.eq(format_date(matchweek.start_date)),
            matchweeks::end_date.eq(format_date(matchweek.end_date)),
            matchweeks::is_active.eq(0),
            matchweeks::created_at.eq(now),
            matchweeks::updated_at.eq(now),
        ))
        .execute(conn)?;

    let matchweek_id: i64 = last_insert_rowid(conn)?;
    info!(
        matchweek_id,
        week_number = matchweek.week_number,
        "Created matchweek"
    );
    Ok(matchweek_id)
}

/// Applies a matchweek activation change.
///
/// Other matchweeks are cleared before the target is set, so the partial
/// unique index on `is_active` never sees two active rows.
///
/// # Errors
///
/// Returns an error if either update fails.
pub fn apply_activation(
    conn: &mut SqliteConnection,
    plan: &ActivationPlan,
    now: &str,
) -> Result<(), PersistenceError> {
    if plan.deactivate_others {
        let cleared: usize = diesel::update(matchweeks::table)
            .filter(matchweeks::matchweek_id.ne(plan.matchweek_id))
            .filter(matchweeks::is_active.eq(1))
            .set((matchweeks::is_active.eq(0), matchweeks::updated_at.eq(now)))
            .execute(conn)?;
        debug!(cleared, "Deactivated other matchweeks");
    }

    diesel::update(matchweeks::table.find(plan.matchweek_id))
        .set((
            matchweeks::is_active.eq(i32::from(plan.is_active)),
            matchweeks::updated_at.eq(now),
        ))
        .execute(conn)?;

    info!(
        matchweek_id = plan.matchweek_id,
        is_active = plan.is_active,
        "Matchweek activation changed"
    );
    Ok(())
}

/// Replaces every match in a matchweek with the planned slate.
///
/// New matches start scheduled and active.
///
/// # Returns
///
/// The number of matches created.
///
/// # Errors
///
/// Returns an error if the delete or an insert fails.
pub fn replace_slate(
    conn: &mut SqliteConnection,
    plan: &SlatePlan,
    now: &str,
) -> Result<usize, PersistenceError> {
    let removed: usize = delete_matches_in_matchweek(conn, plan.matchweek_id)?;

    let mut created: usize = 0;
    for fixture in &plan.matches {
        created += diesel::insert_into(matches::table)
            .values((
                matches::matchweek_id.eq(plan.matchweek_id),
                matches::home_team_id.eq(fixture.home_team_id),
                matches::away_team_id.eq(fixture.away_team_id),
                matches::kickoff.eq(format_kickoff(fixture.kickoff)),
                matches::status.eq(MatchStatus::Scheduled.as_str()),
                matches::is_active.eq(1),
                matches::created_at.eq(now),
                matches::updated_at.eq(now),
            ))
            .execute(conn)?;
    }

    info!(
        matchweek_id = plan.matchweek_id,
        removed, created, "Replaced matchweek slate"
    );
    Ok(created)
}

/// Deletes every match in a matchweek.
///
/// # Errors
///
/// Returns an error if the delete fails, including when a pick still
/// references one of the matches.
pub fn delete_matches_in_matchweek(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(matches::table.filter(matches::matchweek_id.eq(matchweek_id)))
            .execute(conn)?,
    )
}

/// Sets the activity flag on a set of matches.
///
/// Status and scores are left alone.
///
/// # Returns
///
/// The number of rows updated.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn set_matches_active(
    conn: &mut SqliteConnection,
    match_ids: &[i64],
    is_active: bool,
    now: &str,
) -> Result<usize, PersistenceError> {
    let affected: usize = diesel::update(matches::table)
        .filter(matches::match_id.eq_any(match_ids))
        .set((
            matches::is_active.eq(i32::from(is_active)),
            matches::updated_at.eq(now),
        ))
        .execute(conn)?;

    let requested: usize = match_ids.len();
    info!(requested, affected, is_active, "Updated match activity");
    Ok(affected)
}

/// Stores a final score and marks the match finished.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no row was updated.
pub fn record_final_score(
    conn: &mut SqliteConnection,
    match_id: i64,
    home_score: u16,
    away_score: u16,
    now: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(matches::table.find(match_id))
        .set((
            matches::home_score.eq(Some(i32::from(home_score))),
            matches::away_score.eq(Some(i32::from(away_score))),
            matches::status.eq(MatchStatus::Finished.as_str()),
            matches::updated_at.eq(now),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Match {match_id}")));
    }
    Ok(())
}
