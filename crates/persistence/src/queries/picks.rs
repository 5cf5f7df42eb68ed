// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Picks and team history.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::HashMap;
use std::str::FromStr;
use survivor_pool_domain::{Pick, PickHistoryEntry, PickResult, Role, StandingPick, Team};

use crate::data_models::{MatchDetail, PickDetail, WeeklySelection};
use crate::diesel_schema::{matches, matchweeks, teams, user_selections, user_team_history, users};
use crate::error::PersistenceError;
use crate::queries::league::match_details_by_id;
use crate::queries::rows::{HistoryRow, PickRow, TeamRow, to_u16};

/// Every team the participant has consumed, with the matchweek that used it.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn history_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<PickHistoryEntry>, PersistenceError> {
    let rows: Vec<HistoryRow> = user_team_history::table
        .filter(user_team_history::user_id.eq(user_id))
        .order(user_team_history::history_id.asc())
        .select(HistoryRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(PickHistoryEntry::from).collect())
}

/// The participant's pick for a matchweek, if any.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored result is unknown.
pub fn pick_for_matchweek(
    conn: &mut SqliteConnection,
    user_id: i64,
    matchweek_id: i64,
) -> Result<Option<Pick>, PersistenceError> {
    let row: Option<PickRow> = user_selections::table
        .filter(user_selections::user_id.eq(user_id))
        .filter(user_selections::matchweek_id.eq(matchweek_id))
        .select(PickRow::as_select())
        .first(conn)
        .optional()?;
    row.as_ref().map(Pick::try_from).transpose()
}

/// Every pick referencing a match, in submission order.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored result is unknown.
pub fn picks_for_match(
    conn: &mut SqliteConnection,
    match_id: i64,
) -> Result<Vec<Pick>, PersistenceError> {
    let rows: Vec<PickRow> = user_selections::table
        .filter(user_selections::match_id.eq(match_id))
        .order(user_selections::selection_id.asc())
        .select(PickRow::as_select())
        .load(conn)?;
    rows.iter().map(Pick::try_from).collect()
}

/// Counts picks referencing any match of a matchweek.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_picks_in_matchweek(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
) -> Result<usize, PersistenceError> {
    let count: i64 = user_selections::table
        .inner_join(matches::table)
        .filter(matches::matchweek_id.eq(matchweek_id))
        .count()
        .get_result(conn)?;
    usize::try_from(count)
        .map_err(|_| PersistenceError::CorruptRecord(format!("Negative pick count {count}")))
}

type StandingPickColumns = (i64, i64, i32, i64, String, String, Option<String>, String);

/// Every participant pick with its week number and team, for the leaderboard.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn standing_picks(conn: &mut SqliteConnection) -> Result<Vec<StandingPick>, PersistenceError> {
    let rows: Vec<StandingPickColumns> = user_selections::table
        .inner_join(users::table)
        .inner_join(matchweeks::table)
        .inner_join(teams::table)
        .filter(users::role.eq(Role::User.as_str()))
        .order((
            user_selections::user_id.asc(),
            matchweeks::week_number.asc(),
        ))
        .select((
            user_selections::user_id,
            user_selections::matchweek_id,
            matchweeks::week_number,
            user_selections::team_id,
            teams::name,
            teams::short_name,
            teams::logo_url,
            user_selections::result,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(user_id, matchweek_id, week, team_id, name, short_name, logo_url, result)| {
            Ok(StandingPick {
                user_id,
                matchweek_id,
                week_number: to_u16(week, "week_number")?,
                team_id,
                team_name: name,
                team_short_name: short_name,
                team_logo_url: logo_url,
                result: PickResult::from_str(&result)?,
            })
        })
        .collect()
}

/// The participant's own picks, latest week first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn pick_details_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Vec<PickDetail>, PersistenceError> {
    let rows: Vec<(PickRow, i32, i32, TeamRow)> = user_selections::table
        .inner_join(matchweeks::table)
        .inner_join(teams::table)
        .filter(user_selections::user_id.eq(user_id))
        .order(matchweeks::week_number.desc())
        .select((
            PickRow::as_select(),
            matchweeks::week_number,
            matchweeks::is_active,
            TeamRow::as_select(),
        ))
        .load(conn)?;

    let match_ids: Vec<i64> = rows.iter().map(|(pick, ..)| pick.match_id).collect();
    let fixtures: HashMap<i64, MatchDetail> = match_details_by_id(conn, &match_ids)?;

    let mut details: Vec<PickDetail> = Vec::with_capacity(rows.len());
    for (row, week, matchweek_active, team) in rows {
        let pick: Pick = Pick::try_from(&row)?;
        let fixture: MatchDetail = fixture_for(&fixtures, &pick)?;
        details.push(PickDetail {
            pick,
            week_number: to_u16(week, "week_number")?,
            matchweek_active: matchweek_active != 0,
            team: Team::from(team),
            fixture,
            created_at: row.created_at,
            updated_at: row.updated_at,
        });
    }
    Ok(details)
}

/// Every pick submitted for a matchweek, ordered by participant name.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn weekly_selections(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
) -> Result<Vec<WeeklySelection>, PersistenceError> {
    let rows: Vec<(PickRow, String, String, i32, TeamRow)> = user_selections::table
        .inner_join(users::table)
        .inner_join(teams::table)
        .filter(user_selections::matchweek_id.eq(matchweek_id))
        .order((users::name.asc(), users::user_id.asc()))
        .select((
            PickRow::as_select(),
            users::name,
            users::email,
            users::is_eliminated,
            TeamRow::as_select(),
        ))
        .load(conn)?;

    let match_ids: Vec<i64> = rows.iter().map(|(pick, ..)| pick.match_id).collect();
    let fixtures: HashMap<i64, MatchDetail> = match_details_by_id(conn, &match_ids)?;

    let mut selections: Vec<WeeklySelection> = Vec::with_capacity(rows.len());
    for (row, user_name, user_email, user_eliminated, team) in rows {
        let pick: Pick = Pick::try_from(&row)?;
        let fixture: MatchDetail = fixture_for(&fixtures, &pick)?;
        selections.push(WeeklySelection {
            pick,
            user_name,
            user_email,
            user_eliminated: user_eliminated != 0,
            team: Team::from(team),
            fixture,
            updated_at: row.updated_at,
        });
    }
    Ok(selections)
}

fn fixture_for(
    fixtures: &HashMap<i64, MatchDetail>,
    pick: &Pick,
) -> Result<MatchDetail, PersistenceError> {
    fixtures.get(&pick.match_id).cloned().ok_or_else(|| {
        PersistenceError::CorruptRecord(format!(
            "Pick {} references missing match {}",
            pick.pick_id, pick.match_id
        ))
    })
}
