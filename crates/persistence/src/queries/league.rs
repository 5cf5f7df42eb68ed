// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Teams, matchweeks and matches.

use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::{HashMap, HashSet};
use survivor_pool_domain::{Match, Matchweek, Team};

use crate::data_models::MatchDetail;
use crate::diesel_schema::{matches, matchweeks, teams};
use crate::error::PersistenceError;
use crate::queries::rows::{MatchRow, MatchweekRow, TeamRow, to_u16};

/// Lists every team ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_teams(conn: &mut SqliteConnection) -> Result<Vec<Team>, PersistenceError> {
    let rows: Vec<TeamRow> = teams::table
        .order((teams::name.asc(), teams::team_id.asc()))
        .select(TeamRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Team::from).collect())
}

/// Ids of every team.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn team_ids(conn: &mut SqliteConnection) -> Result<HashSet<i64>, PersistenceError> {
    let ids: Vec<i64> = teams::table.select(teams::team_id).load(conn)?;
    Ok(ids.into_iter().collect())
}

fn teams_by_id(conn: &mut SqliteConnection) -> Result<HashMap<i64, Team>, PersistenceError> {
    Ok(list_teams(conn)?
        .into_iter()
        .map(|team| (team.team_id, team))
        .collect())
}

/// Retrieves a matchweek by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored date is malformed.
pub fn find_matchweek(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
) -> Result<Option<Matchweek>, PersistenceError> {
    matchweeks::table
        .find(matchweek_id)
        .select(MatchweekRow::as_select())
        .first(conn)
        .optional()?
        .map(Matchweek::try_from)
        .transpose()
}

/// Retrieves a matchweek by its sequence number.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored date is malformed.
pub fn find_matchweek_by_number(
    conn: &mut SqliteConnection,
    week_number: u16,
) -> Result<Option<Matchweek>, PersistenceError> {
    matchweeks::table
        .filter(matchweeks::week_number.eq(i32::from(week_number)))
        .select(MatchweekRow::as_select())
        .first(conn)
        .optional()?
        .map(Matchweek::try_from)
        .transpose()
}

/// Retrieves the active matchweek.
///
/// The schema allows at most one; the lowest week number wins should an
/// older database hold several.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored date is malformed.
pub fn active_matchweek(
    conn: &mut SqliteConnection,
) -> Result<Option<Matchweek>, PersistenceError> {
    matchweeks::table
        .filter(matchweeks::is_active.eq(1))
        .order(matchweeks::week_number.asc())
        .select(MatchweekRow::as_select())
        .first(conn)
        .optional()?
        .map(Matchweek::try_from)
        .transpose()
}

/// Lists every matchweek ordered by week number.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored date is malformed.
pub fn list_matchweeks(conn: &mut SqliteConnection) -> Result<Vec<Matchweek>, PersistenceError> {
    let rows: Vec<MatchweekRow> = matchweeks::table
        .order(matchweeks::week_number.asc())
        .select(MatchweekRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Matchweek::try_from).collect()
}

/// Retrieves a match by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is malformed.
pub fn find_match(
    conn: &mut SqliteConnection,
    match_id: i64,
) -> Result<Option<Match>, PersistenceError> {
    matches::table
        .find(match_id)
        .select(MatchRow::as_select())
        .first(conn)
        .optional()?
        .map(Match::try_from)
        .transpose()
}

/// Finds the active match in a matchweek featuring a team on either side.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored row is malformed.
pub fn active_match_for_team(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
    team_id: i64,
) -> Result<Option<Match>, PersistenceError> {
    matches::table
        .filter(matches::matchweek_id.eq(matchweek_id))
        .filter(matches::is_active.eq(1))
        .filter(
            matches::home_team_id
                .eq(team_id)
                .or(matches::away_team_id.eq(team_id)),
        )
        .order(matches::match_id.asc())
        .select(MatchRow::as_select())
        .first(conn)
        .optional()?
        .map(Match::try_from)
        .transpose()
}

/// Lists a matchweek's matches ordered by kickoff.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn matches_in_matchweek(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
) -> Result<Vec<Match>, PersistenceError> {
    let rows: Vec<MatchRow> = matches::table
        .filter(matches::matchweek_id.eq(matchweek_id))
        .order((matches::kickoff.asc(), matches::match_id.asc()))
        .select(MatchRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Match::try_from).collect()
}

/// Lists a matchweek's matches with both teams resolved, ordered by kickoff.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn match_details_in_matchweek(
    conn: &mut SqliteConnection,
    matchweek_id: i64,
) -> Result<Vec<MatchDetail>, PersistenceError> {
    let rows: Vec<(MatchRow, i32)> = matches::table
        .inner_join(matchweeks::table)
        .filter(matches::matchweek_id.eq(matchweek_id))
        .order((matches::kickoff.asc(), matches::match_id.asc()))
        .select((MatchRow::as_select(), matchweeks::week_number))
        .load(conn)?;
    let teams: HashMap<i64, Team> = teams_by_id(conn)?;
    rows.into_iter()
        .map(|(row, week)| attach_teams(row, week, &teams))
        .collect()
}

/// Lists every match, latest week first and by kickoff within a week.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn all_match_details(
    conn: &mut SqliteConnection,
) -> Result<Vec<MatchDetail>, PersistenceError> {
    let rows: Vec<(MatchRow, i32)> = matches::table
        .inner_join(matchweeks::table)
        .order((
            matchweeks::week_number.desc(),
            matches::kickoff.asc(),
            matches::match_id.asc(),
        ))
        .select((MatchRow::as_select(), matchweeks::week_number))
        .load(conn)?;
    let teams: HashMap<i64, Team> = teams_by_id(conn)?;
    rows.into_iter()
        .map(|(row, week)| attach_teams(row, week, &teams))
        .collect()
}

/// Resolves a set of matches by id.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is malformed.
pub fn match_details_by_id(
    conn: &mut SqliteConnection,
    match_ids: &[i64],
) -> Result<HashMap<i64, MatchDetail>, PersistenceError> {
    if match_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(MatchRow, i32)> = matches::table
        .inner_join(matchweeks::table)
        .filter(matches::match_id.eq_any(match_ids))
        .select((MatchRow::as_select(), matchweeks::week_number))
        .load(conn)?;
    let teams: HashMap<i64, Team> = teams_by_id(conn)?;

    let mut details: HashMap<i64, MatchDetail> = HashMap::with_capacity(rows.len());
    for (row, week) in rows {
        let detail: MatchDetail = attach_teams(row, week, &teams)?;
        details.insert(detail.fixture.match_id, detail);
    }
    Ok(details)
}

fn attach_teams(
    row: MatchRow,
    week_number: i32,
    teams: &HashMap<i64, Team>,
) -> Result<MatchDetail, PersistenceError> {
    let fixture: Match = Match::try_from(row)?;
    let lookup = |team_id: i64| {
        teams.get(&team_id).cloned().ok_or_else(|| {
            PersistenceError::CorruptRecord(format!(
                "Match {} references missing team {team_id}",
                fixture.match_id
            ))
        })
    };
    let home_team: Team = lookup(fixture.home_team_id)?;
    let away_team: Team = lookup(fixture.away_team_id)?;

    Ok(MatchDetail {
        week_number: to_u16(week_number, "week_number")?,
        home_team,
        away_team,
        fixture,
    })
}
