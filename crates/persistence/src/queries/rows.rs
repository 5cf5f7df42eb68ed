// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row structs and their mapping onto domain values.
//!
//! Booleans are stored as 0/1 integers, dates as `YYYY-MM-DD` text and
//! kickoffs as `YYYY-MM-DDTHH:MM:SS` text.

use diesel::prelude::*;
use num_traits::ToPrimitive;
use std::str::FromStr;
use survivor_pool_domain::{
    Match, MatchStatus, Matchweek, Pick, PickHistoryEntry, PickResult, Role, Team, parse_date,
    parse_kickoff,
};

use crate::data_models::{SessionRecord, UserRecord};
use crate::diesel_schema::{
    matches, matchweeks, sessions, teams, user_selections, user_team_history, users,
};
use crate::error::PersistenceError;

pub fn to_u16(value: i32, column: &str) -> Result<u16, PersistenceError> {
    value.to_u16().ok_or_else(|| {
        PersistenceError::CorruptRecord(format!("{column} value {value} is out of range"))
    })
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: String,
    pub is_eliminated: i32,
    pub is_active: i32,
    pub created_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            role: Role::from_str(&row.role)?,
            is_eliminated: row.is_eliminated != 0,
            is_active: row.is_active != 0,
            created_at: row.created_at,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
pub struct SessionRow {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            session_id: row.session_id,
            session_token: row.session_token,
            user_id: row.user_id,
            created_at: row.created_at,
            last_activity_at: row.last_activity_at,
            expires_at: row.expires_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = teams)]
pub struct TeamRow {
    pub team_id: i64,
    pub name: String,
    pub short_name: String,
    pub logo_url: Option<String>,
    pub stadium: Option<String>,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            team_id: row.team_id,
            name: row.name,
            short_name: row.short_name,
            logo_url: row.logo_url,
            stadium: row.stadium,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = matchweeks)]
pub struct MatchweekRow {
    pub matchweek_id: i64,
    pub week_number: i32,
    pub name: Option<String>,
    pub season: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub is_active: i32,
}

impl TryFrom<MatchweekRow> for Matchweek {
    type Error = PersistenceError;

    fn try_from(row: MatchweekRow) -> Result<Self, Self::Error> {
        Ok(Self {
            matchweek_id: row.matchweek_id,
            week_number: to_u16(row.week_number, "week_number")?,
            name: row.name,
            season: row.season,
            start_date: parse_date(&row.start_date)?,
            end_date: parse_date(&row.end_date)?,
            is_active: row.is_active != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = matches)]
pub struct MatchRow {
    pub match_id: i64,
    pub matchweek_id: i64,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub kickoff: String,
    pub status: String,
    pub is_active: i32,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

impl TryFrom<MatchRow> for Match {
    type Error = PersistenceError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            match_id: row.match_id,
            matchweek_id: row.matchweek_id,
            home_team_id: row.home_team_id,
            away_team_id: row.away_team_id,
            kickoff: parse_kickoff(&row.kickoff)?,
            status: MatchStatus::from_str(&row.status)?,
            is_active: row.is_active != 0,
            home_score: row
                .home_score
                .map(|score| to_u16(score, "home_score"))
                .transpose()?,
            away_score: row
                .away_score
                .map(|score| to_u16(score, "away_score"))
                .transpose()?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = user_selections)]
pub struct PickRow {
    pub selection_id: i64,
    pub user_id: i64,
    pub matchweek_id: i64,
    pub team_id: i64,
    pub match_id: i64,
    pub result: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&PickRow> for Pick {
    type Error = PersistenceError;

    fn try_from(row: &PickRow) -> Result<Self, Self::Error> {
        Ok(Self {
            pick_id: row.selection_id,
            user_id: row.user_id,
            matchweek_id: row.matchweek_id,
            team_id: row.team_id,
            match_id: row.match_id,
            result: PickResult::from_str(&row.result)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = user_team_history)]
pub struct HistoryRow {
    pub user_id: i64,
    pub team_id: i64,
    pub matchweek_id: i64,
}

impl From<HistoryRow> for PickHistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            user_id: row.user_id,
            team_id: row.team_id,
            matchweek_id: row.matchweek_id,
        }
    }
}
