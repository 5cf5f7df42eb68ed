// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_domain::{Match, Pick, Role, Team};
use time::Date;

/// A stored account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_eliminated: bool,
    pub is_active: bool,
    pub created_at: String,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    /// RFC 3339 UTC instant.
    pub expires_at: String,
}

/// Fields for a new team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub short_name: String,
    pub logo_url: Option<String>,
    pub stadium: Option<String>,
}

/// Fields for a new matchweek. New matchweeks start inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatchweek {
    pub week_number: u16,
    pub name: Option<String>,
    pub season: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
}

/// A match with both teams resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchDetail {
    pub fixture: Match,
    pub week_number: u16,
    pub home_team: Team,
    pub away_team: Team,
}

/// One of a participant's own picks with its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickDetail {
    pub pick: Pick,
    pub week_number: u16,
    pub matchweek_active: bool,
    pub team: Team,
    pub fixture: MatchDetail,
    pub created_at: String,
    pub updated_at: String,
}

/// A pick as listed on the administrator's weekly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySelection {
    pub pick: Pick,
    pub user_name: String,
    pub user_email: String,
    pub user_eliminated: bool,
    pub team: Team,
    pub fixture: MatchDetail,
    pub updated_at: String,
}
