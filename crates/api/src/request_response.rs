// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names travel in `camelCase`. Requests carry raw caller input;
//! handlers validate each field once before any storage access.

use serde::{Deserialize, Serialize};
use survivor_pool_domain::{
    MatchStatus, Matchweek, PickResult, Role, Standing, StandingPick, Team, format_date,
    format_kickoff,
};
use survivor_pool_persistence::{MatchDetail, PickDetail, UserRecord, WeeklySelection};

// Requests

/// API request to create a participant account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
    /// Display name.
    pub name: String,
}

/// API request to open a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

/// API request to make or change the caller's pick for a matchweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPickRequest {
    /// The team being picked.
    pub team_id: i64,
    /// The matchweek the pick is for.
    pub matchweek_id: i64,
}

/// API request to record a match's final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeMatchRequest {
    /// The match being finalized.
    pub match_id: i64,
    /// Goals scored by the home side.
    pub home_score: i64,
    /// Goals scored by the away side.
    pub away_score: i64,
}

/// One match in a bulk replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    /// Home side.
    pub home_team_id: i64,
    /// Away side.
    pub away_team_id: i64,
    /// `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS`, league civil time.
    pub kickoff: String,
}

/// API request to replace every match of a matchweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceMatchesRequest {
    /// Target matchweek.
    pub matchweek_id: i64,
    /// The complete new list of matches.
    pub matches: Vec<MatchEntry>,
}

/// API request to suspend or restore matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMatchesActiveRequest {
    /// Target matches.
    pub match_ids: Vec<i64>,
    /// Desired state.
    pub is_active: bool,
}

/// API request to open or close a matchweek.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMatchweekActiveRequest {
    /// Target matchweek.
    pub matchweek_id: i64,
    /// Desired state.
    pub is_active: bool,
}

/// API request to create a matchweek.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchweekRequest {
    /// Sequence number, 1 or greater.
    pub week_number: i64,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional season label.
    #[serde(default)]
    pub season: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`.
    pub end_date: String,
}

/// API request to create a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    /// Full name, unique.
    pub name: String,
    /// Short code.
    pub short_name: String,
    /// Crest URL.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Home ground.
    #[serde(default)]
    pub stadium: Option<String>,
}

// Responses

/// An account as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_eliminated: bool,
}

impl From<&UserRecord> for UserInfo {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            is_eliminated: user.is_eliminated,
        }
    }
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// The created account.
    pub user: UserInfo,
    /// Bearer token for the new session.
    pub token: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The authenticated account.
    pub user: UserInfo,
    /// Bearer token for the new session.
    pub token: String,
    /// Session expiry, `YYYY-MM-DDTHH:MM:SSZ`.
    pub expires_at: String,
}

/// Team metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInfo {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    pub logo_url: Option<String>,
    pub stadium: Option<String>,
}

impl From<&Team> for TeamInfo {
    fn from(team: &Team) -> Self {
        Self {
            id: team.team_id,
            name: team.name.clone(),
            short_name: team.short_name.clone(),
            logo_url: team.logo_url.clone(),
            stadium: team.stadium.clone(),
        }
    }
}

/// Matchweek metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchweekInfo {
    pub id: i64,
    pub week_number: u16,
    pub name: Option<String>,
    pub season: Option<String>,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    pub is_active: bool,
}

impl From<&Matchweek> for MatchweekInfo {
    fn from(matchweek: &Matchweek) -> Self {
        Self {
            id: matchweek.matchweek_id,
            week_number: matchweek.week_number,
            name: matchweek.name.clone(),
            season: matchweek.season.clone(),
            start_date: format_date(matchweek.start_date),
            end_date: format_date(matchweek.end_date),
            is_active: matchweek.is_active,
        }
    }
}

/// A match with both teams' metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfo {
    pub id: i64,
    pub matchweek_id: i64,
    pub week_number: u16,
    /// `YYYY-MM-DDTHH:MM:SS`, league civil time.
    pub kickoff: String,
    pub status: MatchStatus,
    pub is_active: bool,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub home_team: TeamInfo,
    pub away_team: TeamInfo,
}

impl From<&MatchDetail> for MatchInfo {
    fn from(detail: &MatchDetail) -> Self {
        Self {
            id: detail.fixture.match_id,
            matchweek_id: detail.fixture.matchweek_id,
            week_number: detail.week_number,
            kickoff: format_kickoff(detail.fixture.kickoff),
            status: detail.fixture.status,
            is_active: detail.fixture.is_active,
            home_score: detail.fixture.home_score,
            away_score: detail.fixture.away_score,
            home_team: TeamInfo::from(&detail.home_team),
            away_team: TeamInfo::from(&detail.away_team),
        }
    }
}

/// API response listing the active matchweek's matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeekMatchesResponse {
    /// The active matchweek; `null` when none is active.
    pub matchweek: Option<MatchweekInfo>,
    /// Its matches ordered by kickoff; empty when none is active.
    pub matches: Vec<MatchInfo>,
}

/// Whether a submission created a pick or changed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickOutcome {
    Created,
    Updated,
}

/// API response for a recorded pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPickResponse {
    pub outcome: PickOutcome,
    pub pick_id: i64,
    /// The match the picked team plays in.
    pub match_id: i64,
}

/// One of the caller's own picks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnPickInfo {
    pub id: i64,
    pub matchweek_id: i64,
    pub week_number: u16,
    pub matchweek_active: bool,
    pub team: TeamInfo,
    #[serde(rename = "match")]
    pub fixture: MatchInfo,
    pub result: PickResult,
    pub is_correct: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&PickDetail> for OwnPickInfo {
    fn from(detail: &PickDetail) -> Self {
        Self {
            id: detail.pick.pick_id,
            matchweek_id: detail.pick.matchweek_id,
            week_number: detail.week_number,
            matchweek_active: detail.matchweek_active,
            team: TeamInfo::from(&detail.team),
            fixture: MatchInfo::from(&detail.fixture),
            result: detail.pick.result,
            is_correct: detail.pick.result.is_correct(),
            created_at: detail.created_at.clone(),
            updated_at: detail.updated_at.clone(),
        }
    }
}

/// API response for a finalized match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeMatchResponse {
    pub match_id: i64,
    /// Picks resolved by this call.
    pub processed_count: usize,
    /// Picks resolved as a loss by this call.
    pub eliminated_count: usize,
    /// Participants whose elimination flag flipped in this call.
    pub newly_eliminated_count: usize,
}

/// API response for a bulk match replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedCountResponse {
    pub created: usize,
}

/// API response for a bulk match activity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedCountResponse {
    pub affected: usize,
}

/// API response for removing a matchweek's matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCountResponse {
    pub deleted: usize,
}

/// Acknowledgement of a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    /// A successful acknowledgement.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// A pick as shown on the detailed leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingPickInfo {
    pub matchweek_id: i64,
    pub week_number: u16,
    pub team_id: i64,
    pub team_name: String,
    pub team_short_name: String,
    pub team_logo_url: Option<String>,
    pub result: PickResult,
    pub is_correct: Option<bool>,
}

impl From<&StandingPick> for StandingPickInfo {
    fn from(pick: &StandingPick) -> Self {
        Self {
            matchweek_id: pick.matchweek_id,
            week_number: pick.week_number,
            team_id: pick.team_id,
            team_name: pick.team_name.clone(),
            team_short_name: pick.team_short_name.clone(),
            team_logo_url: pick.team_logo_url.clone(),
            result: pick.result,
            is_correct: pick.result.is_correct(),
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingInfo {
    pub position: usize,
    pub user_id: i64,
    pub name: String,
    pub is_eliminated: bool,
    pub total_picks: usize,
    pub correct_picks: usize,
    pub losses: usize,
    pub points: u32,
    pub last_week_alive: u16,
    /// Present on the detailed leaderboard only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picks: Option<Vec<StandingPickInfo>>,
}

impl StandingInfo {
    /// Converts a computed standing, attaching picks when `detailed`.
    #[must_use]
    pub fn from_standing(standing: &Standing, detailed: bool) -> Self {
        Self {
            position: standing.position,
            user_id: standing.user_id,
            name: standing.name.clone(),
            is_eliminated: standing.is_eliminated,
            total_picks: standing.total_picks,
            correct_picks: standing.correct_picks,
            losses: standing.losses,
            points: standing.points,
            last_week_alive: standing.last_week_alive,
            picks: detailed.then(|| standing.picks.iter().map(StandingPickInfo::from).collect()),
        }
    }
}

/// A pick on the administrator's weekly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySelectionInfo {
    pub pick_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_eliminated: bool,
    pub team: TeamInfo,
    pub result: PickResult,
    pub is_correct: Option<bool>,
    #[serde(rename = "match")]
    pub fixture: MatchInfo,
    pub updated_at: String,
}

impl From<&WeeklySelection> for WeeklySelectionInfo {
    fn from(selection: &WeeklySelection) -> Self {
        Self {
            pick_id: selection.pick.pick_id,
            user_id: selection.pick.user_id,
            user_name: selection.user_name.clone(),
            user_email: selection.user_email.clone(),
            user_eliminated: selection.user_eliminated,
            team: TeamInfo::from(&selection.team),
            result: selection.pick.result,
            is_correct: selection.pick.result.is_correct(),
            fixture: MatchInfo::from(&selection.fixture),
            updated_at: selection.updated_at.clone(),
        }
    }
}
