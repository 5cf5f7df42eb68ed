// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use survivor_pool_domain::{DEFAULT_TIMEZONE, FixedClock, parse_timezone};
use survivor_pool_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    ApiError, AuthenticatedActor, CreateMatchweekRequest, CreateTeamRequest, FinalizeMatchRequest,
    FinalizeMatchResponse, MatchEntry, MatchInfo, RegisterRequest, RegisterResponse,
    ReplaceMatchesRequest, Role, SetMatchweekActiveRequest, SubmitPickRequest, SubmitPickResponse,
    bootstrap_admin, create_matchweek, create_team, finalize_match, list_all_matches, register,
    replace_matches, set_matchweek_active, submit_pick,
};

pub const TEST_PASSWORD: &str = "Golazo2026!";
pub const SESSION_DAYS: u32 = 30;
pub const TEST_PASSWORD_COST: u32 = 4;
pub const TEST_INSTANT: OffsetDateTime = datetime!(2026-08-01 16:00:00 UTC);

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_password_cost(TEST_PASSWORD_COST)
}

pub fn clock_at(instant: OffsetDateTime) -> FixedClock {
    FixedClock::new(instant, parse_timezone(DEFAULT_TIMEZONE).unwrap())
}

pub fn test_clock() -> FixedClock {
    clock_at(TEST_INSTANT)
}

pub fn create_admin(persistence: &mut Persistence) -> AuthenticatedActor {
    let user_id: i64 = bootstrap_admin(
        persistence,
        &test_clock(),
        "comisionado@quiniela.mx",
        "Comisionado",
        TEST_PASSWORD,
    )
    .expect("Failed to bootstrap administrator")
    .expect("An administrator already existed");
    AuthenticatedActor::new(user_id, Role::Superadmin)
}

pub fn register_participant(
    persistence: &mut Persistence,
    email: &str,
    name: &str,
) -> (AuthenticatedActor, RegisterResponse) {
    let response: RegisterResponse = register(
        persistence,
        &test_clock(),
        SESSION_DAYS,
        &RegisterRequest {
            email: email.to_string(),
            password: String::from(TEST_PASSWORD),
            name: name.to_string(),
        },
    )
    .expect("Failed to register participant");
    (AuthenticatedActor::new(response.user.id, Role::User), response)
}

pub fn participant(persistence: &mut Persistence, email: &str, name: &str) -> AuthenticatedActor {
    register_participant(persistence, email, name).0
}

pub fn create_test_team(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    name: &str,
) -> i64 {
    create_team(
        persistence,
        &test_clock(),
        admin,
        &CreateTeamRequest {
            name: name.to_string(),
            short_name: name.chars().take(3).collect::<String>().to_uppercase(),
            logo_url: None,
            stadium: None,
        },
    )
    .expect("Failed to create team")
    .id
}

pub fn create_test_matchweek(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    week_number: i64,
) -> i64 {
    create_matchweek(
        persistence,
        &test_clock(),
        admin,
        &CreateMatchweekRequest {
            week_number,
            name: Some(format!("Jornada {week_number}")),
            season: Some(String::from("Apertura 2026")),
            start_date: format!("2026-08-{:02}", week_number * 7),
            end_date: format!("2026-08-{:02}", week_number * 7 + 2),
        },
    )
    .expect("Failed to create matchweek")
    .id
}

pub fn set_active(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    matchweek_id: i64,
    is_active: bool,
) {
    set_matchweek_active(
        persistence,
        &test_clock(),
        admin,
        &SetMatchweekActiveRequest {
            matchweek_id,
            is_active,
        },
    )
    .expect("Failed to change matchweek activity");
}

/// Schedules `pairs` as the matchweek's slate and returns the new matches.
pub fn schedule(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    matchweek_id: i64,
    pairs: &[(i64, i64)],
) -> Vec<MatchInfo> {
    let matches: Vec<MatchEntry> = pairs
        .iter()
        .enumerate()
        .map(|(i, (home, away))| MatchEntry {
            home_team_id: *home,
            away_team_id: *away,
            kickoff: format!("2026-08-15T{:02}:00", 17 + i),
        })
        .collect();
    replace_matches(
        persistence,
        &test_clock(),
        admin,
        &ReplaceMatchesRequest {
            matchweek_id,
            matches,
        },
    )
    .expect("Failed to schedule matches");

    list_all_matches(persistence, admin)
        .unwrap()
        .into_iter()
        .filter(|m| m.matchweek_id == matchweek_id)
        .collect()
}

pub fn pick(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    matchweek_id: i64,
    team_id: i64,
) -> Result<SubmitPickResponse, ApiError> {
    submit_pick(
        persistence,
        &test_clock(),
        actor,
        &SubmitPickRequest {
            team_id,
            matchweek_id,
        },
    )
}

pub fn finalize(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    match_id: i64,
    home_score: i64,
    away_score: i64,
) -> FinalizeMatchResponse {
    finalize_match(
        persistence,
        &test_clock(),
        admin,
        &FinalizeMatchRequest {
            match_id,
            home_score,
            away_score,
        },
    )
    .expect("Failed to finalize match")
}

/// A league of four teams with week 1 active and two matches scheduled:
/// América vs Chivas, then Cruz Azul vs Pumas.
pub struct League {
    pub admin: AuthenticatedActor,
    pub america: i64,
    pub chivas: i64,
    pub cruz_azul: i64,
    pub pumas: i64,
    pub week_one: i64,
    pub matches: Vec<MatchInfo>,
}

pub fn create_league(persistence: &mut Persistence) -> League {
    let admin: AuthenticatedActor = create_admin(persistence);
    let america: i64 = create_test_team(persistence, &admin, "América");
    let chivas: i64 = create_test_team(persistence, &admin, "Chivas");
    let cruz_azul: i64 = create_test_team(persistence, &admin, "Cruz Azul");
    let pumas: i64 = create_test_team(persistence, &admin, "Pumas");
    let week_one: i64 = create_test_matchweek(persistence, &admin, 1);
    let matches: Vec<MatchInfo> = schedule(
        persistence,
        &admin,
        week_one,
        &[(america, chivas), (cruz_azul, pumas)],
    );
    set_active(persistence, &admin, week_one, true);

    League {
        admin,
        america,
        chivas,
        cruz_azul,
        pumas,
        week_one,
        matches,
    }
}
