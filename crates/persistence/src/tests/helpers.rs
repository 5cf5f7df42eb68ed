// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool::{
    Actor, FinalizeMatch, PickPlan, ReplaceMatches, SetMatchweekActive, SubmitPick,
    plan_matchweek_activation, plan_pick, plan_slate_replacement, resolve_match,
};
use survivor_pool_domain::{Match, NewMatch, Role, parse_date, parse_kickoff};

use crate::{NewMatchweek, NewTeam, Persistence, PersistenceError};

pub const NOW: &str = "2026-08-01T10:00:00";

/// Lowest cost bcrypt accepts; keeps hashing out of test runtime.
pub const TEST_PASSWORD_COST: u32 = 4;

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_password_cost(TEST_PASSWORD_COST)
}

pub fn seed_user(persistence: &mut Persistence, email: &str, name: &str, role: Role) -> i64 {
    persistence
        .unit_of_work(|uow| uow.create_user(email, name, "Str0ng!Password", role, NOW))
        .expect("create user")
}

pub fn seed_team(persistence: &mut Persistence, name: &str, short_name: &str) -> i64 {
    let team: NewTeam = NewTeam {
        name: name.to_string(),
        short_name: short_name.to_string(),
        logo_url: None,
        stadium: None,
    };
    persistence
        .unit_of_work(|uow| uow.create_team(&team, NOW))
        .expect("create team")
}

pub fn seed_matchweek(persistence: &mut Persistence, week_number: u16) -> i64 {
    let matchweek: NewMatchweek = NewMatchweek {
        week_number,
        name: Some(format!("Jornada {week_number}")),
        season: Some(String::from("Apertura 2026")),
        start_date: parse_date("2026-08-01").unwrap(),
        end_date: parse_date("2026-08-03").unwrap(),
    };
    persistence
        .unit_of_work(|uow| uow.create_matchweek(&matchweek, NOW))
        .expect("create matchweek")
}

pub fn activate(persistence: &mut Persistence, matchweek_id: i64, is_active: bool) {
    persistence
        .unit_of_work(|uow| -> Result<(), PersistenceError> {
            let matchweek = uow.find_matchweek(matchweek_id)?;
            let plan = plan_matchweek_activation(
                matchweek.as_ref(),
                SetMatchweekActive {
                    matchweek_id,
                    is_active,
                },
            )
            .unwrap();
            uow.apply_activation(&plan, NOW)
        })
        .expect("activation");
}

/// Replaces a matchweek's slate and returns the stored matches.
pub fn seed_slate(
    persistence: &mut Persistence,
    matchweek_id: i64,
    pairs: &[(i64, i64)],
) -> Vec<Match> {
    let matches: Vec<NewMatch> = pairs
        .iter()
        .enumerate()
        .map(|(i, (home, away))| NewMatch {
            home_team_id: *home,
            away_team_id: *away,
            kickoff: parse_kickoff(&format!("2026-08-02T{:02}:00", 12 + i)).unwrap(),
        })
        .collect();

    persistence
        .unit_of_work(|uow| -> Result<Vec<Match>, PersistenceError> {
            let context = uow.slate_context(matchweek_id)?;
            let plan = plan_slate_replacement(
                &context,
                ReplaceMatches {
                    matchweek_id,
                    matches,
                },
            )
            .unwrap();
            uow.replace_slate(&plan, NOW)?;
            uow.matches_in_matchweek(matchweek_id)
        })
        .expect("seed slate")
}

pub fn submit(
    persistence: &mut Persistence,
    user_id: i64,
    matchweek_id: i64,
    team_id: i64,
) -> (PickPlan, i64) {
    persistence
        .unit_of_work(|uow| -> Result<(PickPlan, i64), PersistenceError> {
            let command: SubmitPick = SubmitPick {
                team_id,
                matchweek_id,
            };
            let context = uow.pick_context(user_id, command)?;
            let plan: PickPlan =
                plan_pick(&Actor::new(user_id, Role::User), &context, command).unwrap();
            let pick_id: i64 = uow.apply_pick_plan(&plan, NOW)?;
            Ok((plan, pick_id))
        })
        .expect("submit pick")
}

/// Finalizes a match and returns the number of newly eliminated users.
pub fn finalize(persistence: &mut Persistence, match_id: i64, home: u16, away: u16) -> usize {
    persistence
        .unit_of_work(|uow| -> Result<usize, PersistenceError> {
            let context = uow.finalize_context(match_id)?;
            let plan = resolve_match(
                &context,
                FinalizeMatch {
                    match_id,
                    home_score: home,
                    away_score: away,
                },
            )
            .unwrap();
            uow.apply_finalize_plan(&plan, NOW)
        })
        .expect("finalize")
}
