// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_persistence::Persistence;

use super::helpers::{
    League, create_league, create_test_matchweek, create_test_persistence, participant, pick,
    schedule, set_active, test_clock,
};
use crate::{
    ApiError, AuthenticatedActor, MatchInfo, OwnPickInfo, PickOutcome, SetMatchesActiveRequest,
    SubmitPickResponse, TeamInfo, available_teams, own_picks, set_matches_active,
};

fn team_names(teams: &[TeamInfo]) -> Vec<&str> {
    teams.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn test_first_pick_is_created_and_resubmission_updates() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");

    let first: SubmitPickResponse =
        pick(&mut persistence, &ana, league.week_one, league.america).unwrap();
    assert_eq!(first.outcome, PickOutcome::Created);
    assert_eq!(first.match_id, league.matches[0].id);

    let changed: SubmitPickResponse =
        pick(&mut persistence, &ana, league.week_one, league.pumas).unwrap();
    assert_eq!(changed.outcome, PickOutcome::Updated);
    assert_eq!(changed.pick_id, first.pick_id);
    assert_eq!(changed.match_id, league.matches[1].id);

    let picks: Vec<OwnPickInfo> = own_picks(&mut persistence, &ana).unwrap();
    assert_eq!(picks.len(), 1);
    assert_eq!(picks[0].team.id, league.pumas);
    assert_eq!(picks[0].is_correct, None);
}

#[test]
fn test_administrators_cannot_pick() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);

    let result: Result<SubmitPickResponse, ApiError> = pick(
        &mut persistence,
        &league.admin,
        league.week_one,
        league.america,
    );
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));

    // The role check precedes the matchweek lookup.
    let result: Result<SubmitPickResponse, ApiError> =
        pick(&mut persistence, &league.admin, 999, league.america);
    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_unknown_matchweek_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");

    let result: Result<SubmitPickResponse, ApiError> =
        pick(&mut persistence, &ana, 999, league.america);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_closed_matchweek_rejects_picks() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    set_active(&mut persistence, &league.admin, league.week_one, false);

    let result: Result<SubmitPickResponse, ApiError> =
        pick(&mut persistence, &ana, league.week_one, league.america);
    assert!(
        matches!(result, Err(ApiError::InvalidState { ref rule, .. }) if rule == "matchweek_active")
    );
}

#[test]
fn test_team_reuse_across_matchweeks_conflicts() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    pick(&mut persistence, &ana, league.week_one, league.america).unwrap();

    let week_two: i64 = create_test_matchweek(&mut persistence, &league.admin, 2);
    schedule(
        &mut persistence,
        &league.admin,
        week_two,
        &[(league.america, league.pumas), (league.chivas, league.cruz_azul)],
    );
    set_active(&mut persistence, &league.admin, week_two, true);

    let result: Result<SubmitPickResponse, ApiError> =
        pick(&mut persistence, &ana, week_two, league.america);
    assert!(
        matches!(result, Err(ApiError::Conflict { ref rule, .. }) if rule == "team_used_once")
    );

    assert!(pick(&mut persistence, &ana, week_two, league.chivas).is_ok());
}

#[test]
fn test_changing_a_pick_releases_the_previous_team() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    pick(&mut persistence, &ana, league.week_one, league.america).unwrap();
    pick(&mut persistence, &ana, league.week_one, league.chivas).unwrap();

    let week_two: i64 = create_test_matchweek(&mut persistence, &league.admin, 2);
    schedule(
        &mut persistence,
        &league.admin,
        week_two,
        &[(league.america, league.pumas)],
    );
    set_active(&mut persistence, &league.admin, week_two, true);

    let result: SubmitPickResponse =
        pick(&mut persistence, &ana, week_two, league.america).unwrap();
    assert_eq!(result.outcome, PickOutcome::Created);
}

#[test]
fn test_team_without_active_match_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    let suspended: &MatchInfo = &league.matches[0];

    set_matches_active(
        &mut persistence,
        &test_clock(),
        &league.admin,
        &SetMatchesActiveRequest {
            match_ids: vec![suspended.id],
            is_active: false,
        },
    )
    .unwrap();

    let result: Result<SubmitPickResponse, ApiError> =
        pick(&mut persistence, &ana, league.week_one, league.america);
    match result {
        Err(ApiError::InvalidState { rule, .. }) => assert_eq!(rule, "team_has_active_match"),
        other => panic!("expected InvalidState, got {other:?}"),
    }
}

#[test]
fn test_closed_matchweek_outranks_team_reuse() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    pick(&mut persistence, &ana, league.week_one, league.america).unwrap();

    let week_two: i64 = create_test_matchweek(&mut persistence, &league.admin, 2);
    schedule(
        &mut persistence,
        &league.admin,
        week_two,
        &[(league.america, league.pumas)],
    );

    let result: Result<SubmitPickResponse, ApiError> =
        pick(&mut persistence, &ana, week_two, league.america);
    assert!(matches!(result, Err(ApiError::InvalidState { .. })));
}

#[test]
fn test_available_teams_excludes_used_and_suspended() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    pick(&mut persistence, &ana, league.week_one, league.america).unwrap();

    // The current week's own pick stays available.
    let teams: Vec<TeamInfo> = available_teams(&mut persistence, &ana).unwrap();
    assert_eq!(
        team_names(&teams),
        vec!["América", "Chivas", "Cruz Azul", "Pumas"]
    );

    let week_two: i64 = create_test_matchweek(&mut persistence, &league.admin, 2);
    let week_two_matches: Vec<MatchInfo> = schedule(
        &mut persistence,
        &league.admin,
        week_two,
        &[(league.america, league.pumas), (league.chivas, league.cruz_azul)],
    );
    set_active(&mut persistence, &league.admin, week_two, true);
    set_matches_active(
        &mut persistence,
        &test_clock(),
        &league.admin,
        &SetMatchesActiveRequest {
            match_ids: vec![week_two_matches[1].id],
            is_active: false,
        },
    )
    .unwrap();

    let teams: Vec<TeamInfo> = available_teams(&mut persistence, &ana).unwrap();
    assert_eq!(team_names(&teams), vec!["Pumas"]);

    // Suspension applies even without any history.
    let beto: AuthenticatedActor = participant(&mut persistence, "beto@example.org", "Beto");
    let teams: Vec<TeamInfo> = available_teams(&mut persistence, &beto).unwrap();
    assert_eq!(team_names(&teams), vec!["América", "Pumas"]);
}

#[test]
fn test_available_teams_requires_active_matchweek() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    set_active(&mut persistence, &league.admin, league.week_one, false);

    let result: Result<Vec<TeamInfo>, ApiError> = available_teams(&mut persistence, &ana);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
