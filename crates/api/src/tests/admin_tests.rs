// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_persistence::Persistence;

use super::helpers::{
    League, create_admin, create_league, create_test_matchweek, create_test_persistence,
    create_test_team, participant, pick, set_active, test_clock,
};
use crate::{
    AffectedCountResponse, ApiError, AuthenticatedActor, CreateMatchweekRequest, CreateTeamRequest,
    CurrentWeekMatchesResponse, DeletedCountResponse, MatchEntry, MatchInfo, MatchweekInfo,
    ReplaceMatchesRequest, SetMatchesActiveRequest, SetMatchweekActiveRequest, TeamInfo,
    WeeklySelectionInfo, create_matchweek, create_team, current_matchweek, current_week_matches,
    delete_matches_by_week, list_matchweeks, list_teams, matches_by_week, replace_matches,
    set_matches_active, set_matchweek_active, weekly_selections,
};

fn entry(home_team_id: i64, away_team_id: i64, kickoff: &str) -> MatchEntry {
    MatchEntry {
        home_team_id,
        away_team_id,
        kickoff: kickoff.to_string(),
    }
}

fn replace(
    persistence: &mut Persistence,
    admin: &AuthenticatedActor,
    matchweek_id: i64,
    matches: Vec<MatchEntry>,
) -> Result<usize, ApiError> {
    replace_matches(
        persistence,
        &test_clock(),
        admin,
        &ReplaceMatchesRequest {
            matchweek_id,
            matches,
        },
    )
    .map(|r| r.created)
}

#[test]
fn test_activating_a_matchweek_closes_the_others() {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_admin(&mut persistence);
    let week_four: i64 = create_test_matchweek(&mut persistence, &admin, 4);
    let week_three: i64 = create_test_matchweek(&mut persistence, &admin, 3);
    set_active(&mut persistence, &admin, week_four, true);

    set_active(&mut persistence, &admin, week_three, true);

    let matchweeks: Vec<MatchweekInfo> = list_matchweeks(&mut persistence, &admin).unwrap();
    let active: Vec<u16> = matchweeks
        .iter()
        .filter(|mw| mw.is_active)
        .map(|mw| mw.week_number)
        .collect();
    assert_eq!(active, vec![3]);
    assert_eq!(current_matchweek(&mut persistence).unwrap().id, week_three);
}

#[test]
fn test_deactivating_leaves_no_active_matchweek() {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_admin(&mut persistence);
    let week_one: i64 = create_test_matchweek(&mut persistence, &admin, 1);
    set_active(&mut persistence, &admin, week_one, true);
    set_active(&mut persistence, &admin, week_one, false);

    assert!(matches!(
        current_matchweek(&mut persistence),
        Err(ApiError::ResourceNotFound { .. })
    ));
    let response: CurrentWeekMatchesResponse = current_week_matches(&mut persistence).unwrap();
    assert_eq!(response.matchweek, None);
    assert!(response.matches.is_empty());
}

#[test]
fn test_activating_unknown_matchweek_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_admin(&mut persistence);

    let result = set_matchweek_active(
        &mut persistence,
        &test_clock(),
        &admin,
        &SetMatchweekActiveRequest {
            matchweek_id: 42,
            is_active: true,
        },
    );
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_create_matchweek_validates_and_rejects_duplicates() {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_admin(&mut persistence);

    let request: CreateMatchweekRequest = CreateMatchweekRequest {
        week_number: 1,
        name: Some(String::from("  ")),
        season: None,
        start_date: String::from("2026-08-07"),
        end_date: String::from("2026-08-09"),
    };
    let created: MatchweekInfo =
        create_matchweek(&mut persistence, &test_clock(), &admin, &request).unwrap();
    assert_eq!(created.week_number, 1);
    assert_eq!(created.name, None);
    assert!(!created.is_active);
    assert_eq!(created.start_date, "2026-08-07");

    let duplicate = create_matchweek(&mut persistence, &test_clock(), &admin, &request);
    assert!(matches!(duplicate, Err(ApiError::Conflict { .. })));

    let reversed = create_matchweek(
        &mut persistence,
        &test_clock(),
        &admin,
        &CreateMatchweekRequest {
            week_number: 2,
            name: None,
            season: None,
            start_date: String::from("2026-08-16"),
            end_date: String::from("2026-08-14"),
        },
    );
    assert!(matches!(reversed, Err(ApiError::InvalidInput { .. })));

    let week_zero = create_matchweek(
        &mut persistence,
        &test_clock(),
        &admin,
        &CreateMatchweekRequest {
            week_number: 0,
            name: None,
            season: None,
            start_date: String::from("2026-08-01"),
            end_date: String::from("2026-08-02"),
        },
    );
    assert!(matches!(week_zero, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_create_team_rejects_duplicate_names() {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_admin(&mut persistence);
    let request: CreateTeamRequest = CreateTeamRequest {
        name: String::from("Tigres"),
        short_name: String::from("TIG"),
        logo_url: Some(String::from("https://example.org/tigres.png")),
        stadium: Some(String::from("Universitario")),
    };

    let created: TeamInfo = create_team(&mut persistence, &test_clock(), &admin, &request).unwrap();
    assert_eq!(created.stadium.as_deref(), Some("Universitario"));

    let duplicate = create_team(&mut persistence, &test_clock(), &admin, &request);
    assert!(matches!(duplicate, Err(ApiError::Conflict { .. })));

    let teams: Vec<TeamInfo> = list_teams(&mut persistence).unwrap();
    assert_eq!(teams, vec![created]);
}

#[test]
fn test_participants_cannot_run_admin_operations() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");

    assert!(matches!(
        list_matchweeks(&mut persistence, &ana),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(matches!(
        replace(&mut persistence, &ana, league.week_one, Vec::new()),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(matches!(
        delete_matches_by_week(&mut persistence, &ana, 1),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(matches!(
        weekly_selections(&mut persistence, &ana, 1),
        Err(ApiError::Forbidden { .. })
    ));
}

#[test]
fn test_replace_matches_swaps_the_whole_slate() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);

    let created: usize = replace(
        &mut persistence,
        &league.admin,
        league.week_one,
        vec![entry(league.pumas, league.america, "2026-08-08T19:00")],
    )
    .unwrap();
    assert_eq!(created, 1);

    let matches: Vec<MatchInfo> = matches_by_week(&mut persistence, &league.admin, 1).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].home_team.id, league.pumas);
    assert_eq!(matches[0].kickoff, "2026-08-08T19:00:00");
    assert!(matches[0].is_active);
}

#[test]
fn test_replace_matches_validates_every_entry() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);

    let cases: Vec<Vec<MatchEntry>> = vec![
        vec![entry(league.america, league.america, "2026-08-08T19:00")],
        vec![
            entry(league.america, league.chivas, "2026-08-08T19:00"),
            entry(league.pumas, league.america, "2026-08-08T21:00"),
        ],
        vec![entry(league.america, 999, "2026-08-08T19:00")],
        vec![entry(league.america, league.chivas, "mañana")],
    ];
    for matches in cases {
        let result: Result<usize, ApiError> =
            replace(&mut persistence, &league.admin, league.week_one, matches);
        assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    }

    let unknown_week: Result<usize, ApiError> =
        replace(&mut persistence, &league.admin, 999, Vec::new());
    assert!(matches!(unknown_week, Err(ApiError::ResourceNotFound { .. })));

    // The original slate survives every rejected request.
    assert_eq!(
        matches_by_week(&mut persistence, &league.admin, 1).unwrap(),
        league.matches
    );
}

#[test]
fn test_picks_block_match_replacement_and_deletion() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    pick(&mut persistence, &ana, league.week_one, league.america).unwrap();

    let replaced: Result<usize, ApiError> = replace(
        &mut persistence,
        &league.admin,
        league.week_one,
        vec![entry(league.america, league.pumas, "2026-08-08T19:00")],
    );
    assert!(matches!(replaced, Err(ApiError::Conflict { .. })));

    let deleted = delete_matches_by_week(&mut persistence, &league.admin, 1);
    assert!(matches!(deleted, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_delete_matches_by_week() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);

    let missing = delete_matches_by_week(&mut persistence, &league.admin, 3);
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));

    let deleted: DeletedCountResponse =
        delete_matches_by_week(&mut persistence, &league.admin, 1).unwrap();
    assert_eq!(deleted.deleted, 2);
    assert!(
        matches_by_week(&mut persistence, &league.admin, 1)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_set_matches_active_counts_rows() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);

    let empty = set_matches_active(
        &mut persistence,
        &test_clock(),
        &league.admin,
        &SetMatchesActiveRequest {
            match_ids: Vec::new(),
            is_active: false,
        },
    );
    assert!(matches!(empty, Err(ApiError::InvalidInput { .. })));

    let response: AffectedCountResponse = set_matches_active(
        &mut persistence,
        &test_clock(),
        &league.admin,
        &SetMatchesActiveRequest {
            match_ids: vec![league.matches[0].id, league.matches[0].id, 999],
            is_active: false,
        },
    )
    .unwrap();
    assert_eq!(response.affected, 1);

    let current: CurrentWeekMatchesResponse = current_week_matches(&mut persistence).unwrap();
    assert_eq!(current.matchweek.map(|mw| mw.id), Some(league.week_one));
    assert!(!current.matches[0].is_active);
    assert!(current.matches[1].is_active);
}

#[test]
fn test_weekly_selections_ordered_by_participant_name() {
    let mut persistence: Persistence = create_test_persistence();
    let league: League = create_league(&mut persistence);
    let zoe: AuthenticatedActor = participant(&mut persistence, "zoe@example.org", "Zoe");
    let ana: AuthenticatedActor = participant(&mut persistence, "ana@example.org", "Ana");
    pick(&mut persistence, &zoe, league.week_one, league.pumas).unwrap();
    pick(&mut persistence, &ana, league.week_one, league.chivas).unwrap();

    let selections: Vec<WeeklySelectionInfo> =
        weekly_selections(&mut persistence, &league.admin, 1).unwrap();
    let names: Vec<&str> = selections.iter().map(|s| s.user_name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Zoe"]);
    assert_eq!(selections[0].team.id, league.chivas);
    assert_eq!(selections[0].fixture.id, league.matches[0].id);

    assert!(
        weekly_selections(&mut persistence, &league.admin, 2)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_matches_by_week_for_unknown_week_is_empty() {
    let mut persistence: Persistence = create_test_persistence();
    let admin: AuthenticatedActor = create_admin(&mut persistence);
    create_test_team(&mut persistence, &admin, "León");

    assert!(matches_by_week(&mut persistence, &admin, 7).unwrap().is_empty());
    assert!(matches!(
        matches_by_week(&mut persistence, &admin, 0),
        Err(ApiError::InvalidInput { .. })
    ));
}
