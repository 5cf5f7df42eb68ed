// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_domain::{Match, MatchStatus, Matchweek};

use super::helpers::{NOW, activate, create_test_persistence, seed_matchweek, seed_slate, seed_team};
use crate::{MatchDetail, Persistence, PersistenceError};

fn active_weeks(persistence: &mut Persistence) -> Vec<u16> {
    persistence
        .unit_of_work(|uow| uow.list_matchweeks())
        .unwrap()
        .into_iter()
        .filter(|mw| mw.is_active)
        .map(|mw| mw.week_number)
        .collect()
}

#[test]
fn test_activating_a_matchweek_deactivates_the_previous_one() {
    let mut persistence: Persistence = create_test_persistence();
    let week4: i64 = seed_matchweek(&mut persistence, 4);
    let week5: i64 = seed_matchweek(&mut persistence, 5);

    activate(&mut persistence, week4, true);
    assert_eq!(active_weeks(&mut persistence), vec![4]);

    activate(&mut persistence, week5, true);
    assert_eq!(active_weeks(&mut persistence), vec![5]);

    let active: Matchweek = persistence
        .unit_of_work(|uow| uow.active_matchweek())
        .unwrap()
        .unwrap();
    assert_eq!(active.matchweek_id, week5);
}

#[test]
fn test_deactivating_only_clears_the_target() {
    let mut persistence: Persistence = create_test_persistence();
    let week1: i64 = seed_matchweek(&mut persistence, 1);
    let week2: i64 = seed_matchweek(&mut persistence, 2);

    activate(&mut persistence, week1, true);
    activate(&mut persistence, week2, false);
    assert_eq!(active_weeks(&mut persistence), vec![1]);

    activate(&mut persistence, week1, false);
    assert!(active_weeks(&mut persistence).is_empty());
}

#[test]
fn test_reactivating_the_active_matchweek_is_a_no_op() {
    let mut persistence: Persistence = create_test_persistence();
    let week1: i64 = seed_matchweek(&mut persistence, 1);

    activate(&mut persistence, week1, true);
    activate(&mut persistence, week1, true);
    assert_eq!(active_weeks(&mut persistence), vec![1]);
}

#[test]
fn test_duplicate_week_number_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    seed_matchweek(&mut persistence, 3);

    let result: Result<i64, PersistenceError> = persistence.unit_of_work(|uow| {
        uow.create_matchweek(
            &crate::NewMatchweek {
                week_number: 3,
                name: None,
                season: None,
                start_date: survivor_pool_domain::parse_date("2026-09-01").unwrap(),
                end_date: survivor_pool_domain::parse_date("2026-09-02").unwrap(),
            },
            NOW,
        )
    });
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_replace_slate_discards_previous_matches() {
    let mut persistence: Persistence = create_test_persistence();
    let america: i64 = seed_team(&mut persistence, "America", "AME");
    let chivas: i64 = seed_team(&mut persistence, "Chivas", "GDL");
    let pumas: i64 = seed_team(&mut persistence, "Pumas", "PUM");
    let tigres: i64 = seed_team(&mut persistence, "Tigres", "TIG");
    let week: i64 = seed_matchweek(&mut persistence, 1);

    let first: Vec<Match> = seed_slate(&mut persistence, week, &[(america, chivas)]);
    assert_eq!(first.len(), 1);

    let second: Vec<Match> = seed_slate(
        &mut persistence,
        week,
        &[(pumas, tigres), (chivas, america)],
    );
    assert_eq!(second.len(), 2);
    assert!(second.iter().all(|m| m.match_id != first[0].match_id));
    assert!(second
        .iter()
        .all(|m| m.status == MatchStatus::Scheduled && m.is_active));
    assert_eq!(second[0].home_team_id, pumas);
    assert_eq!(second[0].home_score, None);
}

#[test]
fn test_set_matches_active_counts_updated_rows() {
    let mut persistence: Persistence = create_test_persistence();
    let a: i64 = seed_team(&mut persistence, "Atlas", "ATL");
    let b: i64 = seed_team(&mut persistence, "Leon", "LEO");
    let c: i64 = seed_team(&mut persistence, "Necaxa", "NEC");
    let d: i64 = seed_team(&mut persistence, "Santos", "SAN");
    let week: i64 = seed_matchweek(&mut persistence, 1);
    let slate: Vec<Match> = seed_slate(&mut persistence, week, &[(a, b), (c, d)]);

    let affected: usize = persistence
        .unit_of_work(|uow| uow.set_matches_active(&[slate[0].match_id, 9_999], false, NOW))
        .unwrap();
    assert_eq!(affected, 1);

    let stored: Vec<Match> = persistence
        .unit_of_work(|uow| uow.matches_in_matchweek(week))
        .unwrap();
    assert!(!stored[0].is_active);
    assert!(stored[1].is_active);
    assert_eq!(stored[0].status, MatchStatus::Scheduled);
}

#[test]
fn test_all_match_details_orders_latest_week_first() {
    let mut persistence: Persistence = create_test_persistence();
    let a: i64 = seed_team(&mut persistence, "Atlas", "ATL");
    let b: i64 = seed_team(&mut persistence, "Leon", "LEO");
    let c: i64 = seed_team(&mut persistence, "Necaxa", "NEC");
    let d: i64 = seed_team(&mut persistence, "Santos", "SAN");
    let week1: i64 = seed_matchweek(&mut persistence, 1);
    let week2: i64 = seed_matchweek(&mut persistence, 2);
    seed_slate(&mut persistence, week1, &[(a, b)]);
    seed_slate(&mut persistence, week2, &[(c, d), (b, a)]);

    let details: Vec<MatchDetail> = persistence
        .unit_of_work(|uow| uow.all_match_details())
        .unwrap();

    let summary: Vec<(u16, String, String)> = details
        .iter()
        .map(|d| {
            (
                d.week_number,
                d.home_team.short_name.clone(),
                d.away_team.short_name.clone(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            (2, String::from("NEC"), String::from("SAN")),
            (2, String::from("LEO"), String::from("ATL")),
            (1, String::from("ATL"), String::from("LEO")),
        ]
    );
}

#[test]
fn test_slate_context_by_number_reports_unknown_week() {
    let mut persistence: Persistence = create_test_persistence();
    seed_team(&mut persistence, "Atlas", "ATL");

    let context = persistence
        .unit_of_work(|uow| uow.slate_context_by_number(7))
        .unwrap();
    assert!(context.matchweek.is_none());
    assert_eq!(context.pick_count, 0);
    assert_eq!(context.known_team_ids.len(), 1);
}
