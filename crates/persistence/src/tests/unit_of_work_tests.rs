// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use survivor_pool_domain::Role;

use super::helpers::{NOW, create_test_persistence, seed_user};
use crate::{NewTeam, Persistence, PersistenceError, verify_password};

fn new_team(name: &str) -> NewTeam {
    NewTeam {
        name: name.to_string(),
        short_name: String::from("TST"),
        logo_url: Some(String::from("https://example.org/crest.png")),
        stadium: Some(String::from("Estadio Azteca")),
    }
}

#[test]
fn test_error_rolls_back_every_write() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<(), PersistenceError> = persistence.unit_of_work(|uow| {
        uow.create_team(&new_team("Pumas"), NOW)?;
        uow.create_team(&new_team("Tigres"), NOW)?;
        Err(PersistenceError::QueryFailed(String::from("abort")))
    });
    assert!(result.is_err());

    let teams = persistence.unit_of_work(|uow| uow.list_teams()).unwrap();
    assert!(teams.is_empty(), "rolled-back inserts must not be visible");
}

#[test]
fn test_ok_commits() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .unit_of_work(|uow| -> Result<(), PersistenceError> {
            uow.create_team(&new_team("Pumas"), NOW)?;
            uow.create_team(&new_team("Tigres"), NOW)?;
            Ok(())
        })
        .unwrap();

    let names: Vec<String> = persistence
        .unit_of_work(|uow| uow.list_teams())
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Pumas", "Tigres"]);
}

#[test]
fn test_failed_statement_inside_work_rolls_back_earlier_writes() {
    let mut persistence: Persistence = create_test_persistence();

    let result: Result<i64, PersistenceError> = persistence.unit_of_work(|uow| {
        uow.create_team(&new_team("Toluca"), NOW)?;
        uow.create_team(&new_team("Toluca"), NOW)
    });
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));

    let teams = persistence.unit_of_work(|uow| uow.list_teams()).unwrap();
    assert!(teams.is_empty());
}

#[test]
fn test_duplicate_email_is_case_insensitive() {
    let mut persistence: Persistence = create_test_persistence();
    seed_user(&mut persistence, "ana@example.org", "Ana", Role::User);

    let result: Result<i64, PersistenceError> = persistence.unit_of_work(|uow| {
        uow.create_user("  ANA@Example.org ", "Ana Again", "pw", Role::User, NOW)
    });
    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_created_user_round_trips_with_hashed_password() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = seed_user(
        &mut persistence,
        "Luis@Example.org",
        "Luis",
        Role::Superadmin,
    );

    let user = persistence
        .unit_of_work(|uow| uow.find_user_by_email("luis@example.org"))
        .unwrap()
        .expect("user exists");

    assert_eq!(user.user_id, user_id);
    assert_eq!(user.email, "luis@example.org");
    assert_eq!(user.role, Role::Superadmin);
    assert!(!user.is_eliminated);
    assert!(user.is_active);
    assert_ne!(user.password_hash, "Str0ng!Password");
    assert!(verify_password("Str0ng!Password", &user.password_hash).unwrap());
    assert!(!verify_password("wrong", &user.password_hash).unwrap());
}

#[test]
fn test_session_lifecycle() {
    let mut persistence: Persistence = create_test_persistence();
    let user_id: i64 = seed_user(&mut persistence, "eva@example.org", "Eva", Role::User);

    persistence
        .unit_of_work(|uow| {
            uow.create_session("tok-live", user_id, NOW, "2026-09-01T00:00:00Z")?;
            uow.create_session("tok-old", user_id, NOW, "2026-07-01T00:00:00Z")
        })
        .unwrap();

    let removed: usize = persistence
        .unit_of_work(|uow| uow.delete_expired_sessions("2026-08-01T16:00:00Z"))
        .unwrap();
    assert_eq!(removed, 1);

    let session = persistence
        .unit_of_work(|uow| uow.find_session("tok-live"))
        .unwrap()
        .expect("live session kept");
    assert_eq!(session.user_id, user_id);

    persistence
        .unit_of_work(|uow| uow.touch_session(session.session_id, "2026-08-01T11:00:00"))
        .unwrap();
    let touched = persistence
        .unit_of_work(|uow| uow.find_session("tok-live"))
        .unwrap()
        .unwrap();
    assert_eq!(touched.last_activity_at, "2026-08-01T11:00:00");

    let deleted: usize = persistence
        .unit_of_work(|uow| uow.delete_session("tok-live"))
        .unwrap();
    assert_eq!(deleted, 1);
    assert!(persistence
        .unit_of_work(|uow| uow.find_session("tok-live"))
        .unwrap()
        .is_none());
}
