// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_persistence, seed_team};
use crate::{Persistence, PersistenceError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// The database file plus its WAL and shared-memory siblings.
fn database_files(path: &Path) -> [PathBuf; 3] {
    let sibling = |suffix: &str| {
        let mut name: OsString = path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    };
    [path.to_path_buf(), sibling("-wal"), sibling("-shm")]
}

fn remove_database_files(path: &Path) {
    for file in database_files(path) {
        let _ = std::fs::remove_file(file);
    }
}

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    seed_team(&mut db1, "Club America", "AME");

    let teams1 = db1.unit_of_work(|uow| uow.list_teams()).unwrap();
    let teams2 = db2.unit_of_work(|uow| uow.list_teams()).unwrap();

    assert_eq!(teams1.len(), 1);
    assert!(teams2.is_empty(), "db2 must not see db1's rows");
}

#[test]
fn test_file_database_persists_between_opens() {
    let path = std::env::temp_dir().join(format!(
        "survivor_pool_init_{}_{}.db",
        std::process::id(),
        line!()
    ));
    remove_database_files(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        seed_team(&mut persistence, "Cruz Azul", "CAZ");
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let teams = reopened.unit_of_work(|uow| uow.list_teams()).unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].short_name, "CAZ");

    drop(reopened);
    remove_database_files(&path);
    for leftover in database_files(&path) {
        assert!(!leftover.exists(), "{} was left behind", leftover.display());
    }
}

#[test]
fn test_fresh_database_has_no_active_matchweek() {
    let mut persistence: Persistence = create_test_persistence();
    let active = persistence
        .unit_of_work(|uow| uow.active_matchweek())
        .unwrap();
    assert!(active.is_none());
}
