// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the survivor pool.
//!
//! The store is `SQLite` through Diesel, with the schema embedded as
//! migrations and applied on open.
//!
//! ## Units of work
//!
//! Every read and write goes through [`Persistence::unit_of_work`], which
//! runs a closure inside one database transaction. Any `Err` returned from
//! the closure rolls back every write the closure made. Operations that
//! check preconditions and then write load their context through the same
//! [`UnitOfWork`] they write through, so the check and the write are atomic.
//!
//! ## Testing
//!
//! [`Persistence::new_in_memory`] opens a uniquely named shared-cache
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{Connection, SqliteConnection};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use survivor_pool::{
    ActivationPlan, FinalizeContext, FinalizePlan, PickContext, PickPlan, SlateContext, SlatePlan,
    SubmitPick,
};
use survivor_pool_domain::{
    Match, Matchweek, Participant, Pick, PickHistoryEntry, Role, StandingPick, Team,
};
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    MatchDetail, NewMatchweek, NewTeam, PickDetail, SessionRecord, UserRecord, WeeklySelection,
};
pub use error::PersistenceError;
pub use queries::users::verify_password;

/// Counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Owner of the database connection.
pub struct Persistence {
    conn: SqliteConnection,
    password_cost: u32,
}

/// A transaction in progress.
///
/// Obtained only through [`Persistence::unit_of_work`].
pub struct UnitOfWork<'a> {
    conn: &'a mut SqliteConnection,
    password_cost: u32,
}

enum TransactionError<E> {
    Work(E),
    Database(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for TransactionError<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(err)
    }
}

impl Persistence {
    /// Opens a fresh, isolated in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let database_url: String = format!("file:memdb_survivor_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&database_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            password_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Opens or creates a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not valid UTF-8 or the database cannot
    /// be initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let database_url: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Database path is not valid UTF-8"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(database_url)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        info!(path = database_url, "File database ready");
        Ok(Self {
            conn,
            password_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Sets the bcrypt cost used for new password hashes.
    #[must_use]
    pub const fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// Runs `work` inside a single transaction.
    ///
    /// The transaction commits if `work` returns `Ok` and rolls back
    /// otherwise.
    ///
    /// # Arguments
    ///
    /// * `work` - The closure to run against the open transaction
    ///
    /// # Returns
    ///
    /// Whatever `work` returns.
    ///
    /// # Errors
    ///
    /// Returns the closure's error, or a `PersistenceError` converted into
    /// `E` if beginning or committing the transaction fails.
    pub fn unit_of_work<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        let password_cost: u32 = self.password_cost;
        let outcome: Result<T, TransactionError<E>> = self.conn.transaction(|conn| {
            let mut uow: UnitOfWork<'_> = UnitOfWork {
                conn,
                password_cost,
            };
            work(&mut uow).map_err(TransactionError::Work)
        });

        match outcome {
            Ok(value) => Ok(value),
            Err(TransactionError::Work(err)) => Err(err),
            Err(TransactionError::Database(err)) => Err(E::from(PersistenceError::from(err))),
        }
    }
}

impl UnitOfWork<'_> {
    // Accounts

    /// Retrieves an account by email, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<UserRecord>, PersistenceError> {
        queries::users::find_user_by_email(self.conn, email)
    }

    /// Retrieves an account by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_user_by_id(
        &mut self,
        user_id: i64,
    ) -> Result<Option<UserRecord>, PersistenceError> {
        queries::users::find_user_by_id(self.conn, user_id)
    }

    /// Competing accounts ordered by name, then id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_participants(&mut self) -> Result<Vec<Participant>, PersistenceError> {
        queries::users::list_participants(self.conn)
    }

    /// Number of administrator accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_administrators(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_administrators(self.conn)
    }

    /// Creates an account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the email is taken.
    pub fn create_user(
        &mut self,
        email: &str,
        name: &str,
        password: &str,
        role: Role,
        now: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(
            self.conn,
            email,
            name,
            password,
            role,
            now,
            self.password_cost,
        )
    }

    // Sessions

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_session(&mut self, token: &str) -> Result<Option<SessionRecord>, PersistenceError> {
        queries::users::find_session(self.conn, token)
    }

    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        token: &str,
        user_id: i64,
        now: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(self.conn, token, user_id, now, expires_at)
    }

    /// Records activity on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn touch_session(&mut self, session_id: i64, now: &str) -> Result<(), PersistenceError> {
        mutations::users::touch_session(self.conn, session_id, now)
    }

    /// Deletes a session by token, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, token: &str) -> Result<usize, PersistenceError> {
        mutations::users::delete_session(self.conn, token)
    }

    /// Deletes sessions that expired before `now_utc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now_utc: &str) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(self.conn, now_utc)
    }

    // League

    /// Every team ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_teams(&mut self) -> Result<Vec<Team>, PersistenceError> {
        queries::league::list_teams(self.conn)
    }

    /// Creates a team.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the name is taken.
    pub fn create_team(&mut self, team: &NewTeam, now: &str) -> Result<i64, PersistenceError> {
        mutations::league::create_team(self.conn, team, now)
    }

    /// Retrieves a matchweek by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_matchweek(
        &mut self,
        matchweek_id: i64,
    ) -> Result<Option<Matchweek>, PersistenceError> {
        queries::league::find_matchweek(self.conn, matchweek_id)
    }

    /// Retrieves a matchweek by week number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_matchweek_by_number(
        &mut self,
        week_number: u16,
    ) -> Result<Option<Matchweek>, PersistenceError> {
        queries::league::find_matchweek_by_number(self.conn, week_number)
    }

    /// The active matchweek, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_matchweek(&mut self) -> Result<Option<Matchweek>, PersistenceError> {
        queries::league::active_matchweek(self.conn)
    }

    /// Every matchweek ordered by week number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_matchweeks(&mut self) -> Result<Vec<Matchweek>, PersistenceError> {
        queries::league::list_matchweeks(self.conn)
    }

    /// Creates an inactive matchweek.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the week number is taken.
    pub fn create_matchweek(
        &mut self,
        matchweek: &NewMatchweek,
        now: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::league::create_matchweek(self.conn, matchweek, now)
    }

    /// Applies a matchweek activation plan.
    ///
    /// # Errors
    ///
    /// Returns an error if an update fails.
    pub fn apply_activation(
        &mut self,
        plan: &ActivationPlan,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::league::apply_activation(self.conn, plan, now)
    }

    /// A matchweek's matches ordered by kickoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn matches_in_matchweek(
        &mut self,
        matchweek_id: i64,
    ) -> Result<Vec<Match>, PersistenceError> {
        queries::league::matches_in_matchweek(self.conn, matchweek_id)
    }

    /// A matchweek's matches with team metadata, ordered by kickoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn match_details_in_matchweek(
        &mut self,
        matchweek_id: i64,
    ) -> Result<Vec<MatchDetail>, PersistenceError> {
        queries::league::match_details_in_matchweek(self.conn, matchweek_id)
    }

    /// Every match with team metadata, latest week first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn all_match_details(&mut self) -> Result<Vec<MatchDetail>, PersistenceError> {
        queries::league::all_match_details(self.conn)
    }

    /// Replaces a matchweek's matches, returning how many were created.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn replace_slate(
        &mut self,
        plan: &SlatePlan,
        now: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::league::replace_slate(self.conn, plan, now)
    }

    /// Deletes a matchweek's matches, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_matches_in_matchweek(
        &mut self,
        matchweek_id: i64,
    ) -> Result<usize, PersistenceError> {
        mutations::league::delete_matches_in_matchweek(self.conn, matchweek_id)
    }

    /// Sets the activity flag on matches, returning how many rows changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_matches_active(
        &mut self,
        match_ids: &[i64],
        is_active: bool,
        now: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::league::set_matches_active(self.conn, match_ids, is_active, now)
    }

    // Picks

    /// The participant's consumed teams.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn history_for_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<PickHistoryEntry>, PersistenceError> {
        queries::picks::history_for_user(self.conn, user_id)
    }

    /// The participant's pick for a matchweek.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn pick_for_matchweek(
        &mut self,
        user_id: i64,
        matchweek_id: i64,
    ) -> Result<Option<Pick>, PersistenceError> {
        queries::picks::pick_for_matchweek(self.conn, user_id, matchweek_id)
    }

    /// Every participant pick with week and team, for the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn standing_picks(&mut self) -> Result<Vec<StandingPick>, PersistenceError> {
        queries::picks::standing_picks(self.conn)
    }

    /// The participant's own picks with context, latest week first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn pick_details_for_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<PickDetail>, PersistenceError> {
        queries::picks::pick_details_for_user(self.conn, user_id)
    }

    /// Every pick of a matchweek, ordered by participant name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn weekly_selections(
        &mut self,
        matchweek_id: i64,
    ) -> Result<Vec<WeeklySelection>, PersistenceError> {
        queries::picks::weekly_selections(self.conn, matchweek_id)
    }

    /// Writes a pick plan, returning the pick id.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn apply_pick_plan(&mut self, plan: &PickPlan, now: &str) -> Result<i64, PersistenceError> {
        mutations::picks::apply_pick_plan(self.conn, plan, now)
    }

    /// Writes a finalization plan, returning the number of users newly
    /// eliminated.
    ///
    /// # Errors
    ///
    /// Returns an error if a write fails.
    pub fn apply_finalize_plan(
        &mut self,
        plan: &FinalizePlan,
        now: &str,
    ) -> Result<usize, PersistenceError> {
        mutations::picks::apply_finalize_plan(self.conn, plan, now)
    }

    // Operation contexts

    /// Loads everything a pick submission is checked against.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn pick_context(
        &mut self,
        user_id: i64,
        command: SubmitPick,
    ) -> Result<PickContext, PersistenceError> {
        Ok(PickContext {
            matchweek: self.find_matchweek(command.matchweek_id)?,
            history: self.history_for_user(user_id)?,
            playing_match: queries::league::active_match_for_team(
                self.conn,
                command.matchweek_id,
                command.team_id,
            )?,
            existing_pick: self.pick_for_matchweek(user_id, command.matchweek_id)?,
        })
    }

    /// Loads a match and every pick referencing it.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn finalize_context(&mut self, match_id: i64) -> Result<FinalizeContext, PersistenceError> {
        let fixture: Option<Match> = queries::league::find_match(self.conn, match_id)?;
        let picks: Vec<Pick> = match fixture {
            Some(_) => queries::picks::picks_for_match(self.conn, match_id)?,
            None => Vec::new(),
        };
        Ok(FinalizeContext { fixture, picks })
    }

    /// Loads the slate context for a matchweek identified by id.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn slate_context(&mut self, matchweek_id: i64) -> Result<SlateContext, PersistenceError> {
        let matchweek: Option<Matchweek> = self.find_matchweek(matchweek_id)?;
        self.slate_context_for(matchweek)
    }

    /// Loads the slate context for a matchweek identified by week number.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn slate_context_by_number(
        &mut self,
        week_number: u16,
    ) -> Result<SlateContext, PersistenceError> {
        let matchweek: Option<Matchweek> = self.find_matchweek_by_number(week_number)?;
        self.slate_context_for(matchweek)
    }

    fn slate_context_for(
        &mut self,
        matchweek: Option<Matchweek>,
    ) -> Result<SlateContext, PersistenceError> {
        let known_team_ids: HashSet<i64> = queries::league::team_ids(self.conn)?;
        let pick_count: usize = match &matchweek {
            Some(mw) => queries::picks::count_picks_in_matchweek(self.conn, mw.matchweek_id)?,
            None => 0,
        };
        Ok(SlateContext {
            matchweek,
            known_team_ids,
            pick_count,
        })
    }
}
