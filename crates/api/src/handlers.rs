// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Every handler validates its input once, then runs its reads and writes in
//! a single unit of work. Internal failures are logged against the operation
//! and returned with an opaque message.

use survivor_pool::{
    ActivationPlan, FinalizeContext, FinalizeMatch, FinalizePlan, PickContext, PickPlan,
    ReplaceMatches, SetMatchesActive, SetMatchweekActive, SlateContext, SlatePlan, SubmitPick,
    plan_match_activity, plan_matchweek_activation, plan_pick, plan_slate_removal,
    plan_slate_replacement, resolve_match,
};
use survivor_pool_domain::{
    Clock, Match, Matchweek, NewMatch, Participant, PickHistoryEntry, Role, Standing, StandingPick,
    StandingsScope, Team, available_teams as compute_available_teams, compute_standings,
    parse_date, parse_kickoff, validate_account_fields, validate_matchweek_dates, validate_score,
    validate_team_fields, validate_week_number,
};
use survivor_pool_persistence::{
    MatchDetail, NewMatchweek, NewTeam, Persistence, PickDetail, UserRecord, WeeklySelection,
};
use time::Date;
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, IssuedSession};
use crate::error::{ApiError, conflict_on_duplicate, translate_core_error, translate_domain_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AckResponse, AffectedCountResponse, CreateMatchweekRequest, CreateTeamRequest,
    CreatedCountResponse, CurrentWeekMatchesResponse, DeletedCountResponse, FinalizeMatchRequest,
    FinalizeMatchResponse, LoginRequest, LoginResponse, MatchInfo, MatchweekInfo, OwnPickInfo,
    PickOutcome, RegisterRequest, RegisterResponse, ReplaceMatchesRequest, SetMatchesActiveRequest,
    SetMatchweekActiveRequest, StandingInfo, SubmitPickRequest, SubmitPickResponse, TeamInfo,
    UserInfo, WeeklySelectionInfo,
};

// Accounts

/// Creates a participant account and opens its first session.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `clock` - The time source
/// * `session_days` - Session lifetime
/// * `request` - The registration request
///
/// # Errors
///
/// Returns an error if:
/// - The email or name is malformed
/// - The password breaks the password policy
/// - The email is already registered
pub fn register(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    session_days: u32,
    request: &RegisterRequest,
) -> Result<RegisterResponse, ApiError> {
    let email: &str = request.email.trim();
    let name: &str = request.name.trim();
    validate_account_fields(email, name).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(&request.password, email, name)?;

    let now: String = clock.civil_timestamp();
    persistence
        .unit_of_work(|uow| -> Result<RegisterResponse, ApiError> {
            if uow.find_user_by_email(email)?.is_some() {
                return Err(duplicate_email(email));
            }

            let user_id: i64 = uow
                .create_user(email, name, &request.password, Role::User, &now)
                .map_err(conflict_on_duplicate("unique_email", duplicate_email_message(email)))?;
            let user: UserRecord =
                uow.find_user_by_id(user_id)?
                    .ok_or_else(|| ApiError::Internal {
                        message: format!("User {user_id} missing after insert"),
                    })?;
            let session: IssuedSession =
                AuthenticationService::open_session(uow, clock, session_days, user_id)?;

            info!(user_id, "Registered participant");
            Ok(RegisterResponse {
                user: UserInfo::from(&user),
                token: session.token,
            })
        })
        .map_err(|e| e.in_operation("register", &format!("email={email}")))
}

/// Verifies credentials and opens a session.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` for unknown emails, wrong
/// passwords and deactivated accounts.
pub fn login(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    session_days: u32,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (user, session): (UserRecord, IssuedSession) = AuthenticationService::login(
        persistence,
        clock,
        session_days,
        &request.email,
        &request.password,
    )
    .map_err(|e| ApiError::from(e).in_operation("login", ""))?;

    Ok(LoginResponse {
        user: UserInfo::from(&user),
        token: session.token,
        expires_at: session.expires_at,
    })
}

/// Ends the caller's session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<AckResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)
        .map_err(|e| ApiError::from(e).in_operation("logout", ""))?;
    Ok(AckResponse::ok("Logged out"))
}

/// Returns the caller's own account.
#[must_use]
pub fn whoami(user: &UserRecord) -> UserInfo {
    UserInfo::from(user)
}

/// Creates the first administrator if none exists.
///
/// # Returns
///
/// * `Ok(Some(user_id))` if an administrator was created
/// * `Ok(None)` if one already existed
///
/// # Errors
///
/// Returns an error if the fields break the account or password rules, or
/// storage fails.
pub fn bootstrap_admin(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    email: &str,
    name: &str,
    password: &str,
) -> Result<Option<i64>, ApiError> {
    let email: &str = email.trim();
    let name: &str = name.trim();
    validate_account_fields(email, name).map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(password, email, name)?;

    let now: String = clock.civil_timestamp();
    persistence
        .unit_of_work(|uow| -> Result<Option<i64>, ApiError> {
            if uow.count_administrators()? > 0 {
                return Ok(None);
            }
            let user_id: i64 = uow
                .create_user(email, name, password, Role::Superadmin, &now)
                .map_err(conflict_on_duplicate("unique_email", duplicate_email_message(email)))?;
            info!(user_id, "Created initial administrator");
            Ok(Some(user_id))
        })
        .map_err(|e| e.in_operation("bootstrap_admin", &format!("email={email}")))
}

// Picks

/// Makes or changes the caller's pick for a matchweek.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `clock` - The time source
/// * `actor` - The authenticated caller
/// * `request` - The pick
///
/// # Errors
///
/// Returns the first failed precondition, in this order:
/// - `Forbidden` if the caller is an administrator
/// - `ResourceNotFound` if the matchweek does not exist
/// - `InvalidState` if the matchweek is not active
/// - `Conflict` if the team was used in another matchweek
/// - `InvalidState` if the team has no active match in the matchweek
pub fn submit_pick(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &SubmitPickRequest,
) -> Result<SubmitPickResponse, ApiError> {
    let command: SubmitPick = SubmitPick {
        team_id: request.team_id,
        matchweek_id: request.matchweek_id,
    };
    let now: String = clock.civil_timestamp();

    persistence
        .unit_of_work(|uow| -> Result<SubmitPickResponse, ApiError> {
            let context: PickContext = uow.pick_context(actor.user_id, command)?;
            let plan: PickPlan = plan_pick(&actor.to_core_actor(), &context, command)
                .map_err(translate_core_error)?;
            let pick_id: i64 = uow
                .apply_pick_plan(&plan, &now)
                .map_err(conflict_on_duplicate(
                    "team_used_once",
                    format!("Team {} is already in your history", command.team_id),
                ))?;

            let outcome: PickOutcome = if plan.write.is_insert() {
                PickOutcome::Created
            } else {
                PickOutcome::Updated
            };
            info!(
                user_id = actor.user_id,
                matchweek_id = command.matchweek_id,
                team_id = command.team_id,
                pick_id,
                ?outcome,
                "Recorded pick"
            );
            Ok(SubmitPickResponse {
                outcome,
                pick_id,
                match_id: plan.write.match_id(),
            })
        })
        .map_err(|e| {
            e.in_operation(
                "submit_pick",
                &format!(
                    "user_id={} matchweek_id={} team_id={}",
                    actor.user_id, command.matchweek_id, command.team_id
                ),
            )
        })
}

/// Lists the caller's picks, latest week first.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn own_picks(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<OwnPickInfo>, ApiError> {
    let picks: Vec<PickDetail> = persistence
        .unit_of_work(|uow| uow.pick_details_for_user(actor.user_id))
        .map_err(|e| {
            ApiError::from(e).in_operation("own_picks", &format!("user_id={}", actor.user_id))
        })?;
    Ok(picks.iter().map(OwnPickInfo::from).collect())
}

/// Lists the teams the caller may still pick in the active matchweek.
///
/// # Errors
///
/// Returns an error if:
/// - No matchweek is active
/// - Storage fails
pub fn available_teams(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TeamInfo>, ApiError> {
    let teams: Vec<Team> = persistence
        .unit_of_work(|uow| -> Result<Vec<Team>, ApiError> {
            let matchweek: Matchweek = uow.active_matchweek()?.ok_or_else(no_active_matchweek)?;
            let all_teams: Vec<Team> = uow.list_teams()?;
            let history: Vec<PickHistoryEntry> = uow.history_for_user(actor.user_id)?;
            let fixtures: Vec<Match> = uow.matches_in_matchweek(matchweek.matchweek_id)?;
            Ok(compute_available_teams(
                &all_teams,
                &history,
                matchweek.matchweek_id,
                &fixtures,
            ))
        })
        .map_err(|e| e.in_operation("available_teams", &format!("user_id={}", actor.user_id)))?;
    Ok(teams.iter().map(TeamInfo::from).collect())
}

// Results

/// Records a match's final score and resolves every pick on it.
///
/// Re-finalizing recomputes every pick's result from the new score. Users
/// already eliminated stay eliminated.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `clock` - The time source
/// * `actor` - The authenticated caller
/// * `request` - The final score
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator
/// - A score is negative
/// - The match does not exist
/// - A pick's team plays on neither side of the match
pub fn finalize_match(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &FinalizeMatchRequest,
) -> Result<FinalizeMatchResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "finalize_match")?;
    let command: FinalizeMatch = FinalizeMatch {
        match_id: request.match_id,
        home_score: validate_score(request.home_score).map_err(translate_domain_error)?,
        away_score: validate_score(request.away_score).map_err(translate_domain_error)?,
    };
    let now: String = clock.civil_timestamp();

    persistence
        .unit_of_work(|uow| -> Result<FinalizeMatchResponse, ApiError> {
            let context: FinalizeContext = uow.finalize_context(command.match_id)?;
            let plan: FinalizePlan =
                resolve_match(&context, command).map_err(translate_core_error)?;
            let newly_eliminated: usize = uow.apply_finalize_plan(&plan, &now)?;

            let response: FinalizeMatchResponse = FinalizeMatchResponse {
                match_id: plan.match_id,
                processed_count: plan.processed_count(),
                eliminated_count: plan.losing_count(),
                newly_eliminated_count: newly_eliminated,
            };
            info!(
                match_id = plan.match_id,
                home_score = plan.home_score,
                away_score = plan.away_score,
                processed = response.processed_count,
                losing = response.eliminated_count,
                newly_eliminated,
                "Finalized match"
            );
            Ok(response)
        })
        .map_err(|e| e.in_operation("finalize_match", &format!("match_id={}", command.match_id)))
}

/// Computes the leaderboard.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `scope` - Whether each row carries its picks
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn leaderboard(
    persistence: &mut Persistence,
    scope: StandingsScope,
) -> Result<Vec<StandingInfo>, ApiError> {
    let standings: Vec<Standing> = persistence
        .unit_of_work(|uow| -> Result<Vec<Standing>, ApiError> {
            let participants: Vec<Participant> = uow.list_participants()?;
            let picks: Vec<StandingPick> = uow.standing_picks()?;
            Ok(compute_standings(&participants, &picks, scope))
        })
        .map_err(|e| e.in_operation("leaderboard", ""))?;

    for standing in standings.iter().filter(|s| s.last_week_inferred) {
        warn!(
            user_id = standing.user_id,
            last_week_alive = standing.last_week_alive,
            "Eliminated participant has no losing pick; last week alive inferred from latest pick"
        );
    }

    let detailed: bool = scope == StandingsScope::Detailed;
    Ok(standings
        .iter()
        .map(|s| StandingInfo::from_standing(s, detailed))
        .collect())
}

// League

/// Lists every team ordered by name.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn list_teams(persistence: &mut Persistence) -> Result<Vec<TeamInfo>, ApiError> {
    let teams: Vec<Team> = persistence
        .unit_of_work(|uow| uow.list_teams())
        .map_err(|e| ApiError::from(e).in_operation("list_teams", ""))?;
    Ok(teams.iter().map(TeamInfo::from).collect())
}

/// Creates a team.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, a field is
/// blank, or the name is taken.
pub fn create_team(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &CreateTeamRequest,
) -> Result<TeamInfo, ApiError> {
    AuthorizationService::authorize_admin(actor, "create_team")?;
    validate_team_fields(&request.name, &request.short_name).map_err(translate_domain_error)?;

    let team: NewTeam = NewTeam {
        name: request.name.trim().to_string(),
        short_name: request.short_name.trim().to_string(),
        logo_url: non_blank(request.logo_url.as_deref()),
        stadium: non_blank(request.stadium.as_deref()),
    };
    let now: String = clock.civil_timestamp();

    let team_id: i64 = persistence
        .unit_of_work(|uow| {
            uow.create_team(&team, &now).map_err(conflict_on_duplicate(
                "unique_team_name",
                format!("A team named '{}' already exists", team.name),
            ))
        })
        .map_err(|e| e.in_operation("create_team", &format!("name={}", team.name)))?;

    Ok(TeamInfo {
        id: team_id,
        name: team.name,
        short_name: team.short_name,
        logo_url: team.logo_url,
        stadium: team.stadium,
    })
}

/// Returns the active matchweek.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no matchweek is active.
pub fn current_matchweek(persistence: &mut Persistence) -> Result<MatchweekInfo, ApiError> {
    let matchweek: Option<Matchweek> = persistence
        .unit_of_work(|uow| uow.active_matchweek())
        .map_err(|e| ApiError::from(e).in_operation("current_matchweek", ""))?;

    matchweek
        .as_ref()
        .map(MatchweekInfo::from)
        .ok_or_else(no_active_matchweek)
}

/// Returns the active matchweek with its matches.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn current_week_matches(
    persistence: &mut Persistence,
) -> Result<CurrentWeekMatchesResponse, ApiError> {
    persistence
        .unit_of_work(|uow| -> Result<CurrentWeekMatchesResponse, ApiError> {
            let Some(matchweek) = uow.active_matchweek()? else {
                return Ok(CurrentWeekMatchesResponse {
                    matchweek: None,
                    matches: Vec::new(),
                });
            };
            let details: Vec<MatchDetail> =
                uow.match_details_in_matchweek(matchweek.matchweek_id)?;
            Ok(CurrentWeekMatchesResponse {
                matchweek: Some(MatchweekInfo::from(&matchweek)),
                matches: details.iter().map(MatchInfo::from).collect(),
            })
        })
        .map_err(|e| e.in_operation("current_week_matches", ""))
}

/// Lists every matchweek ordered by week number.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or storage fails.
pub fn list_matchweeks(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<MatchweekInfo>, ApiError> {
    AuthorizationService::authorize_admin(actor, "list_matchweeks")?;
    let matchweeks: Vec<Matchweek> = persistence
        .unit_of_work(|uow| uow.list_matchweeks())
        .map_err(|e| ApiError::from(e).in_operation("list_matchweeks", ""))?;
    Ok(matchweeks.iter().map(MatchweekInfo::from).collect())
}

/// Creates an inactive matchweek.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator
/// - The week number is below 1
/// - A date does not parse, or the end precedes the start
/// - The week number is taken
pub fn create_matchweek(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &CreateMatchweekRequest,
) -> Result<MatchweekInfo, ApiError> {
    AuthorizationService::authorize_admin(actor, "create_matchweek")?;
    let week_number: u16 =
        validate_week_number(request.week_number).map_err(translate_domain_error)?;
    let start_date: Date = parse_date(&request.start_date).map_err(translate_domain_error)?;
    let end_date: Date = parse_date(&request.end_date).map_err(translate_domain_error)?;
    validate_matchweek_dates(start_date, end_date).map_err(translate_domain_error)?;

    let new_matchweek: NewMatchweek = NewMatchweek {
        week_number,
        name: non_blank(request.name.as_deref()),
        season: non_blank(request.season.as_deref()),
        start_date,
        end_date,
    };
    let now: String = clock.civil_timestamp();

    persistence
        .unit_of_work(|uow| -> Result<MatchweekInfo, ApiError> {
            let matchweek_id: i64 = uow
                .create_matchweek(&new_matchweek, &now)
                .map_err(conflict_on_duplicate(
                    "unique_week_number",
                    format!("Matchweek {week_number} already exists"),
                ))?;
            let matchweek: Matchweek =
                uow.find_matchweek(matchweek_id)?
                    .ok_or_else(|| ApiError::Internal {
                        message: format!("Matchweek {matchweek_id} missing after insert"),
                    })?;
            Ok(MatchweekInfo::from(&matchweek))
        })
        .map_err(|e| e.in_operation("create_matchweek", &format!("week_number={week_number}")))
}

/// Opens or closes a matchweek.
///
/// Opening a matchweek closes every other one in the same transaction.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the matchweek
/// does not exist.
pub fn set_matchweek_active(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &SetMatchweekActiveRequest,
) -> Result<AckResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "set_matchweek_active")?;
    let command: SetMatchweekActive = SetMatchweekActive {
        matchweek_id: request.matchweek_id,
        is_active: request.is_active,
    };
    let now: String = clock.civil_timestamp();

    persistence
        .unit_of_work(|uow| -> Result<(), ApiError> {
            let matchweek: Option<Matchweek> = uow.find_matchweek(command.matchweek_id)?;
            let plan: ActivationPlan = plan_matchweek_activation(matchweek.as_ref(), command)
                .map_err(translate_core_error)?;
            uow.apply_activation(&plan, &now)?;
            Ok(())
        })
        .map_err(|e| {
            e.in_operation(
                "set_matchweek_active",
                &format!("matchweek_id={}", command.matchweek_id),
            )
        })?;

    let message: &str = if command.is_active {
        "Matchweek activated"
    } else {
        "Matchweek deactivated"
    };
    Ok(AckResponse::ok(message))
}

// Matches

/// Replaces every match of a matchweek.
///
/// New matches are scheduled and active. Refused when any pick references
/// the current matches.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator
/// - A kickoff does not parse
/// - The matchweek does not exist
/// - A team plays itself, appears twice, or does not exist
/// - Picks reference the matchweek's matches
pub fn replace_matches(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &ReplaceMatchesRequest,
) -> Result<CreatedCountResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "replace_matches")?;
    let matches: Vec<NewMatch> = request
        .matches
        .iter()
        .map(|entry| {
            Ok(NewMatch {
                home_team_id: entry.home_team_id,
                away_team_id: entry.away_team_id,
                kickoff: parse_kickoff(&entry.kickoff).map_err(translate_domain_error)?,
            })
        })
        .collect::<Result<Vec<NewMatch>, ApiError>>()?;
    let matchweek_id: i64 = request.matchweek_id;
    let command: ReplaceMatches = ReplaceMatches {
        matchweek_id,
        matches,
    };
    let now: String = clock.civil_timestamp();

    let created: usize = persistence
        .unit_of_work(|uow| -> Result<usize, ApiError> {
            let context: SlateContext = uow.slate_context(matchweek_id)?;
            let plan: SlatePlan =
                plan_slate_replacement(&context, command).map_err(translate_core_error)?;
            Ok(uow.replace_slate(&plan, &now)?)
        })
        .map_err(|e| e.in_operation("replace_matches", &format!("matchweek_id={matchweek_id}")))?;

    Ok(CreatedCountResponse { created })
}

/// Suspends or restores matches.
///
/// Status and scores are untouched.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or no ids were
/// supplied.
pub fn set_matches_active(
    persistence: &mut Persistence,
    clock: &dyn Clock,
    actor: &AuthenticatedActor,
    request: &SetMatchesActiveRequest,
) -> Result<AffectedCountResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "set_matches_active")?;
    let command: SetMatchesActive = SetMatchesActive {
        match_ids: request.match_ids.clone(),
        is_active: request.is_active,
    };
    let match_ids: Vec<i64> = plan_match_activity(&command).map_err(translate_core_error)?;
    let now: String = clock.civil_timestamp();

    let affected: usize = persistence
        .unit_of_work(|uow| uow.set_matches_active(&match_ids, command.is_active, &now))
        .map_err(|e| {
            ApiError::from(e)
                .in_operation("set_matches_active", &format!("match_ids={match_ids:?}"))
        })?;

    info!(affected, is_active = command.is_active, "Toggled matches");
    Ok(AffectedCountResponse { affected })
}

/// Lists every match, latest week first, then by kickoff.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or storage fails.
pub fn list_all_matches(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<MatchInfo>, ApiError> {
    AuthorizationService::authorize_admin(actor, "list_all_matches")?;
    let details: Vec<MatchDetail> = persistence
        .unit_of_work(|uow| uow.all_match_details())
        .map_err(|e| ApiError::from(e).in_operation("list_all_matches", ""))?;
    Ok(details.iter().map(MatchInfo::from).collect())
}

/// Lists the matches of the matchweek with `week_number`, by kickoff.
///
/// An unknown week has no matches.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the week
/// number is below 1.
pub fn matches_by_week(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    week_number: i64,
) -> Result<Vec<MatchInfo>, ApiError> {
    AuthorizationService::authorize_admin(actor, "matches_by_week")?;
    let week: u16 = validate_week_number(week_number).map_err(translate_domain_error)?;

    let details: Vec<MatchDetail> = persistence
        .unit_of_work(|uow| -> Result<Vec<MatchDetail>, ApiError> {
            match uow.find_matchweek_by_number(week)? {
                Some(matchweek) => Ok(uow.match_details_in_matchweek(matchweek.matchweek_id)?),
                None => Ok(Vec::new()),
            }
        })
        .map_err(|e| e.in_operation("matches_by_week", &format!("week_number={week}")))?;
    Ok(details.iter().map(MatchInfo::from).collect())
}

/// Deletes every match of the matchweek with `week_number`.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not an administrator
/// - No matchweek has that week number
/// - Picks reference the matchweek's matches
pub fn delete_matches_by_week(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    week_number: i64,
) -> Result<DeletedCountResponse, ApiError> {
    AuthorizationService::authorize_admin(actor, "delete_matches_by_week")?;
    let week: u16 = validate_week_number(week_number).map_err(translate_domain_error)?;

    let deleted: usize = persistence
        .unit_of_work(|uow| -> Result<usize, ApiError> {
            let context: SlateContext = uow.slate_context_by_number(week)?;
            let matchweek_id: i64 =
                plan_slate_removal(&context, week).map_err(translate_core_error)?;
            Ok(uow.delete_matches_in_matchweek(matchweek_id)?)
        })
        .map_err(|e| e.in_operation("delete_matches_by_week", &format!("week_number={week}")))?;

    Ok(DeletedCountResponse { deleted })
}

/// Lists every pick of the matchweek with `week_number`, by participant name.
///
/// An unknown week has no picks.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the week
/// number is below 1.
pub fn weekly_selections(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    week_number: i64,
) -> Result<Vec<WeeklySelectionInfo>, ApiError> {
    AuthorizationService::authorize_admin(actor, "weekly_selections")?;
    let week: u16 = validate_week_number(week_number).map_err(translate_domain_error)?;

    let selections: Vec<WeeklySelection> = persistence
        .unit_of_work(|uow| -> Result<Vec<WeeklySelection>, ApiError> {
            match uow.find_matchweek_by_number(week)? {
                Some(matchweek) => Ok(uow.weekly_selections(matchweek.matchweek_id)?),
                None => Ok(Vec::new()),
            }
        })
        .map_err(|e| e.in_operation("weekly_selections", &format!("week_number={week}")))?;
    Ok(selections.iter().map(WeeklySelectionInfo::from).collect())
}

fn duplicate_email(email: &str) -> ApiError {
    ApiError::Conflict {
        rule: String::from("unique_email"),
        message: duplicate_email_message(email),
    }
}

fn duplicate_email_message(email: &str) -> String {
    format!("An account with email '{email}' already exists")
}

fn no_active_matchweek() -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Matchweek"),
        message: String::from("No matchweek is active"),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
