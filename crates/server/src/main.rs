// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod session;

use axum::{
    Json, Router,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use survivor_pool_api::{
    AckResponse, AffectedCountResponse, ApiError, CreateMatchweekRequest, CreateTeamRequest,
    CreatedCountResponse, CurrentWeekMatchesResponse, DeletedCountResponse, FinalizeMatchRequest,
    FinalizeMatchResponse, INTERNAL_ERROR_MESSAGE, LoginRequest, LoginResponse, MatchInfo,
    MatchweekInfo, OwnPickInfo, RegisterRequest, RegisterResponse, ReplaceMatchesRequest,
    SetMatchesActiveRequest, SetMatchweekActiveRequest, StandingInfo, StandingsScope,
    SubmitPickRequest, SubmitPickResponse, TeamInfo, UserInfo, WeeklySelectionInfo,
};
use survivor_pool_domain::{Clock, DEFAULT_TIMEZONE, SystemClock, Tz, parse_timezone};
use survivor_pool_persistence::Persistence;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::session::SessionUser;

/// Survivor Pool Server - HTTP server for the soccer survivor pool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// IANA time zone used for stored civil timestamps
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Session lifetime in days
    #[arg(long, default_value_t = 30)]
    session_days: u32,

    /// Email of the administrator to create when none exists
    #[arg(long, requires_all = ["admin_name", "admin_password"])]
    admin_email: Option<String>,

    /// Display name of the bootstrap administrator
    #[arg(long)]
    admin_name: Option<String>,

    /// Password of the bootstrap administrator
    #[arg(long)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// The time source for every operation.
    clock: Arc<dyn Clock>,
    /// Session lifetime.
    session_days: u32,
}

/// Query for operations scoped to one matchweek number.
#[derive(Debug, Deserialize)]
struct WeekQuery {
    /// The week number.
    week: Option<i64>,
}

impl WeekQuery {
    /// The requested week, defaulting to the first.
    fn or_first(&self) -> i64 {
        self.week.unwrap_or(1)
    }

    fn required(&self) -> Result<i64, HttpError> {
        self.week.ok_or_else(|| {
            HttpError::from(ApiError::InvalidInput {
                field: String::from("week"),
                message: String::from("Week number is required"),
            })
        })
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidState { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: String::from(INTERNAL_ERROR_MESSAGE),
                };
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// Accounts

/// Handler for POST `/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterResponse = survivor_pool_api::register(
        &mut persistence,
        app_state.clock.as_ref(),
        app_state.session_days,
        &req,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = survivor_pool_api::login(
        &mut persistence,
        app_state.clock.as_ref(),
        app_state.session_days,
        &req,
    )?;
    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, token): SessionUser,
) -> Result<Json<AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AckResponse = survivor_pool_api::logout(&mut persistence, &token)?;
    info!(user_id = actor.user_id, "Logged out");
    Ok(Json(response))
}

/// Handler for GET `/auth/me`.
async fn handle_whoami(SessionUser(_, user, _): SessionUser) -> Json<UserInfo> {
    Json(survivor_pool_api::whoami(&user))
}

// Picks

/// Handler for POST `/selections`.
async fn handle_submit_pick(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<SubmitPickRequest>,
) -> Result<Json<SubmitPickResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SubmitPickResponse =
        survivor_pool_api::submit_pick(&mut persistence, app_state.clock.as_ref(), &actor, &req)?;
    Ok(Json(response))
}

/// Handler for GET `/selections`.
async fn handle_own_picks(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
) -> Result<Json<Vec<OwnPickInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::own_picks(&mut persistence, &actor)?))
}

/// Handler for GET `/teams/available`.
async fn handle_available_teams(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
) -> Result<Json<Vec<TeamInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::available_teams(
        &mut persistence,
        &actor,
    )?))
}

// Public views

/// Handler for GET `/teams`.
async fn handle_list_teams(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<TeamInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::list_teams(&mut persistence)?))
}

/// Handler for GET `/matchweeks/current`.
async fn handle_current_matchweek(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MatchweekInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::current_matchweek(&mut persistence)?))
}

/// Handler for GET `/matches/current-week`.
async fn handle_current_week_matches(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<CurrentWeekMatchesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::current_week_matches(
        &mut persistence,
    )?))
}

/// Handler for GET `/leaderboard`.
async fn handle_leaderboard(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<StandingInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::leaderboard(
        &mut persistence,
        StandingsScope::Summary,
    )?))
}

/// Handler for GET `/leaderboard-detailed`.
async fn handle_leaderboard_detailed(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<StandingInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::leaderboard(
        &mut persistence,
        StandingsScope::Detailed,
    )?))
}

// Administration

/// Handler for POST `/admin/teams`.
async fn handle_create_team(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<CreateTeamRequest>,
) -> Result<Json<TeamInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::create_team(
        &mut persistence,
        app_state.clock.as_ref(),
        &actor,
        &req,
    )?))
}

/// Handler for GET `/admin/matchweeks`.
async fn handle_list_matchweeks(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
) -> Result<Json<Vec<MatchweekInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::list_matchweeks(
        &mut persistence,
        &actor,
    )?))
}

/// Handler for POST `/admin/matchweeks`.
async fn handle_create_matchweek(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<CreateMatchweekRequest>,
) -> Result<Json<MatchweekInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::create_matchweek(
        &mut persistence,
        app_state.clock.as_ref(),
        &actor,
        &req,
    )?))
}

/// Handler for PUT `/admin/matchweeks`.
///
/// Opens or closes a matchweek.
async fn handle_set_matchweek_active(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<SetMatchweekActiveRequest>,
) -> Result<Json<AckResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::set_matchweek_active(
        &mut persistence,
        app_state.clock.as_ref(),
        &actor,
        &req,
    )?))
}

/// Handler for GET `/admin/matches`.
async fn handle_list_all_matches(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
) -> Result<Json<Vec<MatchInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::list_all_matches(
        &mut persistence,
        &actor,
    )?))
}

/// Handler for PUT `/admin/matches`.
///
/// Records a final score.
async fn handle_finalize_match(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<FinalizeMatchRequest>,
) -> Result<Json<FinalizeMatchResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::finalize_match(
        &mut persistence,
        app_state.clock.as_ref(),
        &actor,
        &req,
    )?))
}

/// Handler for POST `/admin/matches/bulk`.
async fn handle_replace_matches(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<ReplaceMatchesRequest>,
) -> Result<Json<CreatedCountResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::replace_matches(
        &mut persistence,
        app_state.clock.as_ref(),
        &actor,
        &req,
    )?))
}

/// Handler for PUT `/admin/matches/toggle-active`.
async fn handle_set_matches_active(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Json(req): Json<SetMatchesActiveRequest>,
) -> Result<Json<AffectedCountResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::set_matches_active(
        &mut persistence,
        app_state.clock.as_ref(),
        &actor,
        &req,
    )?))
}

/// Handler for GET `/admin/matches/by-week`.
async fn handle_matches_by_week(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<MatchInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::matches_by_week(
        &mut persistence,
        &actor,
        query.or_first(),
    )?))
}

/// Handler for DELETE `/admin/matches/by-week`.
async fn handle_delete_matches_by_week(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Query(query): Query<WeekQuery>,
) -> Result<Json<DeletedCountResponse>, HttpError> {
    let week: i64 = query.required()?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::delete_matches_by_week(
        &mut persistence,
        &actor,
        week,
    )?))
}

/// Handler for GET `/admin/weekly-selections`.
async fn handle_weekly_selections(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _, _): SessionUser,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<WeeklySelectionInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(survivor_pool_api::weekly_selections(
        &mut persistence,
        &actor,
        query.or_first(),
    )?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_whoami))
        .route(
            "/selections",
            post(handle_submit_pick).get(handle_own_picks),
        )
        .route("/teams", get(handle_list_teams))
        .route("/teams/available", get(handle_available_teams))
        .route("/matchweeks/current", get(handle_current_matchweek))
        .route("/matches/current-week", get(handle_current_week_matches))
        .route("/leaderboard", get(handle_leaderboard))
        .route("/leaderboard-detailed", get(handle_leaderboard_detailed))
        .route("/admin/teams", post(handle_create_team))
        .route(
            "/admin/matchweeks",
            get(handle_list_matchweeks)
                .post(handle_create_matchweek)
                .put(handle_set_matchweek_active),
        )
        .route(
            "/admin/matches",
            get(handle_list_all_matches).put(handle_finalize_match),
        )
        .route("/admin/matches/bulk", post(handle_replace_matches))
        .route(
            "/admin/matches/toggle-active",
            put(handle_set_matches_active),
        )
        .route(
            "/admin/matches/by-week",
            get(handle_matches_by_week).delete(handle_delete_matches_by_week),
        )
        .route("/admin/weekly-selections", get(handle_weekly_selections))
        .with_state(app_state)
}

/// Creates the first administrator when the command line supplies one.
fn bootstrap_administrator(
    args: &Args,
    persistence: &mut Persistence,
    clock: &dyn Clock,
) -> Result<(), ApiError> {
    let (Some(email), Some(name), Some(password)) =
        (&args.admin_email, &args.admin_name, &args.admin_password)
    else {
        if args.admin_name.is_some() || args.admin_password.is_some() {
            warn!("Ignoring partial administrator bootstrap arguments");
        }
        return Ok(());
    };

    match survivor_pool_api::bootstrap_admin(persistence, clock, email, name, password)? {
        Some(user_id) => info!(user_id, "Bootstrapped administrator"),
        None => info!("Administrator already exists; bootstrap skipped"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Survivor Pool Server");

    let zone: Tz = parse_timezone(&args.timezone)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(zone));
    info!(timezone = %zone, session_days = args.session_days, "Clock configured");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    bootstrap_administrator(&args, &mut persistence, clock.as_ref())?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        clock,
        session_days: args.session_days,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
