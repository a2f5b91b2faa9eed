//! HTTP routes: game sessions and the Discord lookup proxy.

use crate::lookup::{LookupError, UserDirectory, validate_user_id};
use crate::sessions::{SessionError, SessionId, SessionManager};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use derive_more::{Display, Error, From};
use megatoe_engine::{
    ActiveBoard, Arena, Board, Difficulty, GameMode, GameSession, GameStatus, MetaCell, Move, MoveError,
    Player, Position, Scoreboard, TurnReport, Variant,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    sessions: SessionManager,
    directory: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Bundles the session store and the user directory.
    pub fn new(sessions: SessionManager, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            sessions,
            directory,
        }
    }
}

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Display, Error, From)]
pub enum ApiError {
    /// Session store or game rule failure.
    #[display("{}", _0)]
    Session(SessionError),
    /// Discord lookup failure.
    #[display("{}", _0)]
    Lookup(LookupError),
    /// Request body missing, not JSON, or not the expected shape.
    #[display("{}", _0.body_text())]
    Body(JsonRejection),
}

impl From<MoveError> for ApiError {
    fn from(e: MoveError) -> Self {
        ApiError::Session(SessionError::Move(e))
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Session(SessionError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::AlreadyExists { .. }) => StatusCode::CONFLICT,
            ApiError::Session(SessionError::LockPoisoned) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Session(SessionError::Move(MoveError::GameAlreadyOver)) => {
                StatusCode::CONFLICT
            }
            ApiError::Session(SessionError::Move(_)) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(e) => e.status(),
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, %status, "Request failed");
        } else {
            debug!(error = %self, %status, "Request rejected");
        }
        let body = Json(json!({ "success": false, "message": self.to_string() }));
        (status, body).into_response()
    }
}

/// Board cells as seen by a client: `null` for empty.
type Cells = [Option<Player>; 9];

/// Snapshot of a session for clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Session id.
    pub id: SessionId,
    /// Variant being played.
    pub variant: Variant,
    /// Seating of humans and computers.
    pub mode: GameMode,
    /// AI strength.
    pub difficulty: Difficulty,
    /// One board for classic, nine sub-boards in row-major order for ultimate.
    pub boards: Vec<Cells>,
    /// Sub-board outcomes (ultimate only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_cells: Option<[MetaCell; 9]>,
    /// Active-board constraint (ultimate only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_board: Option<ActiveBoard>,
    /// Player to move.
    pub current_player: Player,
    /// Game status.
    pub status: GameStatus,
    /// Winning line of a single-board win.
    pub winning_line: Option<[Position; 3]>,
    /// Accepted moves of the current game.
    pub history: Vec<Move>,
    /// Legal moves for the player to move.
    pub legal_moves: Vec<Move>,
    /// Cumulative scores.
    pub scores: Scoreboard,
}

impl SessionView {
    /// Captures the current state of a session.
    pub fn new(id: &str, session: &GameSession) -> Self {
        let cells = |board: &Board| board.squares().map(|square| square.player());
        let (boards, meta_cells) = match session.arena() {
            Arena::Classic(board) => (vec![cells(board)], None),
            Arena::Ultimate(meta) => (
                meta.boards().iter().map(cells).collect(),
                Some(meta.meta_cells()),
            ),
        };
        Self {
            id: id.to_string(),
            variant: session.variant(),
            mode: session.mode(),
            difficulty: session.difficulty(),
            boards,
            meta_cells,
            active_board: session.arena().active(),
            current_player: session.current_player(),
            status: session.status(),
            winning_line: session.arena().winning_line(),
            history: session.history().to_vec(),
            legal_moves: session.legal_moves(),
            scores: *session.scores(),
        }
    }
}

/// Result of a move or reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnResponse {
    /// Moves applied and their outcome.
    #[serde(flatten)]
    pub report: TurnReport,
    /// Session after the turn.
    pub game: SessionView,
}

/// Body of `POST /api/games`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateGameRequest {
    /// Explicit session id; generated when absent.
    pub id: Option<SessionId>,
    /// Variant to play.
    pub variant: Variant,
    /// Seating of humans and computers.
    pub mode: GameMode,
    /// AI strength.
    pub difficulty: Difficulty,
}

/// Body of `POST /api/games/{id}/settings`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsRequest {
    /// New AI strength, effective from the next computer move.
    pub difficulty: Option<Difficulty>,
    /// New seating; starts a new game.
    pub mode: Option<GameMode>,
}

/// Query of `GET /api/lookup`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupQuery {
    /// Discord user id.
    pub id: Option<String>,
}

/// Successful lookup body.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResponse {
    /// Always true.
    pub success: bool,
    /// The Discord user object.
    pub data: Value,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/games/{id}", get(get_game).delete(delete_game))
        .route("/api/games/{id}/moves", post(make_move))
        .route("/api/games/{id}/reset", post(reset_game))
        .route("/api/games/{id}/reset-scores", post(reset_scores))
        .route("/api/games/{id}/settings", post(update_settings))
        .route("/api/lookup", get(lookup_user))
        .layer(middleware::map_response(allow_any_origin))
        .with_state(state)
}

async fn allow_any_origin(mut response: Response) -> Response {
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<SessionId>>, ApiError> {
    Ok(Json(state.sessions.list()?))
}

#[instrument(skip(state))]
async fn create_game(
    State(state): State<AppState>,
    request: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let Json(request) = request?;
    let id = state.sessions.create(
        request.id,
        request.variant,
        request.mode,
        request.difficulty,
    )?;
    let view = state
        .sessions
        .with_entry(&id, |entry| Ok(SessionView::new(&id, &entry.session)))?;
    info!(session_id = %id, "Game created");
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_entry(&id, |entry| Ok(SessionView::new(&id, &entry.session)))?;
    Ok(Json(view))
}

#[instrument(skip(state))]
async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    mv: Result<Json<Move>, JsonRejection>,
) -> Result<Json<TurnResponse>, ApiError> {
    let Json(mv) = mv?;
    let response = state.sessions.with_entry(&id, |entry| {
        let report = entry.controller.submit(&mut entry.session, mv)?;
        Ok(TurnResponse {
            report,
            game: SessionView::new(&id, &entry.session),
        })
    });
    match &response {
        Ok(turn) => info!(session_id = %id, status = %turn.report.status, "Move accepted"),
        Err(e) => warn!(session_id = %id, error = %e, "Move rejected"),
    }
    Ok(Json(response?))
}

#[instrument(skip(state))]
async fn reset_game(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<TurnResponse>, ApiError> {
    let response = state.sessions.with_entry(&id, |entry| {
        let report = entry.controller.reset(&mut entry.session)?;
        Ok(TurnResponse {
            report,
            game: SessionView::new(&id, &entry.session),
        })
    })?;
    Ok(Json(response))
}

#[instrument(skip(state))]
async fn reset_scores(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state.sessions.with_entry(&id, |entry| {
        entry.session.reset_scores();
        Ok(SessionView::new(&id, &entry.session))
    })?;
    Ok(Json(view))
}

#[instrument(skip(state))]
async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
    request: Result<Json<SettingsRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(request) = request?;
    let view = state.sessions.with_entry(&id, |entry| {
        if let Some(difficulty) = request.difficulty {
            entry.session.set_difficulty(difficulty);
        }
        if let Some(mode) = request.mode {
            entry.session.set_mode(mode);
            entry.controller.start(&mut entry.session)?;
        }
        Ok(SessionView::new(&id, &entry.session))
    })?;
    Ok(Json(view))
}

#[instrument(skip(state, query))]
async fn lookup_user(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let id = validate_user_id(query.id.as_deref()).inspect_err(|e| {
        warn!(id = ?query.id, error = %e, "Rejected lookup");
    })?;
    let user = state.directory.fetch_user(id).await?;
    Ok(Json(LookupResponse {
        success: true,
        data: user,
    }))
}
