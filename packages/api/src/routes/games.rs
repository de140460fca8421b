use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};
use shared::models::game::{GameMode, TeamName};
use shared::models::projections::{GameStateProjection, MoveRecord};
use shared::services::timeout_service::TickOutcome;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/{id}", get(get_game))
        .route("/games/{id}/join", post(join_team))
        .route("/games/{id}/ready", post(mark_ready))
        .route("/games/{id}/start", post(start_game))
        .route("/games/{id}/moves", get(list_moves).post(play_move))
        .route("/games/{id}/tick", post(tick))
        .route("/games/{id}/timeout-decision", post(timeout_decision))
        .route("/games/{id}/claim-victory", post(claim_victory))
        .route("/games/{id}/fast-mode", post(enable_fast_mode))
        .route("/games/{id}/hint", post(set_hint))
        .route("/games/{id}/werewolf-vote", post(werewolf_vote))
}

#[derive(Deserialize)]
struct CreateGameRequest {
    mode: GameMode,
    #[serde(default)]
    two_wolves_enabled: bool,
}

#[derive(Deserialize)]
struct JoinTeamRequest {
    player_id: String,
    team: TeamName,
}

#[derive(Deserialize)]
struct PlayerRequest {
    player_id: String,
}

#[derive(Deserialize)]
struct PlayMoveRequest {
    player_id: String,
    uci: String,
}

#[derive(Deserialize)]
struct TimeoutDecisionRequest {
    player_id: String,
    decision: String,
}

#[derive(Deserialize)]
struct HintRequest {
    player_id: String,
    piece: String,
}

#[derive(Deserialize)]
struct WerewolfVoteRequest {
    player_id: String,
    suspect_id: String,
}

async fn create_game(
    State(state): State<AppState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameStateProjection>), ApiError> {
    let game = state
        .lifecycle_service
        .create_game(payload.mode, payload.two_wolves_enabled)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(GameStateProjection::from_game(&game)),
    ))
}

async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateProjection>, ApiError> {
    let projection = state.query_service.state(&game_id).await?;
    Ok(Json(projection))
}

async fn join_team(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<JoinTeamRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .lifecycle_service
        .join_team(&game_id, payload.team, &payload.player_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn mark_ready(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<PlayerRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .lifecycle_service
        .mark_ready(&game_id, &payload.player_id)
        .await?;
    Ok(StatusCode::OK)
}

async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateProjection>, ApiError> {
    let game = state.lifecycle_service.start_if_ready(&game_id).await?;
    Ok(Json(GameStateProjection::from_game(&game)))
}

async fn list_moves(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<MoveRecord>>, ApiError> {
    let moves = state.query_service.moves(&game_id).await?;
    Ok(Json(moves))
}

async fn play_move(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<PlayMoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .move_service
        .play(&game_id, &payload.player_id, &payload.uci)
        .await?;
    Ok(Json(json!({
        "san": outcome.recorded.san,
        "game_over": outcome.game_over,
        "state": GameStateProjection::from_game(&outcome.game),
    })))
}

async fn tick(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    match state.timeout_service.tick(&game_id).await? {
        TickOutcome::NotDue => Ok(Json(json!({ "timed_out_applied": false }))),
        TickOutcome::TimedOut(game) => Ok(Json(json!({
            "timed_out_applied": true,
            "state": GameStateProjection::from_game(&game),
        }))),
    }
}

async fn timeout_decision(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<TimeoutDecisionRequest>,
) -> Result<Json<GameStateProjection>, ApiError> {
    let game = state
        .timeout_service
        .decide(&game_id, &payload.player_id, &payload.decision)
        .await?;
    Ok(Json(GameStateProjection::from_game(&game)))
}

async fn claim_victory(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<PlayerRequest>,
) -> Result<Json<GameStateProjection>, ApiError> {
    let game = state
        .timeout_service
        .claim_victory(&game_id, &payload.player_id)
        .await?;
    Ok(Json(GameStateProjection::from_game(&game)))
}

async fn enable_fast_mode(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<PlayerRequest>,
) -> Result<Json<GameStateProjection>, ApiError> {
    let game = state
        .fast_mode_service
        .enable(&game_id, &payload.player_id)
        .await?;
    Ok(Json(GameStateProjection::from_game(&game)))
}

async fn set_hint(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<HintRequest>,
) -> Result<Json<Value>, ApiError> {
    let piece = state
        .hand_brain_service
        .set_hint(&game_id, &payload.player_id, &payload.piece)
        .await?;
    Ok(Json(json!({ "piece": piece.as_str() })))
}

async fn werewolf_vote(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(payload): Json<WerewolfVoteRequest>,
) -> Result<Json<GameStateProjection>, ApiError> {
    let game = state
        .werewolf_service
        .cast_vote(&game_id, &payload.player_id, &payload.suspect_id)
        .await?;
    Ok(Json(GameStateProjection::from_game(&game)))
}
