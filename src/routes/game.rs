use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::game::{
        GameInfo, JoinRequest, JoinResponse, LeaveRequest, LeaveResponse, PoachRequest,
        PoachResponse, StatusResponse, TeamRequest, TeamResponse,
    },
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Public game endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/", get(game_info))
        .route("/join", post(join_game))
        .route("/team", post(team_action))
        .route("/poach", post(poach_player))
        .route("/leave", post(leave_team))
        .route("/status", get(game_status))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "game",
    responses((status = 200, description = "Game description and current rules", body = GameInfo))
)]
/// Describe the game and its currently active rules.
pub async fn game_info(State(state): State<SharedState>) -> Json<GameInfo> {
    Json(game_service::game_info(&state).await)
}

#[utoipa::path(
    post,
    path = "/join",
    tag = "game",
    request_body = JoinRequest,
    responses(
        (status = 201, description = "Player registered as a free agent", body = JoinResponse),
        (status = 400, description = "Invalid player name"),
        (status = 409, description = "A player with that name already exists"),
    )
)]
/// Join the game as a new free agent.
pub async fn join_game(
    State(state): State<SharedState>,
    Json(payload): Json<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), AppError> {
    let response = game_service::join_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/team",
    tag = "game",
    request_body = TeamRequest,
    responses(
        (status = 200, description = "Team created or joined", body = TeamResponse),
        (status = 400, description = "Invalid names, unknown action, or team is full"),
        (status = 404, description = "Player or team not found"),
        (status = 409, description = "Duplicate team name or player already on a team"),
    )
)]
/// Create a team or join an existing one, depending on the `action` tag.
pub async fn team_action(
    State(state): State<SharedState>,
    Json(payload): Json<TeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    Ok(Json(game_service::handle_team_request(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/poach",
    tag = "game",
    request_body = PoachRequest,
    responses(
        (status = 200, description = "Player transferred to the poaching team", body = PoachResponse),
        (status = 400, description = "Poaching disabled, target is a free agent, or team is full"),
        (status = 404, description = "Player or team not found"),
        (status = 409, description = "Target already plays for the poaching team"),
    )
)]
/// Steal a player from their current team.
pub async fn poach_player(
    State(state): State<SharedState>,
    Json(payload): Json<PoachRequest>,
) -> Result<Json<PoachResponse>, AppError> {
    Ok(Json(game_service::poach_player(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/leave",
    tag = "game",
    request_body = LeaveRequest,
    responses(
        (status = 200, description = "Player left their team", body = LeaveResponse),
        (status = 400, description = "Player is not on a team"),
        (status = 404, description = "Player not found"),
    )
)]
/// Leave the current team and become a free agent again.
pub async fn leave_team(
    State(state): State<SharedState>,
    Json(payload): Json<LeaveRequest>,
) -> Result<Json<LeaveResponse>, AppError> {
    Ok(Json(game_service::leave_team(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "game",
    responses(
        (status = 200, description = "Full roster snapshot with counters", body = StatusResponse),
        (status = 503, description = "Storage backend unavailable"),
    )
)]
/// Snapshot the whole game: players, teams, free agents, and counters.
pub async fn game_status(
    State(state): State<SharedState>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(game_service::game_status(&state).await?))
}
