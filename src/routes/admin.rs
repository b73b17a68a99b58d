use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post, put},
};

use crate::{
    dto::admin::{
        ActionResponse, AutoAssignResponse, PoachingRequest, SettingsResponse, TeamSizeRequest,
    },
    error::AppError,
    services::admin_service,
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin-only management endpoints for tuning and resetting the game.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/settings", get(get_settings))
        .route("/admin/settings/team-size", put(set_team_size))
        .route("/admin/settings/poaching", put(set_poaching))
        .route("/admin/auto-assign", post(auto_assign))
        .route("/admin/reset", post(reset_game))
        .route("/admin/players/{name}", delete(delete_player))
        .route("/admin/teams/{name}", delete(delete_team))
        .route("/admin/test-data", post(seed_test_data))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Retrieve the current runtime settings.
#[utoipa::path(
    get,
    path = "/admin/settings",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup")),
    responses((status = 200, description = "Current settings", body = SettingsResponse))
)]
pub async fn get_settings(State(state): State<SharedState>) -> Json<SettingsResponse> {
    Json(admin_service::get_settings(&state).await)
}

/// Change the maximum team size (1-10).
#[utoipa::path(
    put,
    path = "/admin/settings/team-size",
    tag = "admin",
    request_body = TeamSizeRequest,
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup")),
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 400, description = "Requested size is out of range"),
    )
)]
pub async fn set_team_size(
    State(state): State<SharedState>,
    Json(payload): Json<TeamSizeRequest>,
) -> Result<Json<SettingsResponse>, AppError> {
    Ok(Json(admin_service::set_team_size(&state, payload).await?))
}

/// Enable or disable the poach operation.
#[utoipa::path(
    put,
    path = "/admin/settings/poaching",
    tag = "admin",
    request_body = PoachingRequest,
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup")),
    responses((status = 200, description = "Updated settings", body = SettingsResponse))
)]
pub async fn set_poaching(
    State(state): State<SharedState>,
    Json(payload): Json<PoachingRequest>,
) -> Json<SettingsResponse> {
    Json(admin_service::set_poaching(&state, payload).await)
}

/// Distribute every free agent onto a team, creating teams as needed.
#[utoipa::path(
    post,
    path = "/admin/auto-assign",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup")),
    responses(
        (status = 200, description = "Assignment summary", body = AutoAssignResponse),
        (status = 503, description = "Storage backend unavailable"),
    )
)]
pub async fn auto_assign(
    State(state): State<SharedState>,
) -> Result<Json<AutoAssignResponse>, AppError> {
    Ok(Json(admin_service::auto_assign(&state).await?))
}

/// Wipe all players, teams, and counters.
#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup")),
    responses((status = 200, description = "Game reset", body = ActionResponse))
)]
pub async fn reset_game(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::reset_game(&state).await?))
}

/// Delete a player by name, detaching them from their team first.
#[utoipa::path(
    delete,
    path = "/admin/players/{name}",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup"),
    ("name" = String, Path, description = "Name of the player to delete")),
    responses(
        (status = 200, description = "Player deleted", body = ActionResponse),
        (status = 404, description = "Player not found"),
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::delete_player(&state, &name).await?))
}

/// Delete a team by name, releasing all its members as free agents.
#[utoipa::path(
    delete,
    path = "/admin/teams/{name}",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup"),
    ("name" = String, Path, description = "Name of the team to delete")),
    responses(
        (status = 200, description = "Team deleted", body = ActionResponse),
        (status = 404, description = "Team not found"),
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::delete_team(&state, &name).await?))
}

/// Seed a small demo roster for manual testing.
#[utoipa::path(
    post,
    path = "/admin/test-data",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token configured at startup")),
    responses((status = 200, description = "Fixtures created", body = ActionResponse))
)]
pub async fn seed_test_data(
    State(state): State<SharedState>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(admin_service::seed_test_data(&state).await?))
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_token() else {
        return Err(AppError::Unauthorized(
            "admin endpoints disabled: no admin token configured".into(),
        ));
    };

    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    if provided == expected {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized("invalid admin token".into()))
    }
}
