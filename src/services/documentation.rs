use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Team Poach Back.
#[openapi(
    paths(
        crate::routes::game::game_info,
        crate::routes::game::join_game,
        crate::routes::game::team_action,
        crate::routes::game::poach_player,
        crate::routes::game::leave_team,
        crate::routes::game::game_status,
        crate::routes::admin::get_settings,
        crate::routes::admin::set_team_size,
        crate::routes::admin::set_poaching,
        crate::routes::admin::auto_assign,
        crate::routes::admin::reset_game,
        crate::routes::admin::delete_player,
        crate::routes::admin::delete_team,
        crate::routes::admin::seed_test_data,
        crate::routes::health::healthcheck,
    ),
    components(
        schemas(
            crate::dto::game::JoinRequest,
            crate::dto::game::TeamRequest,
            crate::dto::game::PoachRequest,
            crate::dto::game::LeaveRequest,
            crate::dto::game::PlayerDto,
            crate::dto::game::TeamDto,
            crate::dto::game::JoinResponse,
            crate::dto::game::TeamResponse,
            crate::dto::game::PoachResponse,
            crate::dto::game::LeaveResponse,
            crate::dto::game::GameStats,
            crate::dto::game::StatusResponse,
            crate::dto::game::GameInfo,
            crate::dto::game::GameRules,
            crate::dto::admin::ActionResponse,
            crate::dto::admin::SettingsResponse,
            crate::dto::admin::TeamSizeRequest,
            crate::dto::admin::PoachingRequest,
            crate::dto::admin::AutoAssignResponse,
            crate::dto::health::HealthResponse,
        )
    ),
    tags(
        (name = "game", description = "Public game operations"),
        (name = "admin", description = "Admin management endpoints"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
