//! Business logic powering the public game routes. Every mutation validates
//! its payload, enters the process-wide mutation gate, then delegates to the
//! rules engine; read-only queries skip the gate and work off a snapshot.

use validator::Validate;

use crate::{
    dto::game::{
        GameInfo, GameRules, JoinRequest, JoinResponse, LeaveRequest, LeaveResponse, PlayerDto,
        PoachRequest, PoachResponse, StatusResponse, TeamDto, TeamRequest, TeamResponse,
    },
    engine::rules,
    error::AppError,
    state::SharedState,
};

/// Register a new player as a free agent.
pub async fn join_game(state: &SharedState, request: JoinRequest) -> Result<JoinResponse, AppError> {
    request.validate()?;

    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;

    let player = rules::join_game(store.as_ref(), &request.name).await?;
    Ok(JoinResponse {
        message: format!("{} joined the game as a free agent", player.name),
        player: PlayerDto::from(player),
    })
}

/// Create a team or join an existing one, depending on the request action.
pub async fn handle_team_request(
    state: &SharedState,
    request: TeamRequest,
) -> Result<TeamResponse, AppError> {
    request.validate()?;

    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;
    let settings = state.settings().await;

    let (message, team) = match request {
        TeamRequest::Create {
            team_name,
            creator_name,
        } => {
            let team = rules::create_team(store.as_ref(), &team_name, &creator_name).await?;
            (format!("{creator_name} founded team {team_name}"), team)
        }
        TeamRequest::Join {
            team_name,
            player_name,
        } => {
            let team =
                rules::join_team(store.as_ref(), &settings, &team_name, &player_name).await?;
            (format!("{player_name} joined team {team_name}"), team)
        }
    };

    Ok(TeamResponse {
        message,
        team: TeamDto::from_entity(team, settings.max_team_size),
    })
}

/// Steal a player from their current team onto the poacher's roster.
pub async fn poach_player(
    state: &SharedState,
    request: PoachRequest,
) -> Result<PoachResponse, AppError> {
    request.validate()?;

    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;
    let settings = state.settings().await;

    let outcome = rules::poach_player(
        store.as_ref(),
        &settings,
        &request.target_player_name,
        &request.poacher_team_name,
    )
    .await?;

    let message = match &outcome.old_team {
        Some(old) => format!(
            "{} was poached from {} by {}",
            request.target_player_name, old.name, request.poacher_team_name
        ),
        None => format!(
            "{} was poached by {}; their old team dissolved",
            request.target_player_name, request.poacher_team_name
        ),
    };

    Ok(PoachResponse {
        message,
        old_team: outcome
            .old_team
            .map(|team| TeamDto::from_entity(team, settings.max_team_size)),
        new_team: TeamDto::from_entity(outcome.new_team, settings.max_team_size),
    })
}

/// Remove a player from their team, turning them back into a free agent.
pub async fn leave_team(
    state: &SharedState,
    request: LeaveRequest,
) -> Result<LeaveResponse, AppError> {
    request.validate()?;

    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;

    let outcome = rules::leave_team(store.as_ref(), &request.player_name).await?;
    let message = if outcome.team_dissolved {
        format!(
            "{} left their team, which dissolved with no members left",
            outcome.player.name
        )
    } else {
        format!("{} left their team", outcome.player.name)
    };

    Ok(LeaveResponse {
        message,
        player: PlayerDto::from(outcome.player),
        team_dissolved: outcome.team_dissolved,
    })
}

/// Full roster snapshot with aggregate counters.
pub async fn game_status(state: &SharedState) -> Result<StatusResponse, AppError> {
    let store = state.require_roster_store().await?;
    let settings = state.settings().await;

    let status = rules::status(store.as_ref(), &settings).await?;
    Ok(StatusResponse::from(status))
}

/// Informational blurb served on the root route, reflecting live settings.
pub async fn game_info(state: &SharedState) -> GameInfo {
    let settings = state.settings().await;
    GameInfo {
        game: "Team Poach",
        version: env!("CARGO_PKG_VERSION"),
        description: "Join as a free agent, form teams, and poach players from rival rosters",
        rules: GameRules {
            max_team_size: settings.max_team_size,
            poaching_enabled: settings.poaching_enabled,
            names: "player and team names are unique and case-sensitive",
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::roster_store::memory::MemoryRosterStore, state::AppState,
    };

    async fn seeded_state() -> SharedState {
        let state = AppState::new(AppConfig::default(), None);
        state
            .set_roster_store(Arc::new(MemoryRosterStore::new()))
            .await;
        state
    }

    #[tokio::test]
    async fn join_rejects_invalid_names_before_touching_storage() {
        let state = seeded_state().await;
        let err = join_game(
            &state,
            JoinRequest {
                name: String::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let status = game_status(&state).await.unwrap();
        assert_eq!(status.game_stats.total_players, 0);
    }

    #[tokio::test]
    async fn team_flow_creates_then_joins() {
        let state = seeded_state().await;
        for name in ["Alice", "Bob"] {
            join_game(&state, JoinRequest { name: name.into() })
                .await
                .unwrap();
        }

        let created = handle_team_request(
            &state,
            TeamRequest::Create {
                team_name: "Red".into(),
                creator_name: "Alice".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(created.team.member_count, 1);

        let joined = handle_team_request(
            &state,
            TeamRequest::Join {
                team_name: "Red".into(),
                player_name: "Bob".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(joined.team.member_count, 2);
        assert!(joined.team.is_full);
    }

    #[tokio::test]
    async fn mutations_fail_while_degraded() {
        let state = AppState::new(AppConfig::default(), None);
        let err = join_game(
            &state,
            JoinRequest {
                name: "Alice".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }
}
