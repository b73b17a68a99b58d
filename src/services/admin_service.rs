//! Business logic powering the admin routes: runtime settings, roster
//! surgery, auto-assignment, and test fixtures. Mutating helpers hold the
//! same gate as the public game operations.

use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::{
    dto::admin::{
        ActionResponse, AutoAssignResponse, PoachingRequest, SettingsResponse, TeamSizeRequest,
    },
    engine::{auto_assign::auto_assign_free_agents, error::GameError, rules},
    error::AppError,
    state::SharedState,
};

/// Current admin-tunable settings.
pub async fn get_settings(state: &SharedState) -> SettingsResponse {
    SettingsResponse::from(state.settings().await)
}

/// Change the maximum team size.
///
/// Oversized teams created under a larger limit are left intact; the new
/// limit only applies to future joins and poaches.
pub async fn set_team_size(
    state: &SharedState,
    request: TeamSizeRequest,
) -> Result<SettingsResponse, AppError> {
    let _gate = state.lock_mutations().await;
    let updated = state.set_max_team_size(request.max_team_size).await?;
    info!(max_team_size = updated.max_team_size, "team capacity updated");
    Ok(SettingsResponse::from(updated))
}

/// Enable or disable the poach operation.
pub async fn set_poaching(state: &SharedState, request: PoachingRequest) -> SettingsResponse {
    let updated = state.set_poaching_enabled(request.enabled).await;
    info!(enabled = updated.poaching_enabled, "poaching toggled");
    SettingsResponse::from(updated)
}

/// Distribute every free agent onto a team, creating teams as needed.
pub async fn auto_assign(state: &SharedState) -> Result<AutoAssignResponse, AppError> {
    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;
    let settings = state.settings().await;

    // StdRng rather than the thread-local generator so the future stays Send.
    let mut rng = StdRng::from_os_rng();
    let outcome =
        auto_assign_free_agents(store.as_ref(), &settings, state.config(), &mut rng).await?;
    info!(
        assigned = outcome.assigned_count,
        created = outcome.teams_created,
        "auto-assign completed"
    );
    Ok(AutoAssignResponse::from(outcome))
}

/// Wipe the whole roster and zero the counters.
pub async fn reset_game(state: &SharedState) -> Result<ActionResponse, AppError> {
    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;

    rules::reset(store.as_ref()).await?;
    info!("game reset; roster and counters cleared");
    Ok(ActionResponse::new("Game reset: all players and teams removed"))
}

/// Remove a player entirely, detaching them from their team first.
pub async fn delete_player(state: &SharedState, name: &str) -> Result<ActionResponse, AppError> {
    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;

    rules::delete_player(store.as_ref(), name).await?;
    info!(player = name, "player deleted by admin");
    Ok(ActionResponse::new(format!("Player {name} deleted")))
}

/// Remove a team, releasing all its members as free agents.
pub async fn delete_team(state: &SharedState, name: &str) -> Result<ActionResponse, AppError> {
    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;

    rules::delete_team(store.as_ref(), name).await?;
    info!(team = name, "team deleted by admin");
    Ok(ActionResponse::new(format!("Team {name} deleted")))
}

/// Seed a small demo roster: six players, two full teams, two free agents.
///
/// Re-running is harmless; entries that already exist are skipped.
pub async fn seed_test_data(state: &SharedState) -> Result<ActionResponse, AppError> {
    let _gate = state.lock_mutations().await;
    let store = state.require_roster_store().await?;
    let settings = state.settings().await;

    for name in ["Alice", "Bob", "Charlie", "Diana", "Eve", "Frank"] {
        tolerate_conflicts(rules::join_game(store.as_ref(), name).await.map(|_| ()))?;
    }
    tolerate_conflicts(
        rules::create_team(store.as_ref(), "TeamAlpha", "Alice")
            .await
            .map(|_| ()),
    )?;
    tolerate_conflicts(
        rules::join_team(store.as_ref(), &settings, "TeamAlpha", "Bob")
            .await
            .map(|_| ()),
    )?;
    tolerate_conflicts(
        rules::create_team(store.as_ref(), "TeamBeta", "Charlie")
            .await
            .map(|_| ()),
    )?;
    tolerate_conflicts(
        rules::join_team(store.as_ref(), &settings, "TeamBeta", "Diana")
            .await
            .map(|_| ()),
    )?;

    info!("test roster seeded");
    Ok(ActionResponse::new(
        "Test data created: 6 players, 2 teams, 2 free agents",
    ))
}

/// Seeding must not fail just because a fixture already exists or the
/// capacity was lowered below the fixture layout.
fn tolerate_conflicts(result: Result<(), GameError>) -> Result<(), AppError> {
    match result {
        Ok(())
        | Err(GameError::DuplicateName { .. })
        | Err(GameError::AlreadyOnTeam { .. })
        | Err(GameError::TeamFull { .. }) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::roster_store::memory::MemoryRosterStore,
        services::game_service, state::AppState,
    };

    async fn seeded_state() -> SharedState {
        let state = AppState::new(AppConfig::default(), None);
        state
            .set_roster_store(Arc::new(MemoryRosterStore::new()))
            .await;
        state
    }

    #[tokio::test]
    async fn test_data_is_idempotent() {
        let state = seeded_state().await;
        seed_test_data(&state).await.unwrap();
        seed_test_data(&state).await.unwrap();

        let status = game_service::game_status(&state).await.unwrap();
        assert_eq!(status.game_stats.total_players, 6);
        assert_eq!(status.game_stats.total_teams, 2);
        assert_eq!(status.free_agents.len(), 2);
    }

    #[tokio::test]
    async fn team_size_update_rejects_out_of_range_values() {
        let state = seeded_state().await;
        assert!(
            set_team_size(&state, TeamSizeRequest { max_team_size: 11 })
                .await
                .is_err()
        );
        let updated = set_team_size(&state, TeamSizeRequest { max_team_size: 3 })
            .await
            .unwrap();
        assert_eq!(updated.max_team_size, 3);
    }

    #[tokio::test]
    async fn auto_assign_places_every_free_agent() {
        let state = seeded_state().await;
        seed_test_data(&state).await.unwrap();

        let outcome = auto_assign(&state).await.unwrap();
        assert_eq!(outcome.assigned_count, 2);

        let status = game_service::game_status(&state).await.unwrap();
        assert!(status.free_agents.is_empty());
    }
}
