//! Best-effort bulk assignment of free agents into teams.

use rand::Rng;
use tracing::debug;

use crate::{
    config::AppConfig,
    dao::{
        models::{Counter, PlayerEntity, TeamEntity},
        roster_store::RosterStore,
    },
    engine::error::GameResult,
    state::settings::GameSettings,
};

/// Upper bound on generated-name collision retries per new team.
const MAX_NAME_ATTEMPTS: usize = 50;

/// Counts reported by [`auto_assign_free_agents`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoAssignOutcome {
    /// Free agents that ended up on a team.
    pub assigned_count: usize,
    /// Teams created along the way.
    pub teams_created: usize,
}

/// Assign every free agent to a team, creating named teams as needed.
///
/// Agents are processed in join order. Each one goes to the first existing
/// team with space (teams scanned ascending by member count); when none has
/// room, a new team named `{Adjective}{Animal}` is created for them. This is
/// best-effort: an agent whose team name cannot be generated within
/// [`MAX_NAME_ATTEMPTS`] collisions is skipped, and the counts report
/// whatever progress was made.
pub async fn auto_assign_free_agents<R: Rng + ?Sized>(
    store: &dyn RosterStore,
    settings: &GameSettings,
    config: &AppConfig,
    rng: &mut R,
) -> GameResult<AutoAssignOutcome> {
    let snapshot = store.load_roster().await?;
    let free_agents: Vec<PlayerEntity> = snapshot
        .players
        .into_iter()
        .filter(PlayerEntity::is_free_agent)
        .collect();

    let mut open_teams: Vec<TeamEntity> = snapshot
        .teams
        .into_iter()
        .filter(|team| !team.is_full(settings.max_team_size))
        .collect();
    open_teams.sort_by_key(TeamEntity::member_count);

    let mut outcome = AutoAssignOutcome::default();

    for mut agent in free_agents {
        if let Some(slot) = open_teams
            .iter()
            .position(|team| !team.is_full(settings.max_team_size))
        {
            let team = &mut open_teams[slot];
            team.member_ids.push(agent.id);
            store.save_team(team.clone()).await?;
            agent.team_id = Some(team.id);
            store.save_player(agent).await?;
            outcome.assigned_count += 1;

            if team.is_full(settings.max_team_size) {
                open_teams.remove(slot);
            }
            continue;
        }

        let Some(name) = generate_team_name(store, config, rng).await? else {
            debug!("could not generate a unique team name; skipping agent");
            continue;
        };

        let team = TeamEntity::new(name, agent.id);
        store.save_team(team.clone()).await?;
        agent.team_id = Some(team.id);
        store.save_player(agent).await?;
        store.increment_counter(Counter::TotalTeams).await?;
        outcome.assigned_count += 1;
        outcome.teams_created += 1;

        if settings.max_team_size > 1 {
            open_teams.push(team);
        }
    }

    Ok(outcome)
}

/// Draw word-list names until one is unused, giving up after the retry bound.
async fn generate_team_name<R: Rng + ?Sized>(
    store: &dyn RosterStore,
    config: &AppConfig,
    rng: &mut R,
) -> GameResult<Option<String>> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate = config.random_team_name(rng);
        if store.find_team(candidate.clone()).await?.is_none() {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dao::roster_store::memory::MemoryRosterStore,
        engine::rules::{create_team, join_game, status},
    };
    use rand::{SeedableRng, rngs::StdRng};

    /// Single-entry word lists make every generated name identical, which is
    /// what the collision test below relies on.
    fn one_name_config() -> AppConfig {
        AppConfig::from_lists(vec!["Lucky".into()], vec!["Parakeet".into()])
    }

    #[tokio::test]
    async fn fills_existing_teams_before_creating_new_ones() {
        let store = MemoryRosterStore::new();
        for name in ["Alice", "Bob", "Carol"] {
            join_game(&store, name).await.unwrap();
        }
        create_team(&store, "Red", "Alice").await.unwrap();

        let settings = GameSettings::default();
        let mut rng = StdRng::seed_from_u64(3);
        let outcome =
            auto_assign_free_agents(&store, &settings, &AppConfig::default(), &mut rng)
                .await
                .unwrap();

        assert_eq!(outcome.assigned_count, 2);
        assert_eq!(outcome.teams_created, 1);

        let red = store.find_team("Red".into()).await.unwrap().unwrap();
        assert_eq!(red.member_count(), 2);

        let status = status(&store, &settings).await.unwrap();
        assert!(status.free_agents.is_empty());
        assert_eq!(status.teams.len(), 2);
        assert_eq!(status.counters.total_teams, 2);
    }

    #[tokio::test]
    async fn created_teams_respect_capacity() {
        let store = MemoryRosterStore::new();
        for name in ["A", "B", "C", "D", "E"] {
            join_game(&store, name).await.unwrap();
        }

        let settings = GameSettings::default();
        let mut rng = StdRng::seed_from_u64(11);
        let outcome =
            auto_assign_free_agents(&store, &settings, &AppConfig::default(), &mut rng)
                .await
                .unwrap();

        assert_eq!(outcome.assigned_count, 5);
        let status = status(&store, &settings).await.unwrap();
        assert!(status
            .teams
            .iter()
            .all(|team| team.member_count() <= settings.max_team_size));
        assert!(status.free_agents.is_empty());
    }

    #[tokio::test]
    async fn capacity_one_creates_a_team_per_agent() {
        let store = MemoryRosterStore::new();
        for name in ["A", "B", "C"] {
            join_game(&store, name).await.unwrap();
        }

        let mut settings = GameSettings::default();
        settings.set_max_team_size(1).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let outcome =
            auto_assign_free_agents(&store, &settings, &AppConfig::default(), &mut rng)
                .await
                .unwrap();

        assert_eq!(outcome.teams_created, 3);
        assert_eq!(outcome.assigned_count, 3);
    }

    #[tokio::test]
    async fn name_collisions_abort_only_the_affected_agent() {
        let store = MemoryRosterStore::new();
        for name in ["Taken", "Alice"] {
            join_game(&store, name).await.unwrap();
        }
        // Occupy the only name the single-entry word lists can produce.
        create_team(&store, "LuckyParakeet", "Taken").await.unwrap();

        let mut settings = GameSettings::default();
        settings.set_max_team_size(1).unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let outcome = auto_assign_free_agents(&store, &settings, &one_name_config(), &mut rng)
            .await
            .unwrap();

        // LuckyParakeet is full (capacity 1) and no other name can be drawn.
        assert_eq!(outcome.assigned_count, 0);
        assert_eq!(outcome.teams_created, 0);

        let alice = store.find_player("Alice".into()).await.unwrap().unwrap();
        assert!(alice.is_free_agent());
    }

    #[tokio::test]
    async fn no_free_agents_is_a_no_op() {
        let store = MemoryRosterStore::new();
        let settings = GameSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome =
            auto_assign_free_agents(&store, &settings, &AppConfig::default(), &mut rng)
                .await
                .unwrap();
        assert_eq!(outcome, AutoAssignOutcome::default());
    }
}
