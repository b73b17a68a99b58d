//! Roster state transitions shared by every storage backend.

use uuid::Uuid;

use crate::{
    dao::{
        models::{Counter, PlayerEntity, RosterCounters, TeamEntity},
        roster_store::RosterStore,
        storage::StorageError,
    },
    engine::error::{GameError, GameResult},
    state::settings::GameSettings,
};

/// Result of a successful poach.
#[derive(Debug, Clone)]
pub struct PoachOutcome {
    /// The team the target was taken from; `None` when it dissolved.
    pub old_team: Option<TeamEntity>,
    /// The poacher team including the freshly acquired member.
    pub new_team: TeamEntity,
}

/// Result of a player leaving their team.
#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    /// The player, now a free agent.
    pub player: PlayerEntity,
    /// True when the team had no members left and was deleted.
    pub team_dissolved: bool,
}

/// Consistent view over the whole game used by the status endpoint.
#[derive(Debug, Clone)]
pub struct RosterStatus {
    /// All players in join order.
    pub players: Vec<PlayerEntity>,
    /// All teams in creation order.
    pub teams: Vec<TeamEntity>,
    /// Players without a team, in join order.
    pub free_agents: Vec<PlayerEntity>,
    /// Counter values at snapshot time.
    pub counters: RosterCounters,
    /// Team capacity the snapshot was taken under.
    pub max_team_size: usize,
}

/// Register a new player as a free agent.
pub async fn join_game(store: &dyn RosterStore, name: &str) -> GameResult<PlayerEntity> {
    if store.find_player(name.to_owned()).await?.is_some() {
        return Err(GameError::duplicate_player(name));
    }

    let player = PlayerEntity::new(name);
    store.save_player(player.clone()).await?;
    store.increment_counter(Counter::TotalPlayers).await?;
    Ok(player)
}

/// Create a team with `creator_name` as its founding member.
pub async fn create_team(
    store: &dyn RosterStore,
    team_name: &str,
    creator_name: &str,
) -> GameResult<TeamEntity> {
    let Some(mut creator) = store.find_player(creator_name.to_owned()).await? else {
        return Err(GameError::player_not_found(creator_name));
    };
    if creator.team_id.is_some() {
        return Err(GameError::AlreadyOnTeam {
            name: creator_name.to_owned(),
        });
    }
    if store.find_team(team_name.to_owned()).await?.is_some() {
        return Err(GameError::duplicate_team(team_name));
    }

    let team = TeamEntity::new(team_name, creator.id);
    store.save_team(team.clone()).await?;
    creator.team_id = Some(team.id);
    store.save_player(creator).await?;
    store.increment_counter(Counter::TotalTeams).await?;
    Ok(team)
}

/// Add a free agent to an existing team with room left.
pub async fn join_team(
    store: &dyn RosterStore,
    settings: &GameSettings,
    team_name: &str,
    player_name: &str,
) -> GameResult<TeamEntity> {
    let Some(mut player) = store.find_player(player_name.to_owned()).await? else {
        return Err(GameError::player_not_found(player_name));
    };
    if player.team_id.is_some() {
        return Err(GameError::AlreadyOnTeam {
            name: player_name.to_owned(),
        });
    }
    let Some(mut team) = store.find_team(team_name.to_owned()).await? else {
        return Err(GameError::team_not_found(team_name));
    };
    if team.is_full(settings.max_team_size) {
        return Err(GameError::TeamFull {
            name: team_name.to_owned(),
        });
    }

    team.member_ids.push(player.id);
    store.save_team(team.clone()).await?;
    player.team_id = Some(team.id);
    store.save_player(player).await?;
    Ok(team)
}

/// Transfer a player from their current team to the poacher team.
///
/// Precondition order is a fixed contract: target exists, target has a team,
/// poacher team exists, poacher team has room, teams differ. The old team is
/// persisted (or dissolved) before the new team and the player are touched,
/// so an interrupted poach can never leave a player on two rosters at once.
pub async fn poach_player(
    store: &dyn RosterStore,
    settings: &GameSettings,
    target_player_name: &str,
    poacher_team_name: &str,
) -> GameResult<PoachOutcome> {
    if !settings.poaching_enabled {
        return Err(GameError::PoachingDisabled);
    }

    let Some(mut target) = store.find_player(target_player_name.to_owned()).await? else {
        return Err(GameError::player_not_found(target_player_name));
    };
    let Some(old_team_id) = target.team_id else {
        return Err(GameError::NotOnTeam {
            name: target_player_name.to_owned(),
        });
    };
    let Some(mut poacher_team) = store.find_team(poacher_team_name.to_owned()).await? else {
        return Err(GameError::team_not_found(poacher_team_name));
    };
    if poacher_team.is_full(settings.max_team_size) {
        return Err(GameError::TeamFull {
            name: poacher_team_name.to_owned(),
        });
    }
    if old_team_id == poacher_team.id {
        return Err(GameError::SelfPoach);
    }

    let mut old_team = resolve_team(store, old_team_id, &target.name).await?;
    old_team.member_ids.retain(|id| *id != target.id);

    let old_team = if old_team.is_empty() {
        store.delete_team(old_team.name.clone()).await?;
        store.decrement_counter(Counter::TotalTeams).await?;
        None
    } else {
        store.save_team(old_team.clone()).await?;
        Some(old_team)
    };

    poacher_team.member_ids.push(target.id);
    store.save_team(poacher_team.clone()).await?;
    target.team_id = Some(poacher_team.id);
    store.save_player(target).await?;

    Ok(PoachOutcome {
        old_team,
        new_team: poacher_team,
    })
}

/// Remove a player from their team, dissolving it when it empties.
pub async fn leave_team(store: &dyn RosterStore, player_name: &str) -> GameResult<LeaveOutcome> {
    let Some(mut player) = store.find_player(player_name.to_owned()).await? else {
        return Err(GameError::player_not_found(player_name));
    };
    let Some(team_id) = player.team_id else {
        return Err(GameError::NotOnTeam {
            name: player_name.to_owned(),
        });
    };

    let mut team = resolve_team(store, team_id, &player.name).await?;
    team.member_ids.retain(|id| *id != player.id);

    let team_dissolved = if team.is_empty() {
        store.delete_team(team.name.clone()).await?;
        store.decrement_counter(Counter::TotalTeams).await?;
        true
    } else {
        store.save_team(team).await?;
        false
    };

    player.team_id = None;
    store.save_player(player.clone()).await?;

    Ok(LeaveOutcome {
        player,
        team_dissolved,
    })
}

/// Snapshot the whole game in one consistent read.
pub async fn status(store: &dyn RosterStore, settings: &GameSettings) -> GameResult<RosterStatus> {
    let snapshot = store.load_roster().await?;
    let free_agents = snapshot
        .players
        .iter()
        .filter(|player| player.is_free_agent())
        .cloned()
        .collect();

    Ok(RosterStatus {
        players: snapshot.players,
        teams: snapshot.teams,
        free_agents,
        counters: snapshot.counters,
        max_team_size: settings.max_team_size,
    })
}

/// Admin: wipe the whole roster and zero the counters.
pub async fn reset(store: &dyn RosterStore) -> GameResult<()> {
    store.reset().await?;
    Ok(())
}

/// Admin: delete a player, removing them from their team first.
pub async fn delete_player(store: &dyn RosterStore, player_name: &str) -> GameResult<()> {
    let Some(player) = store.find_player(player_name.to_owned()).await? else {
        return Err(GameError::player_not_found(player_name));
    };

    if let Some(team_id) = player.team_id {
        let mut team = resolve_team(store, team_id, &player.name).await?;
        team.member_ids.retain(|id| *id != player.id);
        if team.is_empty() {
            store.delete_team(team.name.clone()).await?;
            store.decrement_counter(Counter::TotalTeams).await?;
        } else {
            store.save_team(team).await?;
        }
    }

    store.delete_player(player.name).await?;
    store.decrement_counter(Counter::TotalPlayers).await?;
    Ok(())
}

/// Admin: delete a team and turn all its members into free agents.
pub async fn delete_team(store: &dyn RosterStore, team_name: &str) -> GameResult<()> {
    let Some(team) = store.find_team(team_name.to_owned()).await? else {
        return Err(GameError::team_not_found(team_name));
    };

    let snapshot = store.load_roster().await?;
    for mut player in snapshot.players {
        if player.team_id == Some(team.id) {
            player.team_id = None;
            store.save_player(player).await?;
        }
    }

    store.delete_team(team.name).await?;
    store.decrement_counter(Counter::TotalTeams).await?;
    Ok(())
}

/// Fetch the team a player claims to be on; a miss means the backend lost
/// referential integrity and is reported as a storage fault.
async fn resolve_team(
    store: &dyn RosterStore,
    team_id: Uuid,
    player_name: &str,
) -> GameResult<TeamEntity> {
    match store.find_team_by_id(team_id).await? {
        Some(team) => Ok(team),
        None => Err(GameError::Storage(StorageError::corrupted(format!(
            "player `{player_name}` references missing team `{team_id}`"
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::roster_store::memory::MemoryRosterStore;

    fn settings() -> GameSettings {
        GameSettings::default()
    }

    async fn join_all(store: &MemoryRosterStore, names: &[&str]) {
        for name in names {
            join_game(store, name).await.unwrap();
        }
    }

    /// Bidirectional referential integrity plus the no-empty-team rule.
    async fn assert_invariants(store: &MemoryRosterStore, max_team_size: usize) {
        let snapshot = store.load_roster().await.unwrap();

        for team in &snapshot.teams {
            assert!(!team.is_empty(), "team `{}` is empty", team.name);
            assert!(
                team.member_ids.len() <= max_team_size,
                "team `{}` exceeds capacity",
                team.name
            );
            for member_id in &team.member_ids {
                let member = snapshot
                    .players
                    .iter()
                    .find(|p| p.id == *member_id)
                    .expect("member refers to an existing player");
                assert_eq!(member.team_id, Some(team.id));
            }
        }

        for player in &snapshot.players {
            if let Some(team_id) = player.team_id {
                let team = snapshot
                    .teams
                    .iter()
                    .find(|t| t.id == team_id)
                    .expect("player refers to an existing team");
                assert!(team.member_ids.contains(&player.id));
            }
        }
    }

    #[tokio::test]
    async fn joining_twice_with_same_name_is_rejected() {
        let store = MemoryRosterStore::new();
        join_game(&store, "Alice").await.unwrap();
        let err = join_game(&store, "Alice").await.unwrap_err();
        assert!(matches!(err, GameError::DuplicateName { kind: "player", .. }));

        let counters = store.counters().await.unwrap();
        assert_eq!(counters.total_players, 1);
    }

    #[tokio::test]
    async fn two_joins_make_two_free_agents() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;

        let status = status(&store, &settings()).await.unwrap();
        assert_eq!(status.free_agents.len(), 2);
        assert_eq!(status.counters.total_players, 2);
        assert_eq!(status.counters.total_teams, 0);
    }

    #[tokio::test]
    async fn create_team_links_creator_both_ways() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice"]).await;

        let team = create_team(&store, "Red", "Alice").await.unwrap();
        assert_eq!(team.member_count(), 1);
        assert!(!team.is_full(settings().max_team_size));

        let alice = store.find_player("Alice".into()).await.unwrap().unwrap();
        assert_eq!(alice.team_id, Some(team.id));
        assert_eq!(store.counters().await.unwrap().total_teams, 1);
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn create_team_preconditions_fail_in_order() {
        let store = MemoryRosterStore::new();

        assert!(matches!(
            create_team(&store, "Red", "Ghost").await.unwrap_err(),
            GameError::NotFound { kind: "player", .. }
        ));

        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();

        assert!(matches!(
            create_team(&store, "Blue", "Alice").await.unwrap_err(),
            GameError::AlreadyOnTeam { .. }
        ));
        assert!(matches!(
            create_team(&store, "Red", "Bob").await.unwrap_err(),
            GameError::DuplicateName { kind: "team", .. }
        ));

        // No partial writes from the failures above.
        assert_eq!(store.counters().await.unwrap().total_teams, 1);
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn join_team_fills_to_capacity_then_rejects() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob", "Carol"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();

        let team = join_team(&store, &settings(), "Red", "Bob").await.unwrap();
        assert!(team.is_full(settings().max_team_size));
        assert_eq!(team.member_count(), 2);

        assert!(matches!(
            join_team(&store, &settings(), "Red", "Carol").await.unwrap_err(),
            GameError::TeamFull { .. }
        ));
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn join_team_requires_free_agent_and_existing_team() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();

        assert!(matches!(
            join_team(&store, &settings(), "Red", "Ghost").await.unwrap_err(),
            GameError::NotFound { kind: "player", .. }
        ));
        assert!(matches!(
            join_team(&store, &settings(), "Blue", "Alice").await.unwrap_err(),
            GameError::AlreadyOnTeam { .. }
        ));
        assert!(matches!(
            join_team(&store, &settings(), "Blue", "Bob").await.unwrap_err(),
            GameError::NotFound { kind: "team", .. }
        ));
    }

    #[tokio::test]
    async fn larger_capacity_is_honoured() {
        let store = MemoryRosterStore::new();
        let mut settings = GameSettings::default();
        settings.set_max_team_size(3).unwrap();

        join_all(&store, &["Alice", "Bob", "Carol", "Dave"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings, "Red", "Bob").await.unwrap();
        let team = join_team(&store, &settings, "Red", "Carol").await.unwrap();
        assert!(team.is_full(settings.max_team_size));

        assert!(matches!(
            join_team(&store, &settings, "Red", "Dave").await.unwrap_err(),
            GameError::TeamFull { .. }
        ));
        assert_invariants(&store, 3).await;
    }

    #[tokio::test]
    async fn poach_moves_player_between_teams() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob", "Dave"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();
        create_team(&store, "Blue", "Dave").await.unwrap();

        let outcome = poach_player(&store, &settings(), "Bob", "Blue").await.unwrap();

        let old_team = outcome.old_team.expect("Red survives with Alice");
        assert_eq!(old_team.name, "Red");
        assert_eq!(old_team.member_count(), 1);

        assert_eq!(outcome.new_team.name, "Blue");
        assert_eq!(outcome.new_team.member_count(), 2);
        assert!(outcome.new_team.is_full(settings().max_team_size));

        let bob = store.find_player("Bob".into()).await.unwrap().unwrap();
        assert_eq!(bob.team_id, Some(outcome.new_team.id));
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn poaching_sole_member_dissolves_the_old_team() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Dave"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        create_team(&store, "Blue", "Dave").await.unwrap();

        let outcome = poach_player(&store, &settings(), "Alice", "Blue").await.unwrap();
        assert!(outcome.old_team.is_none());

        let status = status(&store, &settings()).await.unwrap();
        assert!(status.teams.iter().all(|team| team.name != "Red"));
        assert_eq!(status.counters.total_teams, 1);
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn poach_precondition_order_is_fixed() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob", "Carol", "Dave", "Eve"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();
        create_team(&store, "Blue", "Dave").await.unwrap();
        join_team(&store, &settings(), "Blue", "Eve").await.unwrap();

        // 1. target must exist, even when the team is also missing.
        assert!(matches!(
            poach_player(&store, &settings(), "Ghost", "Nowhere").await.unwrap_err(),
            GameError::NotFound { kind: "player", .. }
        ));
        // 2. free agents cannot be poached, reported before the missing team.
        assert!(matches!(
            poach_player(&store, &settings(), "Carol", "Nowhere").await.unwrap_err(),
            GameError::NotOnTeam { .. }
        ));
        // 3. the poacher team must exist.
        assert!(matches!(
            poach_player(&store, &settings(), "Alice", "Nowhere").await.unwrap_err(),
            GameError::NotFound { kind: "team", .. }
        ));
        // 4. a full poacher team is reported before self-poach.
        assert!(matches!(
            poach_player(&store, &settings(), "Eve", "Blue").await.unwrap_err(),
            GameError::TeamFull { .. }
        ));

        // 5. self-poach once the poacher has room.
        leave_team(&store, "Eve").await.unwrap();
        assert!(matches!(
            poach_player(&store, &settings(), "Dave", "Blue").await.unwrap_err(),
            GameError::SelfPoach
        ));
    }

    #[tokio::test]
    async fn failed_poach_leaves_state_untouched() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob", "Dave", "Eve"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();
        create_team(&store, "Blue", "Dave").await.unwrap();
        join_team(&store, &settings(), "Blue", "Eve").await.unwrap();

        let before = store.load_roster().await.unwrap();
        assert!(matches!(
            poach_player(&store, &settings(), "Alice", "Blue").await.unwrap_err(),
            GameError::TeamFull { .. }
        ));
        let after = store.load_roster().await.unwrap();

        assert_eq!(before.players, after.players);
        assert_eq!(before.teams, after.teams);
        assert_eq!(before.counters, after.counters);
    }

    #[tokio::test]
    async fn poaching_disabled_blocks_before_any_other_check() {
        let store = MemoryRosterStore::new();
        let settings = GameSettings {
            poaching_enabled: false,
            ..GameSettings::default()
        };

        // Even a nonsense request reports the disabled toggle first.
        assert!(matches!(
            poach_player(&store, &settings, "Ghost", "Nowhere").await.unwrap_err(),
            GameError::PoachingDisabled
        ));
    }

    #[tokio::test]
    async fn poach_back_restores_prior_compositions() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob", "Dave"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();
        create_team(&store, "Blue", "Dave").await.unwrap();

        poach_player(&store, &settings(), "Bob", "Blue").await.unwrap();
        let outcome = poach_player(&store, &settings(), "Bob", "Red").await.unwrap();

        let red = outcome.new_team;
        let alice = store.find_player("Alice".into()).await.unwrap().unwrap();
        let bob = store.find_player("Bob".into()).await.unwrap().unwrap();
        assert_eq!(red.member_ids, vec![alice.id, bob.id]);

        let blue = store.find_team("Blue".into()).await.unwrap().unwrap();
        assert_eq!(blue.member_count(), 1);
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn leave_then_rejoin_round_trips() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();

        let outcome = leave_team(&store, "Bob").await.unwrap();
        assert!(!outcome.team_dissolved);
        assert!(outcome.player.is_free_agent());

        let team = join_team(&store, &settings(), "Red", "Bob").await.unwrap();
        assert_eq!(team.member_count(), 2);
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn last_member_leaving_dissolves_the_team() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();

        let outcome = leave_team(&store, "Alice").await.unwrap();
        assert!(outcome.team_dissolved);

        let status = status(&store, &settings()).await.unwrap();
        assert!(status.teams.is_empty());
        assert_eq!(status.counters.total_teams, 0);
        assert_eq!(status.free_agents.len(), 1);
    }

    #[tokio::test]
    async fn leave_requires_membership() {
        let store = MemoryRosterStore::new();
        assert!(matches!(
            leave_team(&store, "Ghost").await.unwrap_err(),
            GameError::NotFound { kind: "player", .. }
        ));

        join_all(&store, &["Alice"]).await;
        assert!(matches!(
            leave_team(&store, "Alice").await.unwrap_err(),
            GameError::NotOnTeam { .. }
        ));
    }

    #[tokio::test]
    async fn total_players_survives_leave_but_not_admin_delete() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        leave_team(&store, "Alice").await.unwrap();

        assert_eq!(store.counters().await.unwrap().total_players, 2);

        delete_player(&store, "Bob").await.unwrap();
        assert_eq!(store.counters().await.unwrap().total_players, 1);
    }

    #[tokio::test]
    async fn deleting_a_team_member_updates_the_team() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();

        delete_player(&store, "Bob").await.unwrap();
        let red = store.find_team("Red".into()).await.unwrap().unwrap();
        assert_eq!(red.member_count(), 1);

        delete_player(&store, "Alice").await.unwrap();
        assert!(store.find_team("Red".into()).await.unwrap().is_none());
        assert_eq!(store.counters().await.unwrap().total_teams, 0);
    }

    #[tokio::test]
    async fn deleting_a_team_frees_its_members() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        join_team(&store, &settings(), "Red", "Bob").await.unwrap();

        delete_team(&store, "Red").await.unwrap();

        let status = status(&store, &settings()).await.unwrap();
        assert!(status.teams.is_empty());
        assert_eq!(status.free_agents.len(), 2);
        assert_invariants(&store, 2).await;
    }

    #[tokio::test]
    async fn dissolved_team_name_can_be_reused() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();
        leave_team(&store, "Alice").await.unwrap();

        let team = create_team(&store, "Red", "Bob").await.unwrap();
        assert_eq!(team.name, "Red");
    }

    #[tokio::test]
    async fn reset_returns_to_a_blank_game() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();

        reset(&store).await.unwrap();

        let status = status(&store, &settings()).await.unwrap();
        assert!(status.players.is_empty());
        assert!(status.teams.is_empty());
        assert_eq!(status.counters, RosterCounters::default());
    }

    #[tokio::test]
    async fn status_reports_free_agents_in_join_order() {
        let store = MemoryRosterStore::new();
        join_all(&store, &["Carol", "Alice", "Bob"]).await;
        create_team(&store, "Red", "Alice").await.unwrap();

        let status = status(&store, &settings()).await.unwrap();
        let free: Vec<_> = status.free_agents.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(free, ["Carol", "Bob"]);
        assert_eq!(status.max_team_size, 2);
    }
}
