//! In-memory roster store, the default backend and the one used by tests.

use std::sync::{Arc, PoisonError, RwLock};

use futures::future::BoxFuture;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::dao::{
    models::{Counter, PlayerEntity, RosterCounters, RosterSnapshot, TeamEntity},
    roster_store::RosterStore,
    storage::StorageResult,
};

/// Roster store keeping everything in process memory.
///
/// Players and teams live in [`IndexMap`]s keyed by name so that join and
/// creation order are preserved, which the status view and the auto-assign
/// heuristic both rely on. All accesses go through one `RwLock`, so the
/// snapshot returned by [`RosterStore::load_roster`] is always consistent.
#[derive(Clone, Default)]
pub struct MemoryRosterStore {
    inner: Arc<RwLock<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    players: IndexMap<String, PlayerEntity>,
    teams: IndexMap<String, TeamEntity>,
    counters: RosterCounters,
}

impl MemoryInner {
    fn counter_mut(&mut self, counter: Counter) -> &mut u64 {
        match counter {
            Counter::TotalPlayers => &mut self.counters.total_players,
            Counter::TotalTeams => &mut self.counters.total_teams,
        }
    }
}

impl MemoryRosterStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MemoryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MemoryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RosterStore for MemoryRosterStore {
    fn find_player(&self, name: String) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let found = self.read().players.get(&name).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write().players.insert(player.name.clone(), player);
        Box::pin(async { Ok(()) })
    }

    fn delete_player(&self, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        // shift_remove keeps the remaining players in join order.
        let removed = self.write().players.shift_remove(&name).is_some();
        Box::pin(async move { Ok(removed) })
    }

    fn find_team(&self, name: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let found = self.read().teams.get(&name).cloned();
        Box::pin(async move { Ok(found) })
    }

    fn find_team_by_id(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let found = self
            .read()
            .teams
            .values()
            .find(|team| team.id == id)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.write().teams.insert(team.name.clone(), team);
        Box::pin(async { Ok(()) })
    }

    fn delete_team(&self, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        let removed = self.write().teams.shift_remove(&name).is_some();
        Box::pin(async move { Ok(removed) })
    }

    fn load_roster(&self) -> BoxFuture<'static, StorageResult<RosterSnapshot>> {
        let guard = self.read();
        let snapshot = RosterSnapshot {
            players: guard.players.values().cloned().collect(),
            teams: guard.teams.values().cloned().collect(),
            counters: guard.counters,
        };
        drop(guard);
        Box::pin(async move { Ok(snapshot) })
    }

    fn increment_counter(&self, counter: Counter) -> BoxFuture<'static, StorageResult<u64>> {
        let mut guard = self.write();
        let value = guard.counter_mut(counter);
        *value += 1;
        let next = *value;
        drop(guard);
        Box::pin(async move { Ok(next) })
    }

    fn decrement_counter(&self, counter: Counter) -> BoxFuture<'static, StorageResult<u64>> {
        let mut guard = self.write();
        let value = guard.counter_mut(counter);
        *value = value.saturating_sub(1);
        let next = *value;
        drop(guard);
        Box::pin(async move { Ok(next) })
    }

    fn counters(&self) -> BoxFuture<'static, StorageResult<RosterCounters>> {
        let counters = self.read().counters;
        Box::pin(async move { Ok(counters) })
    }

    fn reset(&self) -> BoxFuture<'static, StorageResult<()>> {
        let mut guard = self.write();
        guard.players.clear();
        guard.teams.clear();
        guard.counters = RosterCounters::default();
        drop(guard);
        Box::pin(async { Ok(()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn players_are_listed_in_join_order() {
        let store = MemoryRosterStore::new();
        for name in ["Alice", "Bob", "Carol"] {
            store.save_player(PlayerEntity::new(name)).await.unwrap();
        }

        let snapshot = store.load_roster().await.unwrap();
        let names: Vec<_> = snapshot.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn delete_preserves_order_of_remaining_players() {
        let store = MemoryRosterStore::new();
        for name in ["Alice", "Bob", "Carol"] {
            store.save_player(PlayerEntity::new(name)).await.unwrap();
        }

        assert!(store.delete_player("Bob".into()).await.unwrap());
        assert!(!store.delete_player("Bob".into()).await.unwrap());

        let snapshot = store.load_roster().await.unwrap();
        let names: Vec<_> = snapshot.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Carol"]);
    }

    #[tokio::test]
    async fn counters_increment_and_saturate_at_zero() {
        let store = MemoryRosterStore::new();
        assert_eq!(
            store.increment_counter(Counter::TotalTeams).await.unwrap(),
            1
        );
        assert_eq!(
            store.decrement_counter(Counter::TotalTeams).await.unwrap(),
            0
        );
        assert_eq!(
            store.decrement_counter(Counter::TotalTeams).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn find_team_by_id_resolves_saved_team() {
        let store = MemoryRosterStore::new();
        let team = TeamEntity::new("Red", Uuid::new_v4());
        let id = team.id;
        store.save_team(team).await.unwrap();

        let found = store.find_team_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Red");
        assert!(store.find_team_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reset_wipes_everything() {
        let store = MemoryRosterStore::new();
        store.save_player(PlayerEntity::new("Alice")).await.unwrap();
        store
            .increment_counter(Counter::TotalPlayers)
            .await
            .unwrap();
        store.reset().await.unwrap();

        let snapshot = store.load_roster().await.unwrap();
        assert!(snapshot.players.is_empty());
        assert!(snapshot.teams.is_empty());
        assert_eq!(snapshot.counters.total_players, 0);
    }
}
