#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{Counter, PlayerEntity, RosterCounters, RosterSnapshot, TeamEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for players, teams, and counters.
///
/// Players and teams are keyed by their unique names; the roster rules in
/// [`crate::engine`] are written once against this trait, so every backend
/// behaves identically as far as game semantics go.
pub trait RosterStore: Send + Sync {
    /// Look up a player by exact name.
    fn find_player(&self, name: String) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Insert or replace a player record.
    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a player by name, reporting whether a record existed.
    fn delete_player(&self, name: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Look up a team by exact name.
    fn find_team(&self, name: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Look up a team by identifier (used to resolve a player's current team).
    fn find_team_by_id(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Insert or replace a team record.
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a team by name, reporting whether a record existed.
    fn delete_team(&self, name: String) -> BoxFuture<'static, StorageResult<bool>>;
    /// Load players, teams, and counters in a single consistent read.
    fn load_roster(&self) -> BoxFuture<'static, StorageResult<RosterSnapshot>>;
    /// Atomically increment a counter, returning the new value.
    fn increment_counter(&self, counter: Counter) -> BoxFuture<'static, StorageResult<u64>>;
    /// Atomically decrement a counter (saturating at zero), returning the new value.
    fn decrement_counter(&self, counter: Counter) -> BoxFuture<'static, StorageResult<u64>>;
    /// Read the current counter values.
    fn counters(&self) -> BoxFuture<'static, StorageResult<RosterCounters>>;
    /// Wipe all players and teams and zero the counters.
    fn reset(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend connection after a failure.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
