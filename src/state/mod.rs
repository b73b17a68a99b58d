//! Shared application state wiring the store, settings, and the mutation gate.

/// Runtime-tunable game settings.
pub mod settings;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock, watch};

use crate::{
    config::AppConfig,
    dao::{roster_store::RosterStore, storage::StorageError},
    engine::error::GameError,
    state::settings::GameSettings,
};

/// Cheaply clonable handle on [`AppState`].
pub type SharedState = Arc<AppState>;

/// Central application state storing the roster store handle and settings.
///
/// Every roster mutation goes through [`AppState::lock_mutations`], the
/// process-wide critical section that keeps the team-size and uniqueness
/// invariants race-free. Read-only status queries bypass the gate and rely on
/// the store's one-shot snapshot instead.
pub struct AppState {
    config: AppConfig,
    roster_store: RwLock<Option<Arc<dyn RosterStore>>>,
    settings: RwLock<GameSettings>,
    mutation_gate: Mutex<()>,
    degraded: watch::Sender<bool>,
    admin_token: Option<String>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig, admin_token: Option<String>) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            roster_store: RwLock::new(None),
            settings: RwLock::new(GameSettings::default()),
            mutation_gate: Mutex::new(()),
            degraded: degraded_tx,
            admin_token,
        })
    }

    /// Immutable application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Expected admin token, when one was configured at startup.
    pub fn admin_token(&self) -> Option<&str> {
        self.admin_token.as_deref()
    }

    /// Obtain a handle to the current roster store, if one is installed.
    pub async fn roster_store(&self) -> Option<Arc<dyn RosterStore>> {
        let guard = self.roster_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the roster store or fail with a degraded-mode storage error.
    pub async fn require_roster_store(&self) -> Result<Arc<dyn RosterStore>, GameError> {
        self.roster_store()
            .await
            .ok_or(GameError::Storage(StorageError::Degraded))
    }

    /// Install a storage backend and leave degraded mode.
    pub async fn set_roster_store(&self, store: Arc<dyn RosterStore>) {
        {
            let mut guard = self.roster_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current storage backend and enter degraded mode.
    pub async fn clear_roster_store(&self) {
        {
            let mut guard = self.roster_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        if self.is_degraded() == value {
            return;
        }
        let _ = self.degraded.send(value);
    }

    /// Copy of the current game settings.
    pub async fn settings(&self) -> GameSettings {
        *self.settings.read().await
    }

    /// Update the team capacity, validating the 1-10 range.
    pub async fn set_max_team_size(&self, size: usize) -> Result<GameSettings, GameError> {
        let mut guard = self.settings.write().await;
        guard.set_max_team_size(size)?;
        Ok(*guard)
    }

    /// Flip the poaching toggle, returning the updated settings.
    pub async fn set_poaching_enabled(&self, enabled: bool) -> GameSettings {
        let mut guard = self.settings.write().await;
        guard.poaching_enabled = enabled;
        *guard
    }

    /// Enter the process-wide critical section for roster mutations.
    ///
    /// At most one mutating operation runs at a time across the whole
    /// process; hold the guard for the full duration of the operation.
    pub async fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutation_gate.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::roster_store::memory::MemoryRosterStore;

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = AppState::new(AppConfig::default(), None);
        assert!(state.is_degraded());
        assert!(state.require_roster_store().await.is_err());

        state
            .set_roster_store(Arc::new(MemoryRosterStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(state.require_roster_store().await.is_ok());

        state.clear_roster_store().await;
        assert!(state.is_degraded());
    }

    #[tokio::test]
    async fn settings_updates_are_validated() {
        let state = AppState::new(AppConfig::default(), None);
        let updated = state.set_max_team_size(5).await.unwrap();
        assert_eq!(updated.max_team_size, 5);
        assert!(state.set_max_team_size(0).await.is_err());
        assert_eq!(state.settings().await.max_team_size, 5);

        let updated = state.set_poaching_enabled(false).await;
        assert!(!updated.poaching_enabled);
    }
}
