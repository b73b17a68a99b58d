use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Representation of a player stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Unique display name chosen when joining (1-50 characters).
    pub name: String,
    /// Team the player currently belongs to; `None` means free agent.
    pub team_id: Option<Uuid>,
    /// Time the player joined the game.
    pub joined_at: SystemTime,
}

impl PlayerEntity {
    /// Create a fresh free agent with a random identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_id: None,
            joined_at: SystemTime::now(),
        }
    }

    /// Whether the player belongs to no team.
    pub fn is_free_agent(&self) -> bool {
        self.team_id.is_none()
    }
}

/// Representation of a team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Unique display name chosen at creation (1-50 characters).
    pub name: String,
    /// Member player IDs in join order, bounded by the configured team size.
    pub member_ids: Vec<Uuid>,
    /// Time the team was created.
    pub created_at: SystemTime,
}

impl TeamEntity {
    /// Create a team containing a single founding member.
    pub fn new(name: impl Into<String>, founder_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            member_ids: vec![founder_id],
            created_at: SystemTime::now(),
        }
    }

    /// Number of players currently on the roster.
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    /// Whether the team has reached the given capacity.
    pub fn is_full(&self, max_team_size: usize) -> bool {
        self.member_ids.len() >= max_team_size
    }

    /// Whether the team has no members left and must be dissolved.
    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/// Statistics maintained next to the roster.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterCounters {
    /// Players that ever joined the game (admin deletion and reset excepted).
    pub total_players: u64,
    /// Teams currently alive.
    pub total_teams: u64,
}

/// Counter keys understood by [`crate::dao::roster_store::RosterStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    /// The `total_players` counter.
    TotalPlayers,
    /// The `total_teams` counter.
    TotalTeams,
}

impl Counter {
    /// Stable key used by key-value style backends.
    pub fn key(self) -> &'static str {
        match self {
            Counter::TotalPlayers => "total_players",
            Counter::TotalTeams => "total_teams",
        }
    }
}

/// One-shot consistent view over the whole roster.
#[derive(Debug, Clone, Default)]
pub struct RosterSnapshot {
    /// All players in join order.
    pub players: Vec<PlayerEntity>,
    /// All teams in creation order.
    pub teams: Vec<TeamEntity>,
    /// Counter values at snapshot time.
    pub counters: RosterCounters,
}
