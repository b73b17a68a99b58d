use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{engine::auto_assign::AutoAssignOutcome, state::settings::GameSettings};

/// Generic confirmation payload for admin actions.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human-readable confirmation.
    pub message: String,
}

impl ActionResponse {
    /// Build a confirmation from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Current admin-tunable settings.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    /// Upper bound on team membership.
    pub max_team_size: usize,
    /// Whether the poach operation is allowed.
    pub poaching_enabled: bool,
}

impl From<GameSettings> for SettingsResponse {
    fn from(settings: GameSettings) -> Self {
        Self {
            max_team_size: settings.max_team_size,
            poaching_enabled: settings.poaching_enabled,
        }
    }
}

/// Payload to change the maximum team size.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamSizeRequest {
    /// New capacity, 1-10.
    pub max_team_size: usize,
}

/// Payload to toggle poaching.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PoachingRequest {
    /// True to allow poaching, false to block it.
    pub enabled: bool,
}

/// Counts reported after an auto-assign run.
#[derive(Debug, Serialize, ToSchema)]
pub struct AutoAssignResponse {
    /// Human-readable summary.
    pub message: String,
    /// Free agents that were placed on a team.
    pub assigned_count: usize,
    /// Teams created along the way.
    pub teams_created: usize,
}

impl From<AutoAssignOutcome> for AutoAssignResponse {
    fn from(outcome: AutoAssignOutcome) -> Self {
        let mut message = format!("Assigned {} free agents to teams", outcome.assigned_count);
        if outcome.teams_created > 0 {
            message.push_str(&format!(" (created {} new teams)", outcome.teams_created));
        }
        Self {
            message,
            assigned_count: outcome.assigned_count,
            teams_created: outcome.teams_created,
        }
    }
}
