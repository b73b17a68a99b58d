use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{PlayerEntity, TeamEntity},
    dto::{format_system_time, validation::validate_name},
    engine::rules::RosterStatus,
};

/// Payload used to join the game as a new player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinRequest {
    /// Unique player name (1-50 characters).
    #[validate(custom(function = validate_name))]
    pub name: String,
}

/// Payload for the `/team` endpoint, discriminated by the `action` tag.
///
/// The tag is resolved once at the boundary so the engine only ever sees a
/// well-typed create or join request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum TeamRequest {
    /// Create a new team with the caller as founding member.
    Create {
        /// Unique team name.
        team_name: String,
        /// Name of the player creating the team.
        creator_name: String,
    },
    /// Join an existing team.
    Join {
        /// Target team name.
        team_name: String,
        /// Name of the joining player.
        player_name: String,
    },
}

impl Validate for TeamRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let (team_name, player_name) = match self {
            TeamRequest::Create {
                team_name,
                creator_name,
            } => (team_name, creator_name),
            TeamRequest::Join {
                team_name,
                player_name,
            } => (team_name, player_name),
        };

        if let Err(e) = validate_name(team_name) {
            errors.add("team_name", e);
        }
        if let Err(e) = validate_name(player_name) {
            errors.add("player_name", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to poach a player onto the caller's team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PoachRequest {
    /// Name of the player to poach.
    #[validate(custom(function = validate_name))]
    pub target_player_name: String,
    /// Name of the poaching team (must have space available).
    #[validate(custom(function = validate_name))]
    pub poacher_team_name: String,
}

/// Payload used to leave the current team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LeaveRequest {
    /// Name of the player leaving their team.
    #[validate(custom(function = validate_name))]
    pub player_name: String,
}

/// Public projection of a player.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerDto {
    /// Stable player identifier.
    pub id: Uuid,
    /// Player display name.
    pub name: String,
    /// Current team, absent for free agents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<Uuid>,
    /// RFC 3339 join timestamp.
    pub joined_at: String,
}

impl From<PlayerEntity> for PlayerDto {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            team_id: entity.team_id,
            joined_at: format_system_time(entity.joined_at),
        }
    }
}

/// Public projection of a team with capacity info computed in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamDto {
    /// Stable team identifier.
    pub id: Uuid,
    /// Team display name.
    pub name: String,
    /// Member player IDs in join order.
    pub member_ids: Vec<Uuid>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Current roster size.
    pub member_count: usize,
    /// Whether the team is at the configured capacity.
    pub is_full: bool,
}

impl TeamDto {
    /// Project a team entity against the current capacity setting.
    pub fn from_entity(entity: TeamEntity, max_team_size: usize) -> Self {
        let member_count = entity.member_count();
        let is_full = entity.is_full(max_team_size);
        Self {
            id: entity.id,
            name: entity.name,
            member_ids: entity.member_ids,
            created_at: format_system_time(entity.created_at),
            member_count,
            is_full,
        }
    }
}

/// Response returned when a player joins the game.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The freshly created free agent.
    pub player: PlayerDto,
}

/// Response returned by create/join team operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The created or joined team.
    pub team: TeamDto,
}

/// Response returned by a successful poach.
#[derive(Debug, Serialize, ToSchema)]
pub struct PoachResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The raided team; omitted when it dissolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_team: Option<TeamDto>,
    /// The poacher team including its new member.
    pub new_team: TeamDto,
}

/// Response returned when a player leaves their team.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The player, now a free agent.
    pub player: PlayerDto,
    /// True when the team emptied out and was deleted.
    pub team_dissolved: bool,
}

/// Aggregate counters shown in the status view.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameStats {
    /// Players that ever joined.
    pub total_players: u64,
    /// Teams currently alive.
    pub total_teams: u64,
    /// Players currently without a team.
    pub free_agents_count: usize,
}

/// Full game status snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Aggregate counters.
    pub game_stats: GameStats,
    /// All players in join order.
    pub players: Vec<PlayerDto>,
    /// All teams in creation order.
    pub teams: Vec<TeamDto>,
    /// Free agents in join order.
    pub free_agents: Vec<PlayerDto>,
}

impl From<RosterStatus> for StatusResponse {
    fn from(status: RosterStatus) -> Self {
        let max_team_size = status.max_team_size;
        Self {
            game_stats: GameStats {
                total_players: status.counters.total_players,
                total_teams: status.counters.total_teams,
                free_agents_count: status.free_agents.len(),
            },
            players: status.players.into_iter().map(Into::into).collect(),
            teams: status
                .teams
                .into_iter()
                .map(|team| TeamDto::from_entity(team, max_team_size))
                .collect(),
            free_agents: status.free_agents.into_iter().map(Into::into).collect(),
        }
    }
}

/// Informational blurb served on the root route.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameInfo {
    /// Game title.
    pub game: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// One-line description of the game.
    pub description: &'static str,
    /// Current rules, reflecting the live settings.
    pub rules: GameRules,
}

/// Rule summary embedded in [`GameInfo`].
#[derive(Debug, Serialize, ToSchema)]
pub struct GameRules {
    /// Current maximum team size.
    pub max_team_size: usize,
    /// Whether poaching is currently allowed.
    pub poaching_enabled: bool,
    /// Reminder that names are unique.
    pub names: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_request_tag_dispatches_to_the_right_variant() {
        let request: TeamRequest = serde_json::from_str(
            r#"{"action":"create","team_name":"Red","creator_name":"Alice"}"#,
        )
        .unwrap();
        assert!(matches!(request, TeamRequest::Create { .. }));

        let request: TeamRequest =
            serde_json::from_str(r#"{"action":"join","team_name":"Red","player_name":"Bob"}"#)
                .unwrap();
        assert!(matches!(request, TeamRequest::Join { .. }));

        assert!(
            serde_json::from_str::<TeamRequest>(
                r#"{"action":"merge","team_name":"Red","player_name":"Bob"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn team_request_validates_both_names() {
        let request = TeamRequest::Create {
            team_name: String::new(),
            creator_name: "x".repeat(51),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("team_name"));
        assert!(errors.field_errors().contains_key("player_name"));
    }

    #[test]
    fn free_agents_omit_the_team_field() {
        let player = PlayerEntity::new("Alice");
        let json = serde_json::to_value(PlayerDto::from(player)).unwrap();
        assert!(json.get("team_id").is_none());
    }

    #[test]
    fn team_dto_computes_capacity_against_the_setting() {
        let team = TeamEntity::new("Red", Uuid::new_v4());
        let dto = TeamDto::from_entity(team.clone(), 1);
        assert!(dto.is_full);
        let dto = TeamDto::from_entity(team, 2);
        assert!(!dto.is_full);
        assert_eq!(dto.member_count, 1);
    }
}
