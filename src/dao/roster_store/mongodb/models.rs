use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{PlayerEntity, TeamEntity};

/// Player document keyed by name, the uniqueness anchor for the whole game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    pub name: String,
    pub player_id: Uuid,
    pub team_id: Option<Uuid>,
    pub joined_at: DateTime,
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            name: value.name,
            player_id: value.id,
            team_id: value.team_id,
            joined_at: DateTime::from_system_time(value.joined_at),
        }
    }
}

impl From<MongoPlayerDocument> for PlayerEntity {
    fn from(value: MongoPlayerDocument) -> Self {
        Self {
            id: value.player_id,
            name: value.name,
            team_id: value.team_id,
            joined_at: value.joined_at.to_system_time(),
        }
    }
}

/// Team document keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    pub name: String,
    pub team_id: Uuid,
    pub member_ids: Vec<Uuid>,
    pub created_at: DateTime,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            name: value.name,
            team_id: value.id,
            member_ids: value.member_ids,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.team_id,
            name: value.name,
            member_ids: value.member_ids,
            created_at: value.created_at.to_system_time(),
        }
    }
}

/// One document per counter, updated atomically with `$inc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoCounterDocument {
    #[serde(rename = "_id")]
    pub key: String,
    pub value: i64,
}
