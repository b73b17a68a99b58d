use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::models::{PlayerEntity, TeamEntity};

pub const PLAYER_PREFIX: &str = "player::";
pub const TEAM_PREFIX: &str = "team::";
pub const COUNTER_PREFIX: &str = "counter::";
pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchPlayerDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub player: PlayerBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub player_id: Uuid,
    pub name: String,
    pub team_id: Option<Uuid>,
    pub joined_at: SystemTime,
}

impl CouchPlayerDocument {
    pub fn from_entity(entity: PlayerEntity) -> Self {
        Self {
            id: player_doc_id(&entity.name),
            rev: None,
            player: PlayerBody {
                player_id: entity.id,
                name: entity.name,
                team_id: entity.team_id,
                joined_at: entity.joined_at,
            },
        }
    }

    pub fn into_entity(self) -> PlayerEntity {
        PlayerEntity {
            id: self.player.player_id,
            name: self.player.name,
            team_id: self.player.team_id,
            joined_at: self.player.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchTeamDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub team: TeamBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamBody {
    pub team_id: Uuid,
    pub name: String,
    pub member_ids: Vec<Uuid>,
    pub created_at: SystemTime,
}

impl CouchTeamDocument {
    pub fn from_entity(entity: TeamEntity) -> Self {
        Self {
            id: team_doc_id(&entity.name),
            rev: None,
            team: TeamBody {
                team_id: entity.id,
                name: entity.name,
                member_ids: entity.member_ids,
                created_at: entity.created_at,
            },
        }
    }

    pub fn into_entity(self) -> TeamEntity {
        TeamEntity {
            id: self.team.team_id,
            name: self.team.name,
            member_ids: self.team.member_ids,
            created_at: self.team.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchCounterDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub value: u64,
}

pub fn player_doc_id(name: &str) -> String {
    format!("{PLAYER_PREFIX}{name}")
}

pub fn team_doc_id(name: &str) -> String {
    format!("{TEAM_PREFIX}{name}")
}

pub fn counter_doc_id(key: &str) -> String {
    format!("{COUNTER_PREFIX}{key}")
}
