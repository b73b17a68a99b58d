use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoCounterDocument, MongoPlayerDocument, MongoTeamDocument},
};
use crate::dao::{
    models::{Counter, PlayerEntity, RosterCounters, RosterSnapshot, TeamEntity},
    roster_store::RosterStore,
    storage::StorageResult,
};

const PLAYER_COLLECTION_NAME: &str = "players";
const TEAM_COLLECTION_NAME: &str = "teams";
const COUNTER_COLLECTION_NAME: &str = "counters";

#[derive(Clone)]
pub struct MongoRosterStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoRosterStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        // Documents are keyed by name (`_id`), so uniqueness comes for free;
        // these secondary indexes support join-order listings and the lookup
        // of a team by its identifier.
        let database = self.database().await;

        let players = database.collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME);
        let joined_idx = mongodb::IndexModel::builder()
            .keys(doc! {"joined_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_joined_idx".to_owned()))
                    .build(),
            )
            .build();
        players
            .create_index(joined_idx)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION_NAME,
                index: "joined_at",
                source,
            })?;

        let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
        let team_id_idx = mongodb::IndexModel::builder()
            .keys(doc! {"team_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("team_id_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        teams
            .create_index(team_id_idx)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: TEAM_COLLECTION_NAME,
                index: "team_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn player_collection(&self) -> Collection<MongoPlayerDocument> {
        self.database()
            .await
            .collection::<MongoPlayerDocument>(PLAYER_COLLECTION_NAME)
    }

    async fn team_collection(&self) -> Collection<MongoTeamDocument> {
        self.database()
            .await
            .collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME)
    }

    async fn counter_collection(&self) -> Collection<MongoCounterDocument> {
        self.database()
            .await
            .collection::<MongoCounterDocument>(COUNTER_COLLECTION_NAME)
    }

    async fn find_player(&self, name: String) -> MongoResult<Option<PlayerEntity>> {
        let collection = self.player_collection().await;
        let document = collection
            .find_one(doc! {"_id": &name})
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { name, source })?;
        Ok(document.map(Into::into))
    }

    async fn save_player(&self, player: PlayerEntity) -> MongoResult<()> {
        let document: MongoPlayerDocument = player.into();
        let collection = self.player_collection().await;
        collection
            .replace_one(doc! {"_id": &document.name}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SavePlayer {
                name: document.name.clone(),
                source,
            })?;
        Ok(())
    }

    async fn delete_player(&self, name: String) -> MongoResult<bool> {
        let collection = self.player_collection().await;
        let result = collection
            .delete_one(doc! {"_id": &name})
            .await
            .map_err(|source| MongoDaoError::DeletePlayer { name, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_team(&self, name: String) -> MongoResult<Option<TeamEntity>> {
        let collection = self.team_collection().await;
        let document = collection
            .find_one(doc! {"_id": &name})
            .await
            .map_err(|source| MongoDaoError::LoadTeam { name, source })?;
        Ok(document.map(Into::into))
    }

    async fn find_team_by_id(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        let collection = self.team_collection().await;
        let document = collection
            .find_one(doc! {"team_id": id.to_string()})
            .await
            .map_err(|source| MongoDaoError::LoadTeam {
                name: id.to_string(),
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn save_team(&self, team: TeamEntity) -> MongoResult<()> {
        let document: MongoTeamDocument = team.into();
        let collection = self.team_collection().await;
        collection
            .replace_one(doc! {"_id": &document.name}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveTeam {
                name: document.name.clone(),
                source,
            })?;
        Ok(())
    }

    async fn delete_team(&self, name: String) -> MongoResult<bool> {
        let collection = self.team_collection().await;
        let result = collection
            .delete_one(doc! {"_id": &name})
            .await
            .map_err(|source| MongoDaoError::DeleteTeam { name, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn load_roster(&self) -> MongoResult<RosterSnapshot> {
        let player_docs: Vec<MongoPlayerDocument> = self
            .player_collection()
            .await
            .find(doc! {})
            .sort(doc! {"joined_at": 1})
            .await
            .map_err(|source| MongoDaoError::LoadRoster { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadRoster { source })?;

        let team_docs: Vec<MongoTeamDocument> = self
            .team_collection()
            .await
            .find(doc! {})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::LoadRoster { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::LoadRoster { source })?;

        let counters = self.read_counters().await?;

        Ok(RosterSnapshot {
            players: player_docs.into_iter().map(Into::into).collect(),
            teams: team_docs.into_iter().map(Into::into).collect(),
            counters,
        })
    }

    async fn read_counter(&self, counter: Counter) -> MongoResult<u64> {
        let collection = self.counter_collection().await;
        let document = collection
            .find_one(doc! {"_id": counter.key()})
            .await
            .map_err(|source| MongoDaoError::UpdateCounter {
                key: counter.key(),
                source,
            })?;
        Ok(document.map_or(0, |doc| doc.value.max(0) as u64))
    }

    async fn read_counters(&self) -> MongoResult<RosterCounters> {
        Ok(RosterCounters {
            total_players: self.read_counter(Counter::TotalPlayers).await?,
            total_teams: self.read_counter(Counter::TotalTeams).await?,
        })
    }

    async fn bump_counter(&self, counter: Counter, delta: i64) -> MongoResult<u64> {
        let collection = self.counter_collection().await;
        let updated = collection
            .find_one_and_update(
                doc! {"_id": counter.key()},
                doc! {"$inc": {"value": delta}},
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::UpdateCounter {
                key: counter.key(),
                source,
            })?;

        let value = updated.map_or(0, |doc| doc.value);
        if value < 0 {
            // Decrements saturate at zero; repair the stored value.
            collection
                .update_one(
                    doc! {"_id": counter.key()},
                    doc! {"$set": {"value": 0_i64}},
                )
                .await
                .map_err(|source| MongoDaoError::UpdateCounter {
                    key: counter.key(),
                    source,
                })?;
            return Ok(0);
        }
        Ok(value as u64)
    }

    async fn reset(&self) -> MongoResult<()> {
        let database = self.database().await;
        for name in [
            PLAYER_COLLECTION_NAME,
            TEAM_COLLECTION_NAME,
            COUNTER_COLLECTION_NAME,
        ] {
            database
                .collection::<mongodb::bson::Document>(name)
                .delete_many(doc! {})
                .await
                .map_err(|source| MongoDaoError::Reset { source })?;
        }
        Ok(())
    }
}

impl RosterStore for MongoRosterStore {
    fn find_player(&self, name: String) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(name).await.map_err(Into::into) })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_player(player).await.map_err(Into::into) })
    }

    fn delete_player(&self, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_player(name).await.map_err(Into::into) })
    }

    fn find_team(&self, name: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(name).await.map_err(Into::into) })
    }

    fn find_team_by_id(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team_by_id(id).await.map_err(Into::into) })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_team(team).await.map_err(Into::into) })
    }

    fn delete_team(&self, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(name).await.map_err(Into::into) })
    }

    fn load_roster(&self) -> BoxFuture<'static, StorageResult<RosterSnapshot>> {
        let store = self.clone();
        Box::pin(async move { store.load_roster().await.map_err(Into::into) })
    }

    fn increment_counter(&self, counter: Counter) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.bump_counter(counter, 1).await.map_err(Into::into) })
    }

    fn decrement_counter(&self, counter: Counter) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.bump_counter(counter, -1).await.map_err(Into::into) })
    }

    fn counters(&self) -> BoxFuture<'static, StorageResult<RosterCounters>> {
        let store = self.clone();
        Box::pin(async move { store.read_counters().await.map_err(Into::into) })
    }

    fn reset(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.reset().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
