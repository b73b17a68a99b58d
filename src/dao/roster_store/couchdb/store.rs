use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use uuid::Uuid;

use crate::dao::{
    models::{Counter, PlayerEntity, RosterCounters, RosterSnapshot, TeamEntity},
    roster_store::RosterStore,
    storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        AllDocsResponse, COUNTER_PREFIX, CouchCounterDocument, CouchPlayerDocument,
        CouchTeamDocument, END_SUFFIX, PLAYER_PREFIX, TEAM_PREFIX, counter_doc_id, player_doc_id,
        team_doc_id,
    },
};

#[derive(Clone)]
pub struct CouchRosterStore {
    client: Client,
    base_url: Arc<Url>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchRosterStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Url::parse(config.base_url.trim_end_matches('/')).map_err(|_| {
            CouchDaoError::InvalidBaseUrl {
                url: config.base_url.clone(),
            }
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CouchDaoError::InvalidBaseUrl {
                url: config.base_url,
            });
        }

        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url: Arc::new(base_url),
            database,
            auth,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn database_url(&self) -> Url {
        let mut url = (*self.base_url).clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(self.database.as_ref());
        }
        url
    }

    /// Document URL with the id pushed as a single path segment, so names
    /// containing `/` or other reserved characters are percent-encoded.
    fn document_url(&self, doc_id: &str) -> Url {
        let mut url = self.database_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(doc_id);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = self.database_url();

        let response = self
            .request(Method::GET, url.clone())
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self.request(Method::PUT, url).send().await.map_err(
                    |source| CouchDaoError::DatabaseCreate {
                        database: database.clone(),
                        source,
                    },
                )?;
                if create.status().is_success() {
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, self.document_url(doc_id))
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, self.document_url(doc_id))
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: response.status(),
            })
        }
    }

    /// Delete a document when it exists, reporting whether it was present.
    async fn delete_document(&self, doc_id: &str, rev: Option<String>) -> CouchResult<bool> {
        let Some(rev) = rev else {
            return Ok(false);
        };

        let mut url = self.document_url(doc_id);
        url.query_pairs_mut().append_pair("rev", &rev);

        let response = self.request(Method::DELETE, url).send().await.map_err(
            |source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            },
        )?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn list_documents<T>(&self, prefix: &str) -> CouchResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        const ALL_DOCS: &str = "_all_docs";
        let query = [
            ("include_docs", "true".to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, self.document_url(ALL_DOCS))
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        let payload = response.json::<AllDocsResponse>().await.map_err(|source| {
            CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            }
        })?;

        let mut documents = Vec::new();
        for row in payload.rows {
            if let Some(doc) = row.doc {
                let parsed = from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                    path: ALL_DOCS.to_string(),
                    source,
                })?;
                documents.push(parsed);
            }
        }

        Ok(documents)
    }

    async fn existing_rev<T>(&self, doc_id: &str) -> CouchResult<Option<String>>
    where
        T: DeserializeOwned + Revision,
    {
        Ok(self
            .get_document::<T>(doc_id)
            .await?
            .and_then(|doc| doc.rev()))
    }

    /// Couch has no atomic increment; the process-wide mutation gate is what
    /// keeps this read-modify-write race-free.
    async fn bump_counter(&self, counter: Counter, delta: i64) -> CouchResult<u64> {
        let doc_id = counter_doc_id(counter.key());
        let existing = self.get_document::<CouchCounterDocument>(&doc_id).await?;
        let (rev, current) = match existing {
            Some(doc) => (doc.rev, doc.value),
            None => (None, 0),
        };

        let value = if delta >= 0 {
            current.saturating_add(delta as u64)
        } else {
            current.saturating_sub(delta.unsigned_abs())
        };

        let document = CouchCounterDocument {
            id: doc_id.clone(),
            rev,
            value,
        };
        self.put_document(&doc_id, &document).await?;
        Ok(value)
    }

    async fn read_counter(&self, counter: Counter) -> CouchResult<u64> {
        let doc_id = counter_doc_id(counter.key());
        Ok(self
            .get_document::<CouchCounterDocument>(&doc_id)
            .await?
            .map_or(0, |doc| doc.value))
    }

    async fn read_counters(&self) -> CouchResult<RosterCounters> {
        Ok(RosterCounters {
            total_players: self.read_counter(Counter::TotalPlayers).await?,
            total_teams: self.read_counter(Counter::TotalTeams).await?,
        })
    }

    async fn load_roster(&self) -> CouchResult<RosterSnapshot> {
        // `_all_docs` sorts by document id (name); re-sort to join order.
        let mut players: Vec<PlayerEntity> = self
            .list_documents::<CouchPlayerDocument>(PLAYER_PREFIX)
            .await?
            .into_iter()
            .map(CouchPlayerDocument::into_entity)
            .collect();
        players.sort_by_key(|player| player.joined_at);

        let mut teams: Vec<TeamEntity> = self
            .list_documents::<CouchTeamDocument>(TEAM_PREFIX)
            .await?
            .into_iter()
            .map(CouchTeamDocument::into_entity)
            .collect();
        teams.sort_by_key(|team| team.created_at);

        let counters = self.read_counters().await?;

        Ok(RosterSnapshot {
            players,
            teams,
            counters,
        })
    }

    async fn wipe(&self) -> CouchResult<()> {
        for prefix in [PLAYER_PREFIX, TEAM_PREFIX, COUNTER_PREFIX] {
            let documents = self.list_documents::<RawDocument>(prefix).await?;
            for document in documents {
                self.delete_document(&document.id, document.rev).await?;
            }
        }
        Ok(())
    }
}

/// Access to the `_rev` field shared by all document models.
trait Revision {
    fn rev(&self) -> Option<String>;
}

impl Revision for CouchPlayerDocument {
    fn rev(&self) -> Option<String> {
        self.rev.clone()
    }
}

impl Revision for CouchTeamDocument {
    fn rev(&self) -> Option<String> {
        self.rev.clone()
    }
}

#[derive(serde::Deserialize)]
struct RawDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_rev")]
    rev: Option<String>,
}

impl RosterStore for CouchRosterStore {
    fn find_player(&self, name: String) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let maybe_doc = store
                .get_document::<CouchPlayerDocument>(&player_doc_id(&name))
                .await?;
            Ok(maybe_doc.map(CouchPlayerDocument::into_entity))
        })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = player_doc_id(&player.name);
            let mut document = CouchPlayerDocument::from_entity(player);
            document.rev = store.existing_rev::<CouchPlayerDocument>(&doc_id).await?;
            store
                .put_document(&doc_id, &document)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_player(&self, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = player_doc_id(&name);
            let rev = store.existing_rev::<CouchPlayerDocument>(&doc_id).await?;
            store.delete_document(&doc_id, rev).await.map_err(Into::into)
        })
    }

    fn find_team(&self, name: String) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let maybe_doc = store
                .get_document::<CouchTeamDocument>(&team_doc_id(&name))
                .await?;
            Ok(maybe_doc.map(CouchTeamDocument::into_entity))
        })
    }

    fn find_team_by_id(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let teams = store.list_documents::<CouchTeamDocument>(TEAM_PREFIX).await?;
            Ok(teams
                .into_iter()
                .map(CouchTeamDocument::into_entity)
                .find(|team| team.id == id))
        })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = team_doc_id(&team.name);
            let mut document = CouchTeamDocument::from_entity(team);
            document.rev = store.existing_rev::<CouchTeamDocument>(&doc_id).await?;
            store
                .put_document(&doc_id, &document)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_team(&self, name: String) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let doc_id = team_doc_id(&name);
            let rev = store.existing_rev::<CouchTeamDocument>(&doc_id).await?;
            store.delete_document(&doc_id, rev).await.map_err(Into::into)
        })
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
        Box::pin(async move { store.wipe().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let url = store.database_url();
            let path = url.to_string();
            let response = store.request(Method::GET, url).send().await.map_err(
                |source| CouchDaoError::RequestSend {
                    path: path.clone(),
                    source,
                },
            )?;

            if response.status().is_success() {
                Ok(())
            } else {
                Err(CouchDaoError::RequestStatus {
                    path,
                    status: response.status(),
                }
                .into())
            }
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
