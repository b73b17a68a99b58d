use mongodb::error::Error as MongoError;
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("missing required environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save player `{name}`")]
    SavePlayer {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load player `{name}`")]
    LoadPlayer {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete player `{name}`")]
    DeletePlayer {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to save team `{name}`")]
    SaveTeam {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load team `{name}`")]
    LoadTeam {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete team `{name}`")]
    DeleteTeam {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load the roster snapshot")]
    LoadRoster {
        #[source]
        source: MongoError,
    },
    #[error("failed to update counter `{key}`")]
    UpdateCounter {
        key: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to wipe the roster collections")]
    Reset {
        #[source]
        source: MongoError,
    },
}
