pub mod config;
mod error;
mod models;
pub mod store;

pub use error::CouchDaoError;
pub use store::CouchRosterStore;

use crate::dao::storage::StorageError;

impl From<CouchDaoError> for StorageError {
    fn from(err: CouchDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
