use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by roster storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be reached or rejected the request.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description of the failure.
        message: String,
        /// Underlying backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// No storage backend is installed (the service runs in degraded mode).
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// A stored record could not be decoded into the expected shape.
    #[error("storage record corrupted: {message}")]
    Corrupted {
        /// Human-readable description of the bad record.
        message: String,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a corrupted-record error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        StorageError::Corrupted {
            message: message.into(),
        }
    }
}
