//! Record error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid {collection} record '{id}': {reason}")]
    Invalid {
        collection: &'static str,
        id: String,
        reason: String,
    },

    #[error("Stored {collection} collection is unreadable: {source}")]
    Corrupt {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] agency_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordError {
    pub fn invalid<R: crate::Record>(record: &R, reason: impl Into<String>) -> Self {
        RecordError::Invalid {
            collection: R::COLLECTION,
            id: record.id().to_string(),
            reason: reason.into(),
        }
    }
}
