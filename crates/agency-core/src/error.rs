//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] agency_storage::StorageError),

    #[error("{0}")]
    Record(#[from] agency_records::RecordError),

    #[error("{0}")]
    Access(#[from] agency_accounts::AccessError),

    #[error("{0}")]
    Policy(#[from] agency_policy::PolicyError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
