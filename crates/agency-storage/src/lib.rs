//! Agency Storage Layer
//!
//! SQLite-backed key-value store. Every collection the agency keeps is a
//! single named blob of JSON text; this crate knows nothing about what the
//! blobs contain.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
