//! Agency Record Collections
//!
//! A collection is an ordered list of records persisted as one JSON blob.
//! Records are identified by their `id`; saving upserts in place, deleting
//! an absent id is a no-op, and an unreadable blob reads as empty.

mod error;
mod record;
mod store;

pub use error::RecordError;
pub use record::Record;
pub use store::RecordStore;

pub type Result<T> = std::result::Result<T, RecordError>;
