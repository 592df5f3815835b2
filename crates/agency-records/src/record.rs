//! The record contract

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::Result;

/// A value that can live in a [`RecordStore`](crate::RecordStore).
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Blob key the collection is persisted under.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Field checks run on every save, after the store has rejected an
    /// empty id.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}
