//! Record Store
//!
//! Every write is a full read-modify-write of the collection blob, run in a
//! single storage transaction. Collections are small enough that this is
//! cheaper than keeping an index.

use std::marker::PhantomData;

use agency_storage::Database;

use crate::error::RecordError;
use crate::record::Record;
use crate::Result;

pub struct RecordStore<R: Record> {
    db: Database,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    /// All records in storage order.
    ///
    /// A missing blob, an unreadable blob or a storage failure all read as
    /// an empty collection.
    pub fn list(&self) -> Vec<R> {
        match self.db.get_blob(R::COLLECTION) {
            Ok(Some(text)) => decode(&text),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    collection = R::COLLECTION,
                    error = %e,
                    "Storage unavailable, reading collection as empty"
                );
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<R> {
        self.list().into_iter().find(|r| r.id() == id)
    }

    /// Upsert by id. An existing record keeps its position; a new one is
    /// appended.
    ///
    /// Fails with [`RecordError::Corrupt`] if the stored blob exists but
    /// cannot be parsed; the blob is left untouched.
    pub fn save(&self, record: &R) -> Result<()> {
        if record.id().trim().is_empty() {
            return Err(RecordError::invalid(record, "id cannot be empty"));
        }
        record.validate()?;

        self.db.update_blob(R::COLLECTION, |current| {
            let mut records: Vec<R> = match current {
                Some(text) => decode_strict(text)?,
                None => Vec::new(),
            };

            match records.iter().position(|r| r.id() == record.id()) {
                Some(index) => records[index] = record.clone(),
                None => records.push(record.clone()),
            }

            Ok::<_, RecordError>(Some(serde_json::to_string(&records)?))
        })?;

        tracing::debug!(
            collection = R::COLLECTION,
            id = %record.id(),
            "Saved record"
        );

        Ok(())
    }

    /// Remove the record with `id`. Returns whether one was removed; an
    /// absent id is not an error and writes nothing.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut removed = false;

        self.db.update_blob(R::COLLECTION, |current| {
            let mut records: Vec<R> = current.map(decode).unwrap_or_default();
            let before = records.len();
            records.retain(|r| r.id() != id);

            if records.len() == before {
                return Ok::<_, RecordError>(None);
            }

            removed = true;
            Ok(Some(serde_json::to_string(&records)?))
        })?;

        if removed {
            tracing::debug!(collection = R::COLLECTION, id = %id, "Deleted record");
        }

        Ok(removed)
    }

    /// Whether the collection has ever been written.
    pub fn is_persisted(&self) -> Result<bool> {
        Ok(self.db.has_blob(R::COLLECTION)?)
    }

    /// Persist `records` as the initial collection unless one already
    /// exists. Returns whether the seed was written.
    pub fn seed_if_absent(&self, records: &[R]) -> Result<bool> {
        let text = serde_json::to_string(records)?;
        let seeded = self.db.set_blob_if_absent(R::COLLECTION, &text)?;

        if seeded {
            tracing::info!(
                collection = R::COLLECTION,
                count = records.len(),
                "Seeded collection"
            );
        }

        Ok(seeded)
    }
}

impl<R: Record> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

fn decode<R: Record>(text: &str) -> Vec<R> {
    match serde_json::from_str(text) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                collection = R::COLLECTION,
                error = %e,
                "Unreadable collection blob, treating as empty"
            );
            Vec::new()
        }
    }
}

fn decode_strict<R: Record>(text: &str) -> Result<Vec<R>> {
    serde_json::from_str(text).map_err(|source| {
        tracing::error!(
            collection = R::COLLECTION,
            error = %source,
            "Refusing to overwrite unreadable collection blob"
        );
        RecordError::Corrupt {
            collection: R::COLLECTION,
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        premium: i64,
    }

    impl Record for Item {
        const COLLECTION: &'static str = "items";

        fn id(&self) -> &str {
            &self.id
        }

        fn validate(&self) -> Result<()> {
            if self.premium < 0 {
                return Err(RecordError::invalid(self, "premium cannot be negative"));
            }
            Ok(())
        }
    }

    fn item(id: &str, premium: i64) -> Item {
        Item {
            id: id.to_string(),
            premium,
        }
    }

    fn store() -> (Database, RecordStore<Item>) {
        let db = Database::open_in_memory().unwrap();
        let store = RecordStore::new(db.clone());
        (db, store)
    }

    #[test]
    fn test_missing_blob_lists_empty() {
        let (_, store) = store();
        assert!(store.list().is_empty());
        assert!(!store.is_persisted().unwrap());
    }

    #[test]
    fn test_corrupt_blob_lists_empty() {
        let (db, store) = store();
        db.set_blob("items", "{not json").unwrap();
        assert!(store.list().is_empty());
        assert!(store.find("a").is_none());
    }

    #[test]
    fn test_save_keeps_unreadable_blob_intact() {
        let (db, store) = store();
        let stored = r#"[{"id":"a","premium":1},{"id":"b","premium":null}]"#;
        db.set_blob("items", stored).unwrap();
        assert!(store.list().is_empty());

        let err = store.save(&item("c", 3)).unwrap_err();
        assert!(matches!(err, RecordError::Corrupt { collection: "items", .. }));
        assert_eq!(db.get_blob("items").unwrap().as_deref(), Some(stored));

        // Deleting from it writes nothing either
        assert!(!store.delete("a").unwrap());
        assert_eq!(db.get_blob("items").unwrap().as_deref(), Some(stored));
    }

    #[test]
    fn test_save_then_list_contains_record_once() {
        let (_, store) = store();
        store.save(&item("a", 10)).unwrap();
        store.save(&item("a", 10)).unwrap();

        let matching: Vec<Item> = store.list().into_iter().filter(|r| r.id == "a").collect();
        assert_eq!(matching, vec![item("a", 10)]);
    }

    #[test]
    fn test_replace_keeps_position_and_appends_new() {
        let (_, store) = store();
        store.save(&item("p1", 100)).unwrap();
        store.save(&item("p2", 200)).unwrap();
        store.save(&item("p1", 150)).unwrap();

        assert_eq!(store.list(), vec![item("p1", 150), item("p2", 200)]);
    }

    #[test]
    fn test_resave_unchanged_is_noop_on_content() {
        let (db, store) = store();
        store.save(&item("a", 1)).unwrap();
        store.save(&item("b", 2)).unwrap();
        let before = db.get_blob("items").unwrap();

        let listed = store.find("a").unwrap();
        store.save(&listed).unwrap();

        assert_eq!(db.get_blob("items").unwrap(), before);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_, store) = store();
        store.save(&item("a", 1)).unwrap();
        store.save(&item("b", 2)).unwrap();

        assert!(store.delete("a").unwrap());
        assert!(store.find("a").is_none());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.list(), vec![item("b", 2)]);
    }

    #[test]
    fn test_delete_absent_does_not_create_blob() {
        let (_, store) = store();
        assert!(!store.delete("ghost").unwrap());
        assert!(!store.is_persisted().unwrap());
    }

    #[test]
    fn test_validation_rejects_before_write() {
        let (_, store) = store();
        let err = store.save(&item("a", -5)).unwrap_err();
        assert!(matches!(err, RecordError::Invalid { .. }));

        let err = store.save(&item("  ", 5)).unwrap_err();
        assert!(matches!(err, RecordError::Invalid { .. }));

        assert!(store.list().is_empty());
        assert!(!store.is_persisted().unwrap());
    }

    #[test]
    fn test_seed_if_absent_never_overwrites() {
        let (db, store) = store();
        assert!(store.seed_if_absent(&[item("s", 1)]).unwrap());
        let once = db.get_blob("items").unwrap();

        assert!(!store.seed_if_absent(&[item("other", 2)]).unwrap());
        assert_eq!(db.get_blob("items").unwrap(), once);
        assert_eq!(store.list(), vec![item("s", 1)]);
    }

    #[test]
    fn test_seed_skipped_after_user_cleared_collection() {
        let (_, store) = store();
        store.save(&item("a", 1)).unwrap();
        store.delete("a").unwrap();

        assert!(!store.seed_if_absent(&[item("s", 1)]).unwrap());
        assert!(store.list().is_empty());
    }
}
