//! The saved-items collection.
//!
//! An insertion-ordered set of [`ItemDetail`] keyed by id. The whole collection
//! is serialized as a JSON array into a single storage slot after every
//! mutation and read back once when the engine starts.

use crate::domain::{ItemDetail, PersistenceError};
use crate::storage::backend::Storage;
use std::collections::HashSet;

/// Default slot name for the persisted collection.
pub const DEFAULT_SLOT_KEY: &str = "savedMovies";

/// What a [`SavedCollection::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    Saved,
    Removed,
}

/// Persisted, id-keyed, insertion-ordered collection of saved items.
pub struct SavedCollection {
    items: Vec<ItemDetail>,
    storage: Box<dyn Storage>,
    key: String,
}

impl SavedCollection {
    /// Loads the collection from `storage`.
    ///
    /// A missing slot yields an empty collection. A slot that cannot be read
    /// or parsed is logged and also yields an empty collection; it will be
    /// overwritten by the next mutation.
    pub fn load(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let _span = tracing::debug_span!("collection_load", key = %key).entered();

        let items = match Self::read_items(storage.as_ref(), &key) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = %e, "saved collection unreadable, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = items.len(), "saved collection loaded");
        Self {
            items,
            storage,
            key,
        }
    }

    fn read_items(storage: &dyn Storage, key: &str) -> Result<Vec<ItemDetail>, PersistenceError> {
        let Some(raw) = storage.read(key)? else {
            return Ok(Vec::new());
        };

        let parsed: Vec<ItemDetail> =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt(e.to_string()))?;

        let mut seen = HashSet::with_capacity(parsed.len());
        let before = parsed.len();
        let items: Vec<ItemDetail> = parsed
            .into_iter()
            .filter(|item| seen.insert(item.id.clone()))
            .collect();
        if items.len() != before {
            tracing::debug!(dropped = before - items.len(), "collapsed duplicate saved ids");
        }
        Ok(items)
    }

    /// Adds `item` if its id is absent, removes it otherwise, then persists.
    ///
    /// Persistence failures are logged; the in-memory change is kept.
    pub fn toggle(&mut self, item: ItemDetail) -> Toggled {
        let _span = tracing::debug_span!("collection_toggle", id = %item.id).entered();

        let outcome = if let Some(pos) = self.position(&item.id) {
            self.items.remove(pos);
            Toggled::Removed
        } else {
            self.items.push(item);
            Toggled::Saved
        };

        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "failed to persist saved collection");
        }

        tracing::debug!(outcome = ?outcome, count = self.items.len(), "collection toggled");
        outcome
    }

    fn persist(&mut self) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&self.items)
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
        self.storage.write(&self.key, &json)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// All saved items in insertion order.
    #[must_use]
    pub fn all(&self) -> &[ItemDetail] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ItemDetail> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl std::fmt::Debug for SavedCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedCollection")
            .field("key", &self.key)
            .field("len", &self.items.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn detail(id: &str, title: &str) -> ItemDetail {
        serde_json::from_value(serde_json::json!({ "imdbID": id, "Title": title })).unwrap()
    }

    fn load(storage: &MemoryStorage) -> SavedCollection {
        SavedCollection::load(Box::new(storage.clone()), DEFAULT_SLOT_KEY)
    }

    #[test]
    fn toggle_twice_restores_membership() {
        let storage = MemoryStorage::new();
        let mut saved = load(&storage);

        assert_eq!(saved.toggle(detail("tt1", "Alien")), Toggled::Saved);
        assert!(saved.contains("tt1"));
        assert_eq!(saved.toggle(detail("tt1", "Alien")), Toggled::Removed);
        assert!(!saved.contains("tt1"));
        assert!(saved.is_empty());
    }

    #[test]
    fn survives_restart_in_order() {
        let storage = MemoryStorage::new();
        {
            let mut saved = load(&storage);
            for (id, title) in [("tt3", "Heat"), ("tt1", "Alien"), ("tt2", "Se7en")] {
                saved.toggle(detail(id, title));
            }
        }

        let reloaded = load(&storage);
        let ids: Vec<&str> = reloaded.all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["tt3", "tt1", "tt2"]);
    }

    #[test]
    fn corrupt_slot_starts_empty_and_is_repaired() {
        let storage = MemoryStorage::new();
        storage.put_raw(DEFAULT_SLOT_KEY, "{not json");

        let mut saved = load(&storage);
        assert!(saved.is_empty());

        saved.toggle(detail("tt1", "Alien"));
        assert_eq!(load(&storage).len(), 1);
    }

    #[test]
    fn duplicate_ids_in_slot_are_collapsed() {
        let storage = MemoryStorage::new();
        storage.put_raw(
            DEFAULT_SLOT_KEY,
            r#"[{"imdbID":"tt1","Title":"First"},{"imdbID":"tt1","Title":"Second"}]"#,
        );

        let saved = load(&storage);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.get("tt1").map(|d| d.title.as_str()), Some("First"));
    }

    #[test]
    fn removal_preserves_order_of_the_rest() {
        let storage = MemoryStorage::new();
        let mut saved = load(&storage);
        for id in ["a", "b", "c"] {
            saved.toggle(detail(id, id));
        }
        saved.toggle(detail("b", "b"));

        let ids: Vec<&str> = saved.all().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
