//! In-process storage backend.

use crate::domain::PersistenceError;
use crate::storage::backend::Storage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Slot storage held in memory.
///
/// Clones share the same slots, which lets a test drop a collection and load
/// a fresh one from the "same disk" to simulate a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites a slot directly, bypassing any serialization.
    pub fn put_raw(&self, key: &str, contents: &str) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), contents.to_string());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        self.put_raw(key, contents);
        Ok(())
    }
}
