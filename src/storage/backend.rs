//! Storage backend abstraction.
//!
//! A backend is a durable key-value store of named text slots. The saved
//! collection serializes itself into one slot; the backend only promises that
//! a write either fully replaces the slot or leaves the previous contents.

use crate::domain::PersistenceError;

/// Abstraction over durable slot storage.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): one JSON file per slot with atomic replace
/// - [`MemoryStorage`](crate::storage::MemoryStorage): shared in-process map, for tests and
///   ephemeral sessions
pub trait Storage: Send {
    /// Reads the contents of a slot.
    ///
    /// Returns `Ok(None)` if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replaces the contents of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous contents must survive
    /// a failed write.
    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError>;
}
