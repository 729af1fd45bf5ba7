//! Storage layer for the saved collection.
//!
//! # Modules
//!
//! - `backend`: Slot storage trait
//! - `json`: JSON file backend with atomic writes
//! - `memory`: Shared in-memory backend
//! - `collection`: The saved-items store built on a backend

pub mod backend;
pub mod collection;
pub mod json;
pub mod memory;

pub use backend::Storage;
pub use collection::{SavedCollection, Toggled, DEFAULT_SLOT_KEY};
pub use json::JsonStorage;
pub use memory::MemoryStorage;
