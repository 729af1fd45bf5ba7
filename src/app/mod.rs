//! Application layer coordinating state, events, and actions.
//!
//! This module defines the search and collection engine, sitting between the
//! runtime (which owns timers and network tasks) and the domain, query, and
//! storage layers.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Actions → Events → Event Handler → State Mutations → Actions → Side Effects
//!                            ↑                                  ↓
//!                            └──── Timer / Network Completions ─┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transitions
//! - [`images`]: Ids whose artwork failed to load
//! - [`modes`]: View, overlay, and feedback state types
//! - [`state`]: Engine state, snapshots, and view model computation

pub mod actions;
pub mod handler;
pub mod images;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event};
pub use images::ImageFaultSet;
pub use modes::{Overlay, SaveFeedback, ViewMode};
pub use state::{AppState, EngineState};
