//! Tracking of items whose artwork failed to load.

use std::collections::HashSet;

/// Set of item ids with broken or missing artwork.
///
/// The presentation layer reports load failures; the engine clears the set
/// only when it accepts a new successful search response, giving ids that
/// reappear a fresh chance to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageFaultSet {
    faulted: HashSet<String>,
}

impl ImageFaultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure. Returns `true` if the id was not already faulted.
    pub fn mark_faulted(&mut self, id: impl Into<String>) -> bool {
        self.faulted.insert(id.into())
    }

    #[must_use]
    pub fn is_faulted(&self, id: &str) -> bool {
        self.faulted.contains(id)
    }

    pub fn reset(&mut self) {
        if !self.faulted.is_empty() {
            tracing::debug!(cleared = self.faulted.len(), "image faults reset");
        }
        self.faulted.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faulted.is_empty()
    }
}
