//! View, overlay, and feedback state types.
//!
//! # State Machine
//!
//! The engine shows one of two screens:
//! - **Search**: results of the current query
//! - **`SavedCollection`**: the persisted saved items
//!
//! Independently, a detail overlay is either closed, waiting for a lookup, or
//! showing a record. Entering `LoadingDetail` always comes from `select_item`;
//! leaving it goes to `ShowingDetail` on success and back to `Closed` on any
//! failure.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::modes::{Overlay, ViewMode};
//!
//! let overlay = Overlay::LoadingDetail;
//! assert!(overlay.is_loading());
//! assert_eq!(ViewMode::default(), ViewMode::Search);
//! ```

/// Which screen is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Results of the current query.
    #[default]
    Search,

    /// The persisted saved collection.
    SavedCollection,
}

/// State of the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,

    /// A detail lookup is in flight; nothing is shown yet.
    LoadingDetail,

    /// `selected_detail` holds the record being shown.
    ShowingDetail,
}

impl Overlay {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::ShowingDetail)
    }

    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::LoadingDetail)
    }
}

/// Transient confirmation shown after saving an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveFeedback {
    #[default]
    Idle,

    /// An item was just saved; reverts to `Idle` after a short delay.
    JustSaved,
}
