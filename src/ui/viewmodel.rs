//! View model types representing renderable UI state.
//!
//! View models are computed from an [`EngineState`](crate::app::EngineState)
//! snapshot and contain no business logic, only display-ready data: which
//! cards to draw, whether a poster or a text fallback should be shown, which
//! title characters matched the query, and what the overlay holds.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::EngineState;
//! use marquee::ui::viewmodel::OverlayView;
//!
//! let vm = EngineState::default().compute_viewmodel();
//! assert!(vm.cards.is_empty());
//! assert_eq!(vm.overlay, OverlayView::Hidden);
//! assert!(!vm.header.saved_button_enabled);
//! ```

use crate::app::modes::ViewMode;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    /// Title bar with counts and navigation state.
    pub header: HeaderInfo,

    /// Search input state.
    pub search_bar: SearchBarInfo,

    /// Cards for the active screen, in display order.
    pub cards: Vec<Card>,

    /// Message shown instead of cards, if any.
    pub empty_state: Option<EmptyState>,

    /// Detail overlay contents.
    pub overlay: OverlayView,

    /// Keybinding hints.
    pub footer: FooterInfo,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Title text, e.g. `" Search (10) "`.
    pub title: String,

    /// Active screen.
    pub view_mode: ViewMode,

    /// Number of items in the saved collection.
    pub saved_count: usize,

    /// Whether the "saved items" navigation control should be enabled.
    ///
    /// Disabled while the collection is empty.
    pub saved_button_enabled: bool,
}

/// Search bar display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    /// Current query text, updated on every keystroke.
    pub query: String,

    /// Whether a search request is in flight.
    pub searching: bool,
}

/// How an item's artwork should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterView {
    /// Load and show the image at this URL.
    Image(String),

    /// No usable artwork; show a text placeholder with the title.
    Fallback { title: String },
}

/// One result or saved-item card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub year: String,

    /// Item type as reported by search (`movie`, `series`, ...). `None` for
    /// saved items.
    pub kind: Option<String>,

    pub poster: PosterView,

    /// Whether the item is in the saved collection.
    pub is_saved: bool,

    /// Character ranges of the title matching the current query.
    ///
    /// Each tuple is `(start, end)` in character indices, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No movies found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,

    /// A few saved items to show below the message. Only populated on the
    /// welcome screen.
    pub preview: Vec<PreviewItem>,
}

/// Compact saved item shown on the welcome screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewItem {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster: PosterView,
}

/// Detail overlay contents.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayView {
    Hidden,

    /// A detail lookup is in flight.
    Loading,

    Detail(Box<DetailView>),
}

/// Fully populated detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub release_date: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub cast: String,
    pub plot: String,

    /// Parsed score, `None` when the remote reported `N/A`.
    pub score: Option<f32>,

    pub poster: PosterView,

    pub is_saved: bool,

    /// Label for the save toggle: `Save`, `Saved`, or `Saved!` right after
    /// saving.
    pub save_label: &'static str,

    /// Video-search link for the trailer.
    pub trailer_url: Option<String>,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}
