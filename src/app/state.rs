//! Engine state and view model computation.
//!
//! This module defines [`AppState`], the single owner of all engine state,
//! and [`EngineState`], the read-only snapshot handed to the presentation
//! layer. All mutation goes through [`handle_event`](crate::app::handle_event);
//! this module only builds, inspects, and projects state.
//!
//! # State Components
//!
//! - **Query**: the text shown in the search bar and the debounce controller
//!   deciding when it becomes a request
//! - **Results**: the last accepted search response
//! - **Overlay**: the detail lookup phase and the record being shown
//! - **Saved collection**: the persisted, ordered set of saved items
//! - **Image faults**: ids whose artwork failed to load
//! - **Request sequencing**: the latest token per request kind
//!
//! # View Model Computation
//!
//! [`EngineState::compute_viewmodel`] turns a snapshot into a
//! [`UIViewModel`]: one card per visible item with poster-or-fallback
//! decided, fuzzy title highlights for the current query, the empty state to
//! show, and the overlay contents.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::AppState;
//! use marquee::storage::{MemoryStorage, SavedCollection, DEFAULT_SLOT_KEY};
//! use marquee::Config;
//!
//! let saved = SavedCollection::load(Box::new(MemoryStorage::new()), DEFAULT_SLOT_KEY);
//! let state = AppState::new(&Config::default(), saved);
//! let viewmodel = state.compute_viewmodel();
//! assert_eq!(viewmodel.empty_state.unwrap().message, "Start exploring movies");
//! ```

use super::images::ImageFaultSet;
use super::modes::{Overlay, SaveFeedback, ViewMode};
use crate::domain::{ItemDetail, Poster, SearchResultItem};
use crate::query::{QueryController, RequestSequencer};
use crate::storage::SavedCollection;
use crate::ui::viewmodel::{
    Card, DetailView, EmptyState, FooterInfo, HeaderInfo, OverlayView, PosterView, PreviewItem,
    SearchBarInfo, UIViewModel,
};
use crate::Config;
use fuzzy_matcher::skim::SkimMatcherV2;
use std::time::Duration;

/// Number of saved items previewed on the welcome screen.
const WELCOME_PREVIEW_LEN: usize = 4;

/// Central engine state container.
///
/// Public fields are the observable engine state. Coordination details
/// (debounce, request tokens, the collection and its storage) are private to
/// the application layer and reachable through accessors.
#[derive(Debug)]
pub struct AppState {
    /// Text currently in the search bar.
    ///
    /// Updated on every keystroke, before any debouncing.
    pub query_text: String,

    /// Results of the last accepted search response.
    pub current_results: Vec<SearchResultItem>,

    /// Record shown in the overlay, if any.
    pub selected_detail: Option<ItemDetail>,

    /// Active screen.
    pub view_mode: ViewMode,

    /// Detail overlay phase.
    pub overlay: Overlay,

    /// Whether the latest search request has not resolved yet.
    pub search_in_flight: bool,

    /// Transient confirmation after saving.
    pub save_feedback: SaveFeedback,

    pub(super) queries: QueryController,
    pub(super) faults: ImageFaultSet,
    pub(super) saved: SavedCollection,
    pub(super) searches: RequestSequencer,
    pub(super) details: RequestSequencer,
    pub(super) feedback_generation: u64,
    pub(super) save_feedback_delay: Duration,
}

impl AppState {
    /// Creates engine state around an already loaded saved collection.
    #[must_use]
    pub fn new(config: &Config, saved: SavedCollection) -> Self {
        Self {
            query_text: String::new(),
            current_results: Vec::new(),
            selected_detail: None,
            view_mode: ViewMode::Search,
            overlay: Overlay::Closed,
            search_in_flight: false,
            save_feedback: SaveFeedback::Idle,
            queries: QueryController::new(config.debounce, config.min_query_len),
            faults: ImageFaultSet::new(),
            saved,
            searches: RequestSequencer::new(),
            details: RequestSequencer::new(),
            feedback_generation: 0,
            save_feedback_delay: config.save_feedback,
        }
    }

    /// The saved collection.
    #[must_use]
    pub const fn saved(&self) -> &SavedCollection {
        &self.saved
    }

    #[must_use]
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.contains(id)
    }

    /// Ids whose artwork failed to load.
    #[must_use]
    pub const fn faults(&self) -> &ImageFaultSet {
        &self.faults
    }

    /// The debounce controller.
    #[must_use]
    pub const fn queries(&self) -> &QueryController {
        &self.queries
    }

    /// Whether the overlay is showing a record.
    #[must_use]
    pub const fn is_modal_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// Whether a detail lookup is pending.
    #[must_use]
    pub const fn is_detail_in_flight(&self) -> bool {
        self.overlay.is_loading()
    }

    /// Copies the observable state into a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> EngineState {
        EngineState {
            query_text: self.query_text.clone(),
            current_results: self.current_results.clone(),
            selected_detail: self.selected_detail.clone(),
            view_mode: self.view_mode,
            overlay: self.overlay,
            search_in_flight: self.search_in_flight,
            save_feedback: self.save_feedback,
            saved: self.saved.all().to_vec(),
            faults: self.faults.clone(),
            min_query_len: self.queries.min_len(),
        }
    }

    /// Computes a renderable view model of the current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        self.snapshot().compute_viewmodel()
    }
}

/// Read-only snapshot of the engine, published after every handled event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub query_text: String,
    pub current_results: Vec<SearchResultItem>,
    pub selected_detail: Option<ItemDetail>,
    pub view_mode: ViewMode,
    pub overlay: Overlay,
    pub search_in_flight: bool,
    pub save_feedback: SaveFeedback,

    /// Saved items in insertion order.
    pub saved: Vec<ItemDetail>,

    pub faults: ImageFaultSet,

    /// Query length at which an empty result list means "nothing found".
    pub min_query_len: usize,
}

impl EngineState {
    #[must_use]
    pub const fn is_modal_open(&self) -> bool {
        self.overlay.is_open()
    }

    #[must_use]
    pub const fn is_detail_in_flight(&self) -> bool {
        self.overlay.is_loading()
    }

    #[must_use]
    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.iter().any(|item| item.id == id)
    }

    /// Computes a renderable UI view model from this snapshot.
    ///
    /// # Example
    ///
    /// ```rust
    /// use marquee::app::{EngineState, ViewMode};
    ///
    /// let state = EngineState {
    ///     view_mode: ViewMode::SavedCollection,
    ///     ..EngineState::default()
    /// };
    /// let vm = state.compute_viewmodel();
    /// assert_eq!(vm.empty_state.unwrap().message, "No movies saved yet");
    /// ```
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel",
            view_mode = ?self.view_mode,
            results = self.current_results.len(),
            saved = self.saved.len()
        )
        .entered();

        let cards: Vec<Card> = match self.view_mode {
            ViewMode::Search => {
                let matcher = (!self.query_text.is_empty()).then(SkimMatcherV2::default);
                self.current_results
                    .iter()
                    .map(|item| self.search_card(item, matcher.as_ref()))
                    .collect()
            }
            ViewMode::SavedCollection => self.saved.iter().map(|item| self.saved_card(item)).collect(),
        };

        UIViewModel {
            header: self.compute_header(),
            search_bar: SearchBarInfo {
                query: self.query_text.clone(),
                searching: self.search_in_flight,
            },
            empty_state: if cards.is_empty() { self.compute_empty_state() } else { None },
            cards,
            overlay: self.compute_overlay(),
            footer: self.compute_footer(),
        }
    }

    fn search_card(&self, item: &SearchResultItem, matcher: Option<&SkimMatcherV2>) -> Card {
        Card {
            id: item.id.clone(),
            title: item.title.clone(),
            year: item.year.clone(),
            kind: Some(item.kind.clone()),
            poster: self.poster_view(&item.id, &item.poster, &item.title),
            is_saved: self.is_saved(&item.id),
            highlight_ranges: matcher.map_or_else(Vec::new, |m| {
                compute_highlight_ranges(&item.title, &self.query_text, m)
            }),
        }
    }

    fn saved_card(&self, item: &ItemDetail) -> Card {
        Card {
            id: item.id.clone(),
            title: item.title.clone(),
            year: item.year.clone(),
            kind: None,
            poster: self.poster_view(&item.id, &item.poster, &item.title),
            is_saved: true,
            highlight_ranges: Vec::new(),
        }
    }

    /// Chooses between the artwork and a text fallback.
    ///
    /// Falls back when the remote had no artwork or a previous load of it
    /// failed.
    fn poster_view(&self, id: &str, poster: &Poster, title: &str) -> PosterView {
        match poster.url() {
            Some(url) if !self.faults.is_faulted(id) => PosterView::Image(url.to_string()),
            _ => PosterView::Fallback {
                title: title.to_string(),
            },
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let title = match self.view_mode {
            ViewMode::Search => format!(" Search ({}) ", self.current_results.len()),
            ViewMode::SavedCollection => format!(" Your Saved Movies ({}) ", self.saved.len()),
        };
        HeaderInfo {
            title,
            view_mode: self.view_mode,
            saved_count: self.saved.len(),
            saved_button_enabled: !self.saved.is_empty(),
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        match self.view_mode {
            ViewMode::SavedCollection => Some(EmptyState {
                message: "No movies saved yet".to_string(),
                subtitle: "Search for movies and save them to add them here".to_string(),
                preview: Vec::new(),
            }),
            ViewMode::Search if self.search_in_flight => None,
            ViewMode::Search if self.query_text.is_empty() => Some(EmptyState {
                message: "Start exploring movies".to_string(),
                subtitle: "Type in the search bar to find your favorite films".to_string(),
                preview: self
                    .saved
                    .iter()
                    .take(WELCOME_PREVIEW_LEN)
                    .map(|item| PreviewItem {
                        id: item.id.clone(),
                        title: item.title.clone(),
                        year: item.year.clone(),
                        poster: self.poster_view(&item.id, &item.poster, &item.title),
                    })
                    .collect(),
            }),
            ViewMode::Search if self.query_text.chars().count() >= self.min_query_len => Some(EmptyState {
                message: "No movies found".to_string(),
                subtitle: "Try a different search term".to_string(),
                preview: Vec::new(),
            }),
            ViewMode::Search => None,
        }
    }

    fn compute_overlay(&self) -> OverlayView {
        match (self.overlay, &self.selected_detail) {
            (Overlay::LoadingDetail, _) => OverlayView::Loading,
            (Overlay::ShowingDetail, Some(detail)) => OverlayView::Detail(Box::new(self.detail_view(detail))),
            _ => OverlayView::Hidden,
        }
    }

    fn detail_view(&self, detail: &ItemDetail) -> DetailView {
        let is_saved = self.is_saved(&detail.id);
        let save_label = match (is_saved, self.save_feedback) {
            (true, SaveFeedback::JustSaved) => "Saved!",
            (true, SaveFeedback::Idle) => "Saved",
            (false, _) => "Save",
        };

        DetailView {
            id: detail.id.clone(),
            title: detail.title.clone(),
            year: detail.year.clone(),
            rating: detail.rating.clone(),
            release_date: detail.release_date.clone(),
            runtime: detail.runtime.clone(),
            genre: detail.genre.clone(),
            director: detail.director.clone(),
            writer: detail.writer.clone(),
            cast: detail.cast.clone(),
            plot: detail.plot.clone(),
            score: detail.numeric_score(),
            poster: self.poster_view(&detail.id, &detail.poster, &detail.title),
            is_saved,
            save_label,
            trailer_url: detail.trailer_url(),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.overlay, self.view_mode) {
            (Overlay::ShowingDetail, _) => "save: toggle saved  trailer: show link  close: close detail  quit",
            (Overlay::LoadingDetail, _) => "close: cancel  quit",
            (Overlay::Closed, ViewMode::Search) => {
                "type <text>: search as you type  search <text>: search now  open <n>: details  saved: collection  quit"
            }
            (Overlay::Closed, ViewMode::SavedCollection) => "open <n>: details  back: return to search  quit",
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

/// Computes character index ranges of `text` matched by `query`.
///
/// Consecutive match indices are coalesced into `(start, end)` ranges with an
/// exclusive end. Returns an empty vector when the query does not match.
fn compute_highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    use fuzzy_matcher::FuzzyMatcher;

    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(id: &str, title: &str, poster: &str) -> ItemDetail {
        serde_json::from_value(serde_json::json!({
            "imdbID": id,
            "Title": title,
            "Year": "2008",
            "Poster": poster,
            "imdbRating": "9.0",
        }))
        .unwrap()
    }

    fn result(id: &str, title: &str, poster: &str) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            title: title.to_string(),
            year: "2008".to_string(),
            kind: "movie".to_string(),
            poster: Poster::from(poster.to_string()),
        }
    }

    fn snapshot() -> EngineState {
        EngineState {
            min_query_len: 3,
            ..EngineState::default()
        }
    }

    #[test]
    fn highlight_ranges_coalesce_consecutive_matches() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(compute_highlight_ranges("Batman", "bat", &matcher), vec![(0, 3)]);
        assert!(compute_highlight_ranges("Batman", "xyz", &matcher).is_empty());
    }

    #[test]
    fn poster_falls_back_when_unavailable_or_faulted() {
        let mut state = snapshot();
        state.query_text = "bat".to_string();
        state.current_results = vec![
            result("tt1", "Batman", "https://img/1.jpg"),
            result("tt2", "Batman Returns", "N/A"),
            result("tt3", "Batman Begins", "https://img/3.jpg"),
        ];
        state.faults.mark_faulted("tt3");

        let vm = state.compute_viewmodel();
        assert_eq!(vm.cards[0].poster, PosterView::Image("https://img/1.jpg".to_string()));
        assert_eq!(
            vm.cards[1].poster,
            PosterView::Fallback {
                title: "Batman Returns".to_string()
            }
        );
        assert!(matches!(vm.cards[2].poster, PosterView::Fallback { .. }));
        assert_eq!(vm.cards[0].highlight_ranges, vec![(0, 3)]);
        assert!(vm.empty_state.is_none());
    }

    #[test]
    fn empty_states_follow_query_and_loading() {
        let mut state = snapshot();
        state.saved = (1..=6)
            .map(|n| detail(&format!("tt{n}"), &format!("Movie {n}"), "N/A"))
            .collect();

        let welcome = state.compute_viewmodel().empty_state.unwrap();
        assert_eq!(welcome.message, "Start exploring movies");
        assert_eq!(welcome.preview.len(), 4);
        assert_eq!(welcome.preview[0].id, "tt1");

        state.query_text = "ba".to_string();
        assert!(state.compute_viewmodel().empty_state.is_none());

        state.query_text = "bat".to_string();
        state.search_in_flight = true;
        assert!(state.compute_viewmodel().empty_state.is_none());
        assert!(state.compute_viewmodel().search_bar.searching);

        state.search_in_flight = false;
        assert_eq!(state.compute_viewmodel().empty_state.unwrap().message, "No movies found");
    }

    #[test]
    fn header_reflects_saved_collection() {
        let mut state = snapshot();
        assert!(!state.compute_viewmodel().header.saved_button_enabled);

        state.saved = vec![detail("tt1", "Heat", "N/A")];
        state.view_mode = ViewMode::SavedCollection;
        let vm = state.compute_viewmodel();
        assert!(vm.header.saved_button_enabled);
        assert_eq!(vm.header.saved_count, 1);
        assert_eq!(vm.header.title, " Your Saved Movies (1) ");
        assert_eq!(vm.cards.len(), 1);
        assert!(vm.cards[0].is_saved);
        assert_eq!(vm.cards[0].kind, None);
    }

    #[test]
    fn overlay_detail_shows_save_label_and_trailer() {
        let mut state = snapshot();
        let heat = detail("tt1", "Heat", "https://img/heat.jpg");
        state.selected_detail = Some(heat.clone());
        state.overlay = Overlay::ShowingDetail;

        let OverlayView::Detail(view) = state.compute_viewmodel().overlay else {
            panic!("expected detail overlay");
        };
        assert_eq!(view.save_label, "Save");
        assert_eq!(view.score, Some(9.0));
        assert!(view.trailer_url.unwrap().contains("Heat+2008+official+trailer"));

        state.saved.push(heat);
        state.save_feedback = SaveFeedback::JustSaved;
        let OverlayView::Detail(view) = state.compute_viewmodel().overlay else {
            panic!("expected detail overlay");
        };
        assert_eq!(view.save_label, "Saved!");

        state.save_feedback = SaveFeedback::Idle;
        state.faults.mark_faulted("tt1");
        let OverlayView::Detail(view) = state.compute_viewmodel().overlay else {
            panic!("expected detail overlay");
        };
        assert_eq!(view.save_label, "Saved");
        assert!(matches!(view.poster, PosterView::Fallback { .. }));
    }

    #[test]
    fn loading_overlay_hides_detail() {
        let mut state = snapshot();
        state.overlay = Overlay::LoadingDetail;
        assert_eq!(state.compute_viewmodel().overlay, OverlayView::Loading);
        assert!(state.is_detail_in_flight());
        assert!(!state.is_modal_open());
    }
}
