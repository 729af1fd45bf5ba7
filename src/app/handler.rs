//! Event handling and state transition logic.
//!
//! This module implements the reducer that processes user actions, timer
//! expiries, and network completions, translating them into state changes and
//! action sequences. It never sleeps or performs I/O other than persisting
//! the saved collection; everything asynchronous is requested through
//! [`Action`]s and reported back as [`Event`]s.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the presentation layer, timers, or the network
//! 2. [`handle_event`] pattern-matches the event type
//! 3. `AppState` fields are mutated in place
//! 4. Actions are collected and returned for the runtime to execute
//!
//! # Event Types
//!
//! - **User**: `Input`, `SubmitSearch`, `SelectItem`, `CloseOverlay`,
//!   `ViewSavedCollection`, `BackToSearch`, `ToggleSave`, `ImageFailed`,
//!   `DetailImageFailed`, `Shutdown`
//! - **Timers**: `DebounceElapsed`, `FeedbackExpired`
//! - **Network**: `SearchResolved`, `DetailResolved`
//!
//! Timer and network events carry the generation or token they were issued
//! with; anything that no longer matches the latest one is dropped.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::{handle_event, Action, AppState, Event};
//! use marquee::storage::{MemoryStorage, SavedCollection, DEFAULT_SLOT_KEY};
//! use marquee::Config;
//!
//! let saved = SavedCollection::load(Box::new(MemoryStorage::new()), DEFAULT_SLOT_KEY);
//! let mut state = AppState::new(&Config::default(), saved);
//!
//! let (render, actions) = handle_event(&mut state, Event::Input("bat".to_string()));
//! assert!(render);
//! assert!(matches!(actions[0], Action::ArmDebounce { .. }));
//! ```

use super::modes::{Overlay, SaveFeedback, ViewMode};
use crate::app::{Action, AppState};
use crate::domain::{ApiError, ItemDetail, SearchResultItem};
use crate::query::{InputOutcome, RequestToken};
use crate::storage::Toggled;

/// Events triggered by user actions, timers, or network completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Search bar text changed.
    Input(String),

    /// Explicit search request, bypassing the debounce.
    SubmitSearch(String),

    /// The debounce timer armed with `generation` fired.
    DebounceElapsed { generation: u64 },

    /// A search request finished.
    SearchResolved {
        token: RequestToken,
        outcome: Result<Vec<SearchResultItem>, ApiError>,
    },

    /// Open the detail overlay for an item id.
    SelectItem(String),

    /// A detail lookup finished.
    DetailResolved {
        token: RequestToken,
        outcome: Result<ItemDetail, ApiError>,
    },

    CloseOverlay,

    ViewSavedCollection,

    BackToSearch,

    /// Save the item, or remove it if already saved.
    ToggleSave(ItemDetail),

    /// Artwork for the item with this id failed to load.
    ImageFailed(String),

    /// Artwork in the open detail overlay failed to load.
    DetailImageFailed,

    /// The save feedback timer armed with `generation` fired.
    FeedbackExpired { generation: u64 },

    /// Stop timers and the event loop.
    Shutdown,
}

/// Processes an event, mutates engine state, and returns actions to execute.
///
/// # Returns
///
/// A tuple of whether the observable state changed (and a new snapshot
/// should be published) and the actions to execute in order.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event type.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: Event) -> (bool, Vec<Action>) {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(&event)).entered();

    match event {
        Event::Input(text) => {
            let outcome = state.queries.on_input(&text);
            state.query_text = text;

            match outcome {
                InputOutcome::Cleared => {
                    tracing::debug!("query below minimum length, clearing results");
                    state.current_results.clear();
                    state.searches.invalidate();
                    state.search_in_flight = false;
                    (true, vec![Action::CancelDebounce])
                }
                InputOutcome::Armed { generation, delay } => {
                    (true, vec![Action::ArmDebounce { generation, delay }])
                }
            }
        }

        Event::SubmitSearch(text) => {
            if !state.queries.meets_minimum(&text) {
                tracing::debug!(query_len = text.chars().count(), "submitted query too short, ignoring");
                return (false, vec![]);
            }

            state.queries.cancel();
            state.queries.set_pending(&text);
            state.view_mode = ViewMode::Search;
            let search = start_search(state, text.clone());
            state.query_text = text;
            (true, vec![Action::CancelDebounce, search])
        }

        Event::DebounceElapsed { generation } => match state.queries.expire(generation) {
            Some(term) => {
                let search = start_search(state, term);
                (true, vec![search])
            }
            None => (false, vec![]),
        },

        Event::SearchResolved { token, outcome } => {
            if !state.searches.complete(token) {
                tracing::debug!(token = %token, "discarding stale search response");
                return (false, vec![]);
            }

            state.search_in_flight = false;
            match outcome {
                Ok(items) => {
                    tracing::debug!(token = %token, count = items.len(), "search results accepted");
                    state.faults.reset();
                    state.current_results = items;
                }
                Err(ApiError::NotFound) => {
                    tracing::debug!(token = %token, "search matched nothing");
                    state.current_results.clear();
                }
                Err(ApiError::Transport(detail)) => {
                    tracing::warn!(token = %token, error = %detail, "search failed");
                    state.current_results.clear();
                }
            }
            (true, vec![])
        }

        Event::SelectItem(id) => {
            let token = state.details.issue();
            tracing::debug!(token = %token, id = %id, "requesting detail");

            state.overlay = Overlay::LoadingDetail;
            state.selected_detail = None;
            let mut actions = clear_feedback(state);
            actions.push(Action::FetchDetail { token, id });
            (true, actions)
        }

        Event::DetailResolved { token, outcome } => {
            if !state.details.complete(token) || !state.overlay.is_loading() {
                tracing::debug!(token = %token, overlay = ?state.overlay, "discarding stale detail response");
                return (false, vec![]);
            }

            match outcome {
                Ok(detail) => {
                    tracing::debug!(token = %token, id = %detail.id, "detail loaded");
                    state.selected_detail = Some(detail);
                    state.overlay = Overlay::ShowingDetail;
                }
                Err(e) => {
                    tracing::warn!(token = %token, error = %e, "detail lookup failed, closing overlay");
                    state.overlay = Overlay::Closed;
                }
            }
            (true, vec![])
        }

        Event::CloseOverlay => {
            state.details.invalidate();
            state.overlay = Overlay::Closed;
            state.selected_detail = None;
            (true, clear_feedback(state))
        }

        Event::ViewSavedCollection => {
            tracing::debug!(saved = state.saved.len(), "showing saved collection");
            state.view_mode = ViewMode::SavedCollection;
            state.query_text.clear();
            state.current_results.clear();
            state.queries.cancel();
            state.queries.set_pending("");
            state.searches.invalidate();
            state.search_in_flight = false;
            (true, vec![Action::CancelDebounce])
        }

        Event::BackToSearch => {
            state.view_mode = ViewMode::Search;
            (true, vec![])
        }

        Event::ToggleSave(item) => match state.saved.toggle(item) {
            Toggled::Saved => {
                state.feedback_generation += 1;
                state.save_feedback = SaveFeedback::JustSaved;
                (
                    true,
                    vec![Action::ArmFeedbackReset {
                        generation: state.feedback_generation,
                        delay: state.save_feedback_delay,
                    }],
                )
            }
            Toggled::Removed => (true, clear_feedback(state)),
        },

        Event::ImageFailed(id) => {
            let newly = state.faults.mark_faulted(id);
            (newly, vec![])
        }

        Event::DetailImageFailed => match state.selected_detail.as_ref() {
            Some(detail) => {
                let newly = state.faults.mark_faulted(detail.id.clone());
                (newly, vec![])
            }
            None => (false, vec![]),
        },

        Event::FeedbackExpired { generation } => {
            if generation != state.feedback_generation || state.save_feedback == SaveFeedback::Idle {
                return (false, vec![]);
            }
            state.save_feedback = SaveFeedback::Idle;
            (true, vec![])
        }

        Event::Shutdown => {
            tracing::debug!("shutting down engine");
            state.queries.cancel();
            state.searches.invalidate();
            state.details.invalidate();
            state.search_in_flight = false;
            (
                false,
                vec![Action::CancelDebounce, Action::CancelFeedbackReset, Action::Shutdown],
            )
        }
    }
}

fn start_search(state: &mut AppState, term: String) -> Action {
    let token = state.searches.issue();
    tracing::debug!(token = %token, term = %term, "issuing search");
    state.search_in_flight = true;
    Action::Search { token, term }
}

/// Drops any "just saved" feedback and supersedes its timer.
fn clear_feedback(state: &mut AppState) -> Vec<Action> {
    state.feedback_generation += 1;
    if state.save_feedback == SaveFeedback::JustSaved {
        state.save_feedback = SaveFeedback::Idle;
        vec![Action::CancelFeedbackReset]
    } else {
        vec![]
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Input(_) => "input",
        Event::SubmitSearch(_) => "submit_search",
        Event::DebounceElapsed { .. } => "debounce_elapsed",
        Event::SearchResolved { .. } => "search_resolved",
        Event::SelectItem(_) => "select_item",
        Event::DetailResolved { .. } => "detail_resolved",
        Event::CloseOverlay => "close_overlay",
        Event::ViewSavedCollection => "view_saved_collection",
        Event::BackToSearch => "back_to_search",
        Event::ToggleSave(_) => "toggle_save",
        Event::ImageFailed(_) => "image_failed",
        Event::DetailImageFailed => "detail_image_failed",
        Event::FeedbackExpired { .. } => "feedback_expired",
        Event::Shutdown => "shutdown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Poster;
    use crate::storage::{MemoryStorage, SavedCollection, DEFAULT_SLOT_KEY};
    use crate::Config;

    fn state() -> AppState {
        let saved = SavedCollection::load(Box::new(MemoryStorage::new()), DEFAULT_SLOT_KEY);
        AppState::new(&Config::default(), saved)
    }

    fn detail(id: &str) -> ItemDetail {
        serde_json::from_value(serde_json::json!({ "imdbID": id, "Title": "Heat", "Year": "1995" })).unwrap()
    }

    fn result(id: &str) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            title: format!("Title {id}"),
            year: "2000".to_string(),
            kind: "movie".to_string(),
            poster: Poster::Unavailable,
        }
    }

    fn armed_generation(actions: &[Action]) -> u64 {
        actions
            .iter()
            .find_map(|a| match a {
                Action::ArmDebounce { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("debounce armed")
    }

    fn search_of(actions: &[Action]) -> (RequestToken, String) {
        actions
            .iter()
            .find_map(|a| match a {
                Action::Search { token, term } => Some((*token, term.clone())),
                _ => None,
            })
            .expect("search issued")
    }

    fn fetch_of(actions: &[Action]) -> RequestToken {
        actions
            .iter()
            .find_map(|a| match a {
                Action::FetchDetail { token, .. } => Some(*token),
                _ => None,
            })
            .expect("detail fetch issued")
    }

    #[test]
    fn short_input_clears_results_without_searching() {
        let mut state = state();
        state.current_results = vec![result("tt1")];

        let (render, actions) = handle_event(&mut state, Event::Input("ba".to_string()));

        assert!(render);
        assert_eq!(actions, vec![Action::CancelDebounce]);
        assert!(state.current_results.is_empty());
        assert_eq!(state.query_text, "ba");
        assert!(!state.search_in_flight);
    }

    #[test]
    fn only_latest_debounce_generation_searches() {
        let mut state = state();
        let first = armed_generation(&handle_event(&mut state, Event::Input("bat".to_string())).1);
        let second = armed_generation(&handle_event(&mut state, Event::Input("batm".to_string())).1);
        let last = armed_generation(&handle_event(&mut state, Event::Input("batma".to_string())).1);

        for stale in [first, second] {
            let (render, actions) = handle_event(&mut state, Event::DebounceElapsed { generation: stale });
            assert!(!render);
            assert!(actions.is_empty());
        }

        let (_, actions) = handle_event(&mut state, Event::DebounceElapsed { generation: last });
        assert_eq!(search_of(&actions).1, "batma");
        assert!(state.search_in_flight);
    }

    #[test]
    fn short_input_disarms_pending_debounce() {
        let mut state = state();
        let generation = armed_generation(&handle_event(&mut state, Event::Input("bat".to_string())).1);
        handle_event(&mut state, Event::Input("b".to_string()));

        let (_, actions) = handle_event(&mut state, Event::DebounceElapsed { generation });
        assert!(actions.is_empty());
    }

    #[test]
    fn stale_search_response_is_discarded() {
        let mut state = state();
        let (old, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("batman".to_string())).1);
        let (new, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("superman".to_string())).1);

        let (render, _) = handle_event(
            &mut state,
            Event::SearchResolved {
                token: old,
                outcome: Ok(vec![result("tt-old")]),
            },
        );
        assert!(!render);
        assert!(state.current_results.is_empty());
        assert!(state.search_in_flight);

        handle_event(
            &mut state,
            Event::SearchResolved {
                token: new,
                outcome: Ok(vec![result("tt-new")]),
            },
        );
        assert_eq!(state.current_results, vec![result("tt-new")]);
        assert!(!state.search_in_flight);
    }

    #[test]
    fn not_found_yields_empty_results() {
        let mut state = state();
        state.current_results = vec![result("tt1")];
        let (token, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("bat".to_string())).1);

        handle_event(
            &mut state,
            Event::SearchResolved {
                token,
                outcome: Err(ApiError::NotFound),
            },
        );
        assert!(state.current_results.is_empty());
        assert!(!state.search_in_flight);
    }

    #[test]
    fn submit_below_minimum_is_ignored() {
        let mut state = state();
        let (render, actions) = handle_event(&mut state, Event::SubmitSearch("ab".to_string()));
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.query_text.is_empty());
    }

    #[test]
    fn submit_switches_to_search_view() {
        let mut state = state();
        state.view_mode = ViewMode::SavedCollection;
        let (_, actions) = handle_event(&mut state, Event::SubmitSearch("alien".to_string()));
        assert_eq!(actions[0], Action::CancelDebounce);
        assert_eq!(search_of(&actions).1, "alien");
        assert_eq!(state.view_mode, ViewMode::Search);
        assert_eq!(state.query_text, "alien");
    }

    #[test]
    fn faults_reset_only_on_successful_search() {
        let mut state = state();
        handle_event(&mut state, Event::ImageFailed("tt1".to_string()));

        let (token, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("bat".to_string())).1);
        handle_event(
            &mut state,
            Event::SearchResolved {
                token,
                outcome: Err(ApiError::Transport("offline".to_string())),
            },
        );
        assert!(state.faults.is_faulted("tt1"));

        let (token, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("bat".to_string())).1);
        handle_event(
            &mut state,
            Event::SearchResolved {
                token,
                outcome: Ok(vec![result("tt1")]),
            },
        );
        assert!(!state.faults.is_faulted("tt1"));
    }

    #[test]
    fn detail_failure_closes_overlay() {
        let mut state = state();
        let token = fetch_of(&handle_event(&mut state, Event::SelectItem("tt1".to_string())).1);
        assert!(state.is_detail_in_flight());

        handle_event(
            &mut state,
            Event::DetailResolved {
                token,
                outcome: Err(ApiError::Transport("connection refused".to_string())),
            },
        );
        assert_eq!(state.overlay, Overlay::Closed);
        assert!(state.selected_detail.is_none());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLog {
        fn record<R>(&self, f: impl FnOnce() -> R) -> R {
            let writer = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || writer.clone())
                .with_ansi(false)
                .finish();
            tracing::subscriber::with_default(subscriber, f)
        }

        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn detail_transport_error_is_logged_as_warning() {
        let log = CapturedLog::default();
        let mut state = state();
        let token = fetch_of(&handle_event(&mut state, Event::SelectItem("tt1".to_string())).1);

        log.record(|| {
            handle_event(
                &mut state,
                Event::DetailResolved {
                    token,
                    outcome: Err(ApiError::Transport("connection refused".to_string())),
                },
            )
        });

        let output = log.contents();
        assert!(output.contains("WARN"), "log: {output}");
        assert!(output.contains("detail lookup failed"), "log: {output}");
        assert!(output.contains("connection refused"), "log: {output}");
        assert_eq!(state.overlay, Overlay::Closed);
    }

    #[test]
    fn search_transport_error_is_logged_as_warning() {
        let log = CapturedLog::default();
        let mut state = state();
        let (token, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("heat".to_string())).1);

        log.record(|| {
            handle_event(
                &mut state,
                Event::SearchResolved {
                    token,
                    outcome: Err(ApiError::Transport("timed out".to_string())),
                },
            )
        });

        let output = log.contents();
        assert!(output.contains("WARN"), "log: {output}");
        assert!(output.contains("search failed"), "log: {output}");
        assert!(output.contains("timed out"), "log: {output}");
        assert!(state.current_results.is_empty());
        assert!(!state.search_in_flight);
    }

    #[test]
    fn not_found_is_not_logged_as_warning() {
        let log = CapturedLog::default();
        let mut state = state();
        let (token, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("bat".to_string())).1);

        log.record(|| {
            handle_event(
                &mut state,
                Event::SearchResolved {
                    token,
                    outcome: Err(ApiError::NotFound),
                },
            )
        });

        assert!(!log.contents().contains("WARN"));
    }

    #[test]
    fn detail_success_opens_overlay() {
        let mut state = state();
        let token = fetch_of(&handle_event(&mut state, Event::SelectItem("tt1".to_string())).1);
        handle_event(
            &mut state,
            Event::DetailResolved {
                token,
                outcome: Ok(detail("tt1")),
            },
        );
        assert!(state.is_modal_open());
        assert_eq!(state.selected_detail.as_ref().map(|d| d.id.as_str()), Some("tt1"));
    }

    #[test]
    fn closing_overlay_ignores_late_detail() {
        let mut state = state();
        let token = fetch_of(&handle_event(&mut state, Event::SelectItem("tt1".to_string())).1);
        handle_event(&mut state, Event::CloseOverlay);

        let (render, _) = handle_event(
            &mut state,
            Event::DetailResolved {
                token,
                outcome: Ok(detail("tt1")),
            },
        );
        assert!(!render);
        assert_eq!(state.overlay, Overlay::Closed);
        assert!(state.selected_detail.is_none());
    }

    #[test]
    fn reselecting_discards_previous_detail() {
        let mut state = state();
        let first = fetch_of(&handle_event(&mut state, Event::SelectItem("tt1".to_string())).1);
        let second = fetch_of(&handle_event(&mut state, Event::SelectItem("tt2".to_string())).1);

        let (render, _) = handle_event(
            &mut state,
            Event::DetailResolved {
                token: first,
                outcome: Ok(detail("tt1")),
            },
        );
        assert!(!render);
        assert!(state.is_detail_in_flight());

        handle_event(
            &mut state,
            Event::DetailResolved {
                token: second,
                outcome: Ok(detail("tt2")),
            },
        );
        assert_eq!(state.selected_detail.as_ref().map(|d| d.id.as_str()), Some("tt2"));
    }

    #[test]
    fn view_saved_clears_query_and_invalidates_search() {
        let mut state = state();
        let (token, _) = search_of(&handle_event(&mut state, Event::SubmitSearch("batman".to_string())).1);
        state.current_results = vec![result("tt1")];

        let (_, actions) = handle_event(&mut state, Event::ViewSavedCollection);
        assert_eq!(actions, vec![Action::CancelDebounce]);
        assert_eq!(state.view_mode, ViewMode::SavedCollection);
        assert!(state.query_text.is_empty());
        assert!(state.current_results.is_empty());
        assert!(!state.search_in_flight);

        let (render, _) = handle_event(
            &mut state,
            Event::SearchResolved {
                token,
                outcome: Ok(vec![result("tt9")]),
            },
        );
        assert!(!render);
        assert!(state.current_results.is_empty());

        handle_event(&mut state, Event::BackToSearch);
        assert_eq!(state.view_mode, ViewMode::Search);
        assert!(state.current_results.is_empty());
    }

    #[test]
    fn save_feedback_resets_on_matching_generation() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, Event::ToggleSave(detail("tt1")));
        let Some(Action::ArmFeedbackReset { generation, .. }) = actions.first().cloned() else {
            panic!("expected feedback timer, got {actions:?}");
        };
        assert_eq!(state.save_feedback, SaveFeedback::JustSaved);
        assert!(state.is_saved("tt1"));

        let (render, _) = handle_event(&mut state, Event::FeedbackExpired { generation: generation - 1 });
        assert!(!render);
        assert_eq!(state.save_feedback, SaveFeedback::JustSaved);

        let (render, _) = handle_event(&mut state, Event::FeedbackExpired { generation });
        assert!(render);
        assert_eq!(state.save_feedback, SaveFeedback::Idle);
    }

    #[test]
    fn unsaving_clears_feedback_immediately() {
        let mut state = state();
        handle_event(&mut state, Event::ToggleSave(detail("tt1")));
        let (_, actions) = handle_event(&mut state, Event::ToggleSave(detail("tt1")));

        assert_eq!(actions, vec![Action::CancelFeedbackReset]);
        assert_eq!(state.save_feedback, SaveFeedback::Idle);
        assert!(!state.is_saved("tt1"));
    }

    #[test]
    fn detail_image_failure_marks_open_item() {
        let mut state = state();
        let (render, _) = handle_event(&mut state, Event::DetailImageFailed);
        assert!(!render);

        state.selected_detail = Some(detail("tt7"));
        state.overlay = Overlay::ShowingDetail;
        let (render, _) = handle_event(&mut state, Event::DetailImageFailed);
        assert!(render);
        assert!(state.faults.is_faulted("tt7"));

        let (render, _) = handle_event(&mut state, Event::ImageFailed("tt7".to_string()));
        assert!(!render);
    }

    #[test]
    fn shutdown_cancels_timers() {
        let mut state = state();
        handle_event(&mut state, Event::Input("heat".to_string()));
        let (render, actions) = handle_event(&mut state, Event::Shutdown);
        assert!(!render);
        assert_eq!(
            actions,
            vec![Action::CancelDebounce, Action::CancelFeedbackReset, Action::Shutdown]
        );
        assert!(!state.queries.is_armed());
    }
}
