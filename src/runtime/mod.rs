//! Async event loop executing engine actions.
//!
//! [`Runtime`] owns the [`AppState`] and is the only place it is mutated.
//! Events arrive on one unbounded channel from three sources: the
//! presentation layer (through an [`EngineHandle`]), timer tasks, and network
//! tasks. Each event is handled to completion by
//! [`handle_event`](crate::app::handle_event) before the next is received,
//! and the resulting [`Action`]s are turned into spawned tokio tasks that
//! post their completion back as events.
//!
//! ```text
//! EngineHandle ──┐
//! timer tasks ───┼──▶ mpsc ──▶ handle_event ──▶ actions ──▶ spawned tasks
//! fetch tasks ───┘                  │
//!                                   └──▶ watch::Sender<EngineState>
//! ```
//!
//! The loop ends on [`EngineHandle::shutdown`], or once every handle and
//! every in-flight task has dropped its sender. Armed timers are aborted on
//! supersession, shutdown, and drop.
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee::api::OmdbClient;
//! use marquee::runtime::Runtime;
//! use marquee::{initialize, Config};
//!
//! # async fn demo() -> marquee::Result<()> {
//! let config = Config { api_key: "secret".to_string(), ..Config::default() };
//! let api = OmdbClient::new(&config)?;
//! let (runtime, handle) = Runtime::new(initialize(&config), api);
//! let engine = tokio::spawn(runtime.run());
//!
//! handle.on_input("alien")?;
//! handle.shutdown()?;
//! let _ = engine.await;
//! # Ok(())
//! # }
//! ```

use crate::api::MetadataApi;
use crate::app::{handle_event, Action, AppState, EngineState, Event};
use crate::domain::error::{MarqueeError, Result};
use crate::domain::ItemDetail;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owner of the engine state and its side effects.
pub struct Runtime<A: MetadataApi> {
    state: AppState,
    api: Arc<A>,
    events_tx: WeakUnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    snapshots: watch::Sender<EngineState>,
    debounce_timer: Option<JoinHandle<()>>,
    feedback_timer: Option<JoinHandle<()>>,
}

impl<A: MetadataApi> Runtime<A> {
    /// Creates a runtime and the first handle for dispatching into it.
    ///
    /// Nothing runs until [`run`](Self::run) is awaited.
    #[must_use]
    pub fn new(state: AppState, api: A) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(state.snapshot());

        let runtime = Self {
            state,
            api: Arc::new(api),
            events_tx: tx.downgrade(),
            events_rx: rx,
            snapshots,
            debounce_timer: None,
            feedback_timer: None,
        };
        let handle = EngineHandle {
            events: tx,
            snapshots: snapshot_rx,
        };
        (runtime, handle)
    }

    /// Returns a receiver of state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.snapshots.subscribe()
    }

    /// Processes events until shutdown or until every sender is gone.
    pub async fn run(mut self) {
        tracing::debug!("engine loop started");
        while let Some(event) = self.events_rx.recv().await {
            if !self.dispatch(event) {
                break;
            }
        }
        self.cancel_timers();
        tracing::debug!("engine loop stopped");
    }

    /// Handles one event and executes its actions.
    ///
    /// Publishes a snapshot if the state changed. Returns `false` once the
    /// engine has been shut down. Must be called within a tokio runtime.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let (render, actions) = handle_event(&mut self.state, event);

        let mut keep_running = true;
        for action in actions {
            keep_running &= self.execute(action);
        }

        if render {
            self.snapshots.send_replace(self.state.snapshot());
        }
        keep_running
    }

    fn execute(&mut self, action: Action) -> bool {
        tracing::trace!(action = ?action, "executing action");
        match action {
            Action::ArmDebounce { generation, delay } => {
                abort(&mut self.debounce_timer);
                self.debounce_timer = self.schedule(delay, Event::DebounceElapsed { generation });
            }
            Action::CancelDebounce => abort(&mut self.debounce_timer),
            Action::Search { token, term } => {
                let api = Arc::clone(&self.api);
                self.spawn_request(async move {
                    let outcome = api.search(&term).await;
                    Event::SearchResolved { token, outcome }
                });
            }
            Action::FetchDetail { token, id } => {
                let api = Arc::clone(&self.api);
                self.spawn_request(async move {
                    let outcome = api.fetch_detail(&id).await;
                    Event::DetailResolved { token, outcome }
                });
            }
            Action::ArmFeedbackReset { generation, delay } => {
                abort(&mut self.feedback_timer);
                self.feedback_timer = self.schedule(delay, Event::FeedbackExpired { generation });
            }
            Action::CancelFeedbackReset => abort(&mut self.feedback_timer),
            Action::Shutdown => {
                self.cancel_timers();
                return false;
            }
        }
        true
    }

    /// Posts `event` after `delay`. Returns `None` if the loop is already
    /// unreachable.
    fn schedule(&self, delay: Duration, event: Event) -> Option<JoinHandle<()>> {
        let tx = self.events_tx.upgrade()?;
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        }))
    }

    /// Runs a request to completion and posts its result. Request tasks are
    /// never aborted; stale results are discarded by token.
    fn spawn_request<F>(&self, request: F)
    where
        F: std::future::Future<Output = Event> + Send + 'static,
    {
        let Some(tx) = self.events_tx.upgrade() else {
            return;
        };
        tokio::spawn(async move {
            let _ = tx.send(request.await);
        });
    }

    fn cancel_timers(&mut self) {
        abort(&mut self.debounce_timer);
        abort(&mut self.feedback_timer);
    }
}

impl<A: MetadataApi> Drop for Runtime<A> {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

impl<A: MetadataApi> std::fmt::Debug for Runtime<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("state", &self.state)
            .field("debounce_armed", &self.debounce_timer.is_some())
            .field("feedback_armed", &self.feedback_timer.is_some())
            .finish_non_exhaustive()
    }
}

fn abort(timer: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = timer.take() {
        handle.abort();
    }
}

/// Cloneable dispatcher into a running engine.
///
/// Every method enqueues one event and returns immediately. Errors only
/// occur once the engine loop has stopped.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    events: UnboundedSender<Event>,
    snapshots: watch::Receiver<EngineState>,
}

impl EngineHandle {
    /// Search bar text changed; debounced.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn on_input(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::Input(text.into()))
    }

    /// Searches immediately, cancelling any pending debounce.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn submit_search(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::SubmitSearch(text.into()))
    }

    /// Opens the detail overlay for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn select_item(&self, id: impl Into<String>) -> Result<()> {
        self.send(Event::SelectItem(id.into()))
    }

    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn close_overlay(&self) -> Result<()> {
        self.send(Event::CloseOverlay)
    }

    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn view_saved_collection(&self) -> Result<()> {
        self.send(Event::ViewSavedCollection)
    }

    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn back_to_search(&self) -> Result<()> {
        self.send(Event::BackToSearch)
    }

    /// Saves `item`, or removes it if already saved.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn toggle_save(&self, item: ItemDetail) -> Result<()> {
        self.send(Event::ToggleSave(item))
    }

    /// Reports that artwork for `id` failed to load.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn mark_image_faulted(&self, id: impl Into<String>) -> Result<()> {
        self.send(Event::ImageFailed(id.into()))
    }

    /// Reports that artwork in the open detail overlay failed to load.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has stopped.
    pub fn mark_detail_image_faulted(&self) -> Result<()> {
        self.send(Event::DetailImageFailed)
    }

    /// Stops the engine loop and its timers.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Channel`] if the engine has already stopped.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Event::Shutdown)
    }

    /// Returns a receiver of state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.snapshots.clone()
    }

    /// Returns the most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> EngineState {
        self.snapshots.borrow().clone()
    }

    fn send(&self, event: Event) -> Result<()> {
        self.events
            .send(event)
            .map_err(|e| MarqueeError::Channel(format!("engine stopped, dropped {:?}", e.0)))
    }
}
