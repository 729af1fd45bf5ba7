//! Trailing-edge debounce for search keystrokes.
//!
//! [`QueryController`] owns the pending query text and the identity of the one
//! armed timer. It does not sleep itself: arming returns a generation number
//! that the runtime attaches to a timer task, and expiry is reported back with
//! that generation. Any generation other than the armed one is stale and is
//! dropped, so a superseded timer can never issue a request even if its task
//! was not aborted in time.

use std::time::Duration;

/// Result of feeding one keystroke's worth of text into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Text is below the minimum length; nothing is armed and results should
    /// be cleared right away.
    Cleared,

    /// A fresh timer must be started, replacing any previous one.
    Armed {
        /// Identity of this timer.
        generation: u64,
        /// How long the timer waits for quiet before firing.
        delay: Duration,
    },
}

/// Debounced query controller.
#[derive(Debug, Clone)]
pub struct QueryController {
    pending: String,
    generation: u64,
    armed: Option<u64>,
    delay: Duration,
    min_len: usize,
}

impl QueryController {
    /// Creates a controller with the given quiet period and minimum length.
    #[must_use]
    pub const fn new(delay: Duration, min_len: usize) -> Self {
        Self {
            pending: String::new(),
            generation: 0,
            armed: None,
            delay,
            min_len,
        }
    }

    /// Returns whether `text` is long enough to be searched.
    ///
    /// Length is counted in characters, not bytes.
    #[must_use]
    pub fn meets_minimum(&self, text: &str) -> bool {
        text.chars().count() >= self.min_len
    }

    /// Records new input text and decides whether a timer should be armed.
    ///
    /// Every call supersedes the previously armed timer.
    pub fn on_input(&mut self, text: &str) -> InputOutcome {
        self.pending.clear();
        self.pending.push_str(text);
        self.generation = self.generation.wrapping_add(1);

        if self.meets_minimum(text) {
            self.armed = Some(self.generation);
            InputOutcome::Armed {
                generation: self.generation,
                delay: self.delay,
            }
        } else {
            self.armed = None;
            InputOutcome::Cleared
        }
    }

    /// Reports that the timer with `generation` elapsed.
    ///
    /// Returns the text to search for if that timer is still the armed one.
    pub fn expire(&mut self, generation: u64) -> Option<String> {
        if self.armed == Some(generation) {
            self.armed = None;
            Some(self.pending.clone())
        } else {
            tracing::trace!(generation, armed = ?self.armed, "ignoring stale debounce expiry");
            None
        }
    }

    /// Disarms the pending timer. Returns `true` if one was armed.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Replaces the pending text without arming anything.
    pub fn set_pending(&mut self, text: &str) {
        self.pending.clear();
        self.pending.push_str(text);
    }

    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Minimum query length, in characters.
    #[must_use]
    pub const fn min_len(&self) -> usize {
        self.min_len
    }
}
