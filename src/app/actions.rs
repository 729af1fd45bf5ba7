//! Actions representing side effects to be executed by the runtime.
//!
//! [`handle_event`](crate::app::handle_event) never sleeps or touches the
//! network. It returns a `Vec<Action>` describing timers to arm or cancel and
//! requests to issue, and the [`Runtime`](crate::runtime::Runtime) carries them
//! out, posting completions back as events.
//!
//! # Example
//!
//! ```rust
//! use marquee::app::Action;
//! use std::time::Duration;
//!
//! let actions = vec![
//!     Action::CancelDebounce,
//!     Action::ArmDebounce { generation: 2, delay: Duration::from_millis(500) },
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::query::RequestToken;
use std::time::Duration;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start the debounce timer, replacing any running one.
    ///
    /// On expiry the runtime posts `Event::DebounceElapsed { generation }`.
    ArmDebounce {
        generation: u64,
        delay: Duration,
    },

    /// Stop the debounce timer if one is running.
    CancelDebounce,

    /// Issue a search request.
    Search {
        token: RequestToken,
        term: String,
    },

    /// Issue a detail lookup.
    FetchDetail {
        token: RequestToken,
        id: String,
    },

    /// Start the timer that clears the "just saved" feedback.
    ArmFeedbackReset {
        generation: u64,
        delay: Duration,
    },

    /// Stop the feedback timer if one is running.
    CancelFeedbackReset,

    /// Tear down timers and stop the event loop.
    Shutdown,
}
