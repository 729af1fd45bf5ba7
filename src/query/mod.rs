//! Query pipeline primitives: keystroke debouncing and request sequencing.

pub mod debounce;
pub mod token;

pub use debounce::{InputOutcome, QueryController};
pub use token::{RequestSequencer, RequestToken};
