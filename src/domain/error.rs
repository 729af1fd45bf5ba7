//! Error types for the Marquee engine.
//!
//! Three layers of failure exist: [`ApiError`] for the remote metadata service,
//! [`PersistenceError`] for the saved-collection slot, and [`MarqueeError`] for
//! everything that can fail while the engine is being assembled (configuration,
//! I/O, the event channel). Remote and persistence failures never escape the
//! engine; they are absorbed into state fallbacks where they occur.

use thiserror::Error;

/// Failure outcomes of a remote metadata request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The remote service answered with `Response: "False"`.
    ///
    /// This is the normal "no matches" outcome and renders as an empty state.
    #[error("no matching item")]
    NotFound,

    /// Network failure, timeout, non-success status, or an unparseable payload.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Failure outcomes of reading or writing the persisted collection slot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The slot exists but does not hold a valid collection.
    #[error("persisted slot is corrupt: {0}")]
    Corrupt(String),

    /// The collection could not be serialized.
    #[error("failed to encode collection: {0}")]
    Encode(String),

    /// Filesystem failure while touching the slot.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The main error type for Marquee operations.
///
/// Only startup paths (configuration, storage directory creation) and the
/// dispatch side of the engine channel return this type.
///
/// # Examples
///
/// ```
/// use marquee::MarqueeError;
///
/// fn require_key(key: Option<&str>) -> Result<&str, MarqueeError> {
///     key.ok_or_else(|| MarqueeError::Config("missing API key".to_string()))
/// }
///
/// assert!(require_key(None).is_err());
/// ```
#[derive(Debug, Error)]
pub enum MarqueeError {
    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(String),

    /// The engine loop is gone and can no longer accept events.
    #[error("Engine channel error: {0}")]
    Channel(String),
}

/// A specialized `Result` type for Marquee operations.
pub type Result<T> = std::result::Result<T, MarqueeError>;
