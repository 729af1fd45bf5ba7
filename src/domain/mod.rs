//! Domain layer for Marquee.
//!
//! Core types independent of transport, persistence, or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Search result and detail records
//!
//! # Examples
//!
//! ```
//! use marquee::domain::{Poster, SearchResultItem};
//!
//! let item: SearchResultItem = serde_json::from_str(
//!     r#"{"imdbID":"tt0096895","Title":"Batman","Year":"1989","Type":"movie","Poster":"N/A"}"#,
//! ).unwrap();
//! assert_eq!(item.poster, Poster::Unavailable);
//! ```

pub mod error;
pub mod item;

pub use error::{ApiError, MarqueeError, PersistenceError, Result};
pub use item::{ItemDetail, Poster, SearchResultItem, NOT_AVAILABLE};
