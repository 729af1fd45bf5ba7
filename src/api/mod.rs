//! Remote metadata client.
//!
//! The engine talks to the remote service through the [`MetadataApi`] trait so
//! the runtime can be driven by [`OmdbClient`] in production and by scripted
//! fakes in tests.
//!
//! # Modules
//!
//! - `client`: `reqwest` implementation
//! - `wire`: response envelope decoding

pub mod client;
pub mod wire;

pub use client::OmdbClient;
pub use wire::{decode_detail, decode_search};

use crate::domain::{ApiError, ItemDetail, SearchResultItem};
use std::future::Future;

/// The two requests the engine issues against the remote service.
///
/// Implementations are stateless from the engine's point of view: each call is
/// a single request, no retries, and "no match" is reported as
/// [`ApiError::NotFound`] rather than as a fault.
pub trait MetadataApi: Send + Sync + 'static {
    /// Searches by free-text term.
    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<SearchResultItem>, ApiError>> + Send;

    /// Fetches the full record for one identifier.
    fn fetch_detail(&self, id: &str) -> impl Future<Output = Result<ItemDetail, ApiError>> + Send;
}
