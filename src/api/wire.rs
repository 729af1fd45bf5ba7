//! Response envelope decoding for the remote metadata service.
//!
//! Both endpoints wrap their payload in an object carrying a string
//! `Response` flag (`"True"` / `"False"`) and, on failure, an `Error` message.
//! Decoding is a pure function of the HTTP status and body text so it can be
//! exercised without a network.

use crate::domain::{ApiError, ItemDetail, SearchResultItem};
use reqwest::StatusCode;
use serde::Deserialize;

/// Longest body excerpt carried into a transport error message.
const BODY_EXCERPT_LEN: usize = 120;

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Search", default)]
    search: Vec<SearchResultItem>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Flag {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// Interprets the `Response` flag. `None` means the flag held neither value.
fn flag_is_true(flag: &str) -> Option<bool> {
    if flag.eq_ignore_ascii_case("true") {
        Some(true)
    } else if flag.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn excerpt(body: &str) -> &str {
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    let reason = serde_json::from_str::<Flag>(body)
        .ok()
        .and_then(|flag| flag.error)
        .unwrap_or_else(|| excerpt(body).to_string());
    Err(ApiError::Transport(format!("request failed: status={status}, reason={reason}")))
}

/// Decodes a search response into result rows.
///
/// # Errors
///
/// - [`ApiError::NotFound`] when the service reports no matches
/// - [`ApiError::Transport`] on a non-success status or malformed payload
pub fn decode_search(status: StatusCode, body: &str) -> Result<Vec<SearchResultItem>, ApiError> {
    check_status(status, body)?;

    let envelope: SearchEnvelope = serde_json::from_str(body).map_err(|e| {
        ApiError::Transport(format!("failed to decode search response: {e}, body={}", excerpt(body)))
    })?;

    match flag_is_true(&envelope.response) {
        Some(true) => {
            tracing::debug!(
                returned = envelope.search.len(),
                total_results = ?envelope.total_results,
                "search response decoded"
            );
            Ok(envelope.search)
        }
        Some(false) => {
            tracing::debug!(reason = ?envelope.error, "search reported no matches");
            Err(ApiError::NotFound)
        }
        None => Err(ApiError::Transport(format!(
            "unexpected Response flag: {}",
            envelope.response
        ))),
    }
}

/// Decodes a lookup response into a full detail record.
///
/// # Errors
///
/// - [`ApiError::NotFound`] when the service reports an unknown id
/// - [`ApiError::Transport`] on a non-success status or malformed payload
pub fn decode_detail(status: StatusCode, body: &str) -> Result<ItemDetail, ApiError> {
    check_status(status, body)?;

    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        ApiError::Transport(format!("failed to decode detail response: {e}, body={}", excerpt(body)))
    })?;
    let flag: Flag = serde_json::from_value(value.clone())
        .map_err(|e| ApiError::Transport(format!("detail response missing flag: {e}")))?;

    match flag_is_true(&flag.response) {
        Some(true) => serde_json::from_value(value)
            .map_err(|e| ApiError::Transport(format!("malformed detail record: {e}"))),
        Some(false) => {
            tracing::debug!(reason = ?flag.error, "detail lookup reported no match");
            Err(ApiError::NotFound)
        }
        None => Err(ApiError::Transport(format!(
            "unexpected Response flag: {}",
            flag.response
        ))),
    }
}
