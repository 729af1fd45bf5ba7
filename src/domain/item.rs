//! Movie metadata domain types.
//!
//! [`SearchResultItem`] is the summary row returned by the search endpoint and
//! [`ItemDetail`] is the full record returned by the lookup endpoint. Both use
//! the remote service's field names on the wire, and `ItemDetail` keeps the same
//! names in the persisted collection so a stored record is byte-compatible with a
//! fetched one.

use serde::{Deserialize, Serialize};

/// Placeholder the remote service uses for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Base of the external video search used for trailer links.
const TRAILER_SEARCH_BASE: &str = "https://www.youtube.com/results";

/// Artwork reference for an item.
///
/// The remote service reports missing artwork as `"N/A"`; an empty string is
/// treated the same way. Serializes back to the remote representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Poster {
    Url(String),
    #[default]
    Unavailable,
}

impl Poster {
    /// Returns the artwork URL, if there is one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Unavailable => None,
        }
    }
}

impl From<String> for Poster {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
            Self::Unavailable
        } else {
            Self::Url(value)
        }
    }
}

impl From<Poster> for String {
    fn from(value: Poster) -> Self {
        match value {
            Poster::Url(url) => url,
            Poster::Unavailable => NOT_AVAILABLE.to_string(),
        }
    }
}

/// One row of a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: Poster,
}

/// Full metadata record for a single item.
///
/// Fetched on demand when an item is selected, and stored verbatim when the
/// item is saved to the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    /// Certification string, e.g. `PG-13`.
    #[serde(rename = "Rated", default)]
    pub rating: String,
    #[serde(rename = "Released", default)]
    pub release_date: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Writer", default)]
    pub writer: String,
    #[serde(rename = "Actors", default)]
    pub cast: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Poster", default)]
    pub poster: Poster,
    /// Numeric rating in string form; may be `N/A`.
    #[serde(rename = "imdbRating", default)]
    pub score: String,
}

impl ItemDetail {
    /// Builds a video-search link for this item's trailer.
    ///
    /// The query is `"{title} {year} official trailer"`, URL-encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee::domain::ItemDetail;
    ///
    /// let detail: ItemDetail = serde_json::from_str(
    ///     r#"{"imdbID":"tt0468569","Title":"The Dark Knight","Year":"2008"}"#,
    /// ).unwrap();
    /// let url = detail.trailer_url().unwrap();
    /// assert!(url.contains("search_query=The+Dark+Knight+2008+official+trailer"));
    /// ```
    #[must_use]
    pub fn trailer_url(&self) -> Option<String> {
        let query = format!("{} {} official trailer", self.title, self.year);
        reqwest::Url::parse_with_params(TRAILER_SEARCH_BASE, &[("search_query", query)])
            .map(String::from)
            .ok()
    }

    /// Returns the numeric score, or `None` when the remote reported `N/A`.
    #[must_use]
    pub fn numeric_score(&self) -> Option<f32> {
        self.score.trim().parse().ok()
    }
}
