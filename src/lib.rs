//! Marquee: a terminal client for browsing an OMDb-style movie metadata API.
//!
//! Marquee provides:
//! - Debounced search-as-you-type with a minimum query length
//! - Detail lookups shown in an overlay, with stale responses discarded
//! - A saved collection persisted as JSON and restored on startup
//! - Tracking of broken artwork so the UI can fall back to text
//! - View models ready for any front end to render
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal Shim (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │ EngineHandle / watch snapshots
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Event loop
//! │  - Timers and network tasks                         │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Query Layer   │   │ Storage Layer │   │ API Layer     │
//! │ (query/)      │   │ (storage/)    │   │ (api/)        │
//! │ - Debounce    │   │ - JSON slots  │   │ - HTTP client │
//! │ - Tokens      │   │ - Collection  │   │ - Wire decode │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types and records (domain/)                │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - Rotating log file                                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: Remote metadata client and response decoding
//! - [`app`]: Engine state machine with event/action model
//! - [`domain`]: Core records and error types
//! - [`infrastructure`]: Platform-specific utilities (paths)
//! - [`query`]: Debounce controller and request tokens
//! - [`runtime`]: Tokio event loop executing actions
//! - [`storage`]: Persisted saved collection
//! - [`ui`]: View models and plain-text rendering
//! - [`observability`]: Logging setup
//!
//! # Configuration
//!
//! Values are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, then environment variables.
//!
//! ```toml
//! # ~/.config/marquee/config.toml
//! api_key = "abcd1234"
//! debounce_ms = 400
//! trace_level = "debug"
//! ```
//!
//! | Key                    | Environment        | Default                     |
//! |------------------------|--------------------|-----------------------------|
//! | `api_key`              | `OMDB_API_KEY`     | required                    |
//! | `api_base`             | `OMDB_API_BASE`    | `https://www.omdbapi.com/`  |
//! | `data_dir`             | `MARQUEE_DATA_DIR` | platform data dir           |
//! | `trace_level`          | `MARQUEE_LOG`      | `info`                      |
//! | `debounce_ms`          |                    | `500`                       |
//! | `min_query_len`        |                    | `3`                         |
//! | `request_timeout_secs` |                    | `10`                        |
//! | `save_feedback_ms`     |                    | `2000`                      |
//! | `slot_key`             |                    | `savedMovies`               |
//!
//! # Examples
//!
//! ```rust
//! use marquee::{handle_event, initialize, Action, Config, Event};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = Config {
//!     data_dir: dir.path().to_path_buf(),
//!     ..Default::default()
//! };
//!
//! let mut state = initialize(&config);
//! let (_, actions) = handle_event(&mut state, Event::SubmitSearch("alien".to_string()));
//! assert!(matches!(actions[1], Action::Search { .. }));
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod query;
pub mod runtime;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, EngineState, Event, Overlay, SaveFeedback, ViewMode};
pub use domain::{ApiError, ItemDetail, MarqueeError, PersistenceError, Result, SearchResultItem};
pub use runtime::{EngineHandle, Runtime};

use crate::infrastructure::paths::{default_config_file, default_data_dir, expand_tilde};
use crate::storage::{JsonStorage, MemoryStorage, SavedCollection, Storage, DEFAULT_SLOT_KEY};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OMDB_API_KEY";
/// Environment variable overriding the API endpoint.
pub const ENV_API_BASE: &str = "OMDB_API_BASE";
/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "MARQUEE_DATA_DIR";
/// Environment variable overriding the log filter.
pub const ENV_LOG: &str = "MARQUEE_LOG";

const DEFAULT_API_BASE: &str = "https://www.omdbapi.com/";

/// Engine configuration.
///
/// Built by [`Config::load`] from the layered sources described in the crate
/// docs. `Default` yields every default with an empty API key, which is
/// enough for driving the engine without a network.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Endpoint of the metadata service. Default: `https://www.omdbapi.com/`
    pub api_base: String,

    /// Key sent as the `apikey` query parameter. Never logged.
    pub api_key: String,

    /// Quiet period before typed input becomes a search. Default: 500 ms
    pub debounce: Duration,

    /// Minimum query length in characters. Default: 3
    pub min_query_len: usize,

    /// Per-request timeout. Default: 10 s
    pub request_timeout: Duration,

    /// How long "Saved!" stays visible after saving. Default: 2 s
    pub save_feedback: Duration,

    /// Directory for the saved collection and the log file.
    pub data_dir: PathBuf,

    /// Storage slot for the saved collection. Default: `savedMovies`
    pub slot_key: String,

    /// Log filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any
    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            debounce: Duration::from_millis(500),
            min_query_len: 3,
            request_timeout: Duration::from_secs(10),
            save_feedback: Duration::from_secs(2),
            data_dir: default_data_dir().unwrap_or_else(|| PathBuf::from(".marquee")),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            trace_level: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("debounce", &self.debounce)
            .field("min_query_len", &self.min_query_len)
            .field("request_timeout", &self.request_timeout)
            .field("save_feedback", &self.save_feedback)
            .field("data_dir", &self.data_dir)
            .field("slot_key", &self.slot_key)
            .field("trace_level", &self.trace_level)
            .finish()
    }
}

/// Contents of the optional TOML configuration file.
///
/// Every key is optional; unknown keys are rejected so typos surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub debounce_ms: Option<u64>,
    pub min_query_len: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub save_feedback_ms: Option<u64>,
    /// May start with `~`.
    pub data_dir: Option<String>,
    pub slot_key: Option<String>,
    pub trace_level: Option<String>,
}

impl FileConfig {
    /// Parses TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Config`] on invalid TOML or unknown keys.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| MarqueeError::Config(format!("invalid config file: {e}")))
    }

    /// Reads and parses `path`. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Config {
    /// Loads configuration from the file at `path` (or the default location)
    /// and the process environment.
    ///
    /// An explicitly given `path` must exist; the default location is
    /// optional.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Config`] if the file is invalid or no API key
    /// is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => FileConfig::read(path)?
                .ok_or_else(|| MarqueeError::Config(format!("config file not found: {}", path.display())))?,
            None => match default_config_file() {
                Some(default_path) => FileConfig::read(&default_path)?.unwrap_or_default(),
                None => FileConfig::default(),
            },
        };

        let env: BTreeMap<String, String> = std::env::vars().collect();
        Self::from_sources(file, &env)
    }

    /// Merges defaults, file values, and environment values.
    ///
    /// Environment values win over file values; blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::Config`] if no API key is present or
    /// `min_query_len` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use marquee::{Config, FileConfig};
    ///
    /// let file = FileConfig::parse("api_key = \"from-file\"\ndebounce_ms = 250").unwrap();
    /// let mut env = BTreeMap::new();
    /// env.insert("OMDB_API_KEY".to_string(), "from-env".to_string());
    ///
    /// let config = Config::from_sources(file, &env).unwrap();
    /// assert_eq!(config.api_key, "from-env");
    /// assert_eq!(config.debounce.as_millis(), 250);
    /// ```
    pub fn from_sources(file: FileConfig, env: &BTreeMap<String, String>) -> Result<Self> {
        let defaults = Self::default();
        let env_value = |key: &str| {
            env.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let api_key = env_value(ENV_API_KEY)
            .or_else(|| file.api_key.filter(|k| !k.trim().is_empty()))
            .ok_or_else(|| {
                MarqueeError::Config(format!("missing API key: set {ENV_API_KEY} or api_key in config.toml"))
            })?;

        let min_query_len = file.min_query_len.unwrap_or(defaults.min_query_len);
        if min_query_len == 0 {
            return Err(MarqueeError::Config("min_query_len must be at least 1".to_string()));
        }

        Ok(Self {
            api_base: env_value(ENV_API_BASE)
                .or(file.api_base)
                .unwrap_or(defaults.api_base),
            api_key,
            debounce: file.debounce_ms.map_or(defaults.debounce, Duration::from_millis),
            min_query_len,
            request_timeout: file
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            save_feedback: file
                .save_feedback_ms
                .map_or(defaults.save_feedback, Duration::from_millis),
            data_dir: env_value(ENV_DATA_DIR)
                .or(file.data_dir)
                .map_or(defaults.data_dir, |dir| expand_tilde(&dir)),
            slot_key: file.slot_key.unwrap_or(defaults.slot_key),
            trace_level: env_value(ENV_LOG).or(file.trace_level),
        })
    }
}

/// Builds engine state from configuration.
///
/// Opens the JSON store in `config.data_dir` and loads the saved collection.
/// If the directory cannot be created, saved items are kept in memory for
/// this session only and a warning is logged.
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(data_dir = %config.data_dir.display(), "initializing engine");

    let storage: Box<dyn Storage> = match JsonStorage::new(config.data_dir.clone()) {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            tracing::warn!(error = %e, "data directory unavailable, saved items will not persist");
            Box::new(MemoryStorage::new())
        }
    };

    let saved = SavedCollection::load(storage, config.slot_key.clone());
    AppState::new(config, saved)
}
