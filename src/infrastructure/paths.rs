//! Platform locations for configuration, data, and logs.
//!
//! Marquee follows the platform conventions reported by the `dirs` crate:
//! `~/.config/marquee` and `~/.local/share/marquee` on Linux, the
//! `Application Support` folder on macOS, and `%APPDATA%` on Windows.

use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data roots.
pub const APP_DIR_NAME: &str = "marquee";

/// File name of the optional TOML configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// File name of the rotating log file inside the data directory.
pub const LOG_FILE_NAME: &str = "marquee.log";

/// Returns the default data directory, if the platform has one.
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::default_data_dir;
///
/// if let Some(dir) = default_data_dir() {
///     assert!(dir.ends_with("marquee"));
/// }
/// ```
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Returns the default configuration file path, if the platform has one.
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Returns the log file path inside `data_dir`.
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::log_file;
/// use std::path::Path;
///
/// assert_eq!(log_file(Path::new("/data")), Path::new("/data/marquee.log"));
/// ```
#[must_use]
pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a tilde, or when no home directory is known, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use marquee::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
