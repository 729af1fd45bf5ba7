//! JSON file-based storage backend.
//!
//! Each slot is a file `<dir>/<key>.json`. Writes go to a temporary sibling
//! first and are renamed into place, so a crash mid-write never leaves a
//! truncated slot behind.

use crate::domain::PersistenceError;
use crate::storage::backend::Storage;
use std::path::{Path, PathBuf};

/// JSON file storage backend.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is written only from the engine loop.
///
/// # Examples
///
/// ```no_run
/// use marquee::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/marquee"))?;
/// storage.write("savedMovies", "[]")?;
/// assert_eq!(storage.read("savedMovies")?.as_deref(), Some("[]"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    /// Opens a storage directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: PathBuf) -> Result<Self, PersistenceError> {
        tracing::debug!(dir = ?dir, "initializing JSON storage");
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path of the file backing `key`.
    #[must_use]
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Storage for JsonStorage {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.slot_path(key);
        let _span = tracing::debug_span!("json_read_slot", path = ?path).entered();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!(bytes = contents.len(), "slot loaded");
                Ok(Some(contents))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("slot absent");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        let path = self.slot_path(key);
        let _span = tracing::debug_span!("json_write_slot", path = ?path, bytes = contents.len())
            .entered();

        let tmp_path = path.with_extension("json.tmp");

        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, contents)?;

        tracing::trace!("renaming temporary file to final location");
        std::fs::rename(&tmp_path, &path)?;

        tracing::debug!("slot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(storage.read("savedMovies").unwrap().is_none());
    }

    #[test]
    fn write_replaces_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("nested")).unwrap();

        storage.write("savedMovies", "[1]").unwrap();
        storage.write("savedMovies", "[2]").unwrap();

        assert_eq!(storage.read("savedMovies").unwrap().as_deref(), Some("[2]"));
        let names: Vec<_> = std::fs::read_dir(storage.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["savedMovies.json".to_string()]);
    }
}
