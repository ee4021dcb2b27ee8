//! File-per-key backend.
//!
//! Each record lives at `{data_dir}/{key}.json`. Writes go to a temporary
//! sibling first and are renamed over the target, so a crash mid-write
//! leaves the previous record intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::DbError;
use crate::store::KvStore;

/// Extension of every record file.
const RECORD_EXTENSION: &str = ".json";

/// Extension of an in-flight write.
const TEMP_EXTENSION: &str = ".json.tmp";

/// A [`KvStore`] backed by one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DbError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| DbError::io(dir.display().to_string(), e))?;
        info!(dir = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// The directory holding the record files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, DbError> {
        if !is_valid_key(key) {
            return Err(DbError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}{RECORD_EXTENSION}")))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]+` is accepted.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DbError> {
        let path = self.record_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DbError::io(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), DbError> {
        let path = self.record_path(key)?;
        let temp = self.dir.join(format!("{key}{TEMP_EXTENSION}"));
        fs::write(&temp, value).map_err(|e| DbError::io(key, e))?;
        fs::rename(&temp, &path).map_err(|e| DbError::io(key, e))?;
        debug!(key, bytes = value.len(), "Record written");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DbError> {
        let dir_key = self.dir.display().to_string();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(DbError::io(dir_key, e)),
        };

        let mut removed: usize = 0;
        for entry in entries {
            let entry = entry.map_err(|e| DbError::io(dir_key.clone(), e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let stem = name
                .strip_suffix(TEMP_EXTENSION)
                .or_else(|| name.strip_suffix(RECORD_EXTENSION));
            if stem.is_some_and(is_valid_key) {
                fs::remove_file(entry.path()).map_err(|e| DbError::io(name, e))?;
                removed = removed.saturating_add(1);
            }
        }

        info!(dir = %self.dir.display(), removed, "File store cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "geocoin-db-{}-{name}",
            std::process::id()
        ));
        fs::remove_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn missing_record_is_none() {
        let dir = scratch_dir("missing");
        let store = FileStore::open(&dir).ok();
        let value = store.and_then(|s| s.get("inventory").ok().flatten());
        assert_eq!(value, None);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn set_then_get_survives_reopen() {
        let dir = scratch_dir("reopen");
        if let Ok(mut store) = FileStore::open(&dir) {
            assert!(store.set("caches", b"{}").is_ok());
            assert!(store.set("caches", b"{\"1,2\":null}").is_ok());
        }
        let reopened = FileStore::open(&dir).ok();
        let value = reopened.and_then(|s| s.get("caches").ok().flatten());
        assert_eq!(value, Some(b"{\"1,2\":null}".to_vec()));
        assert!(!dir.join("caches.json.tmp").exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = scratch_dir("keys");
        if let Ok(mut store) = FileStore::open(&dir) {
            assert!(matches!(
                store.set("../escape", b"x"),
                Err(DbError::InvalidKey(_))
            ));
            assert!(matches!(store.get(""), Err(DbError::InvalidKey(_))));
        }
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn clear_leaves_foreign_files() {
        let dir = scratch_dir("clear");
        if let Ok(mut store) = FileStore::open(&dir) {
            assert!(store.set("inventory", b"[]").is_ok());
            assert!(store.set("travelHistory", b"[]").is_ok());
            assert!(fs::write(dir.join("notes.txt"), b"keep me").is_ok());

            assert!(store.clear().is_ok());
            assert_eq!(store.get("inventory").ok().flatten(), None);
            assert_eq!(store.get("travelHistory").ok().flatten(), None);
            assert!(dir.join("notes.txt").exists());
        }
        fs::remove_dir_all(&dir).ok();
    }
}
