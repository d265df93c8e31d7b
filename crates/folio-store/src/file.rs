//! File-backed store: one JSON document per key in a directory.
//!
//! ```text
//! <base>/
//! ├── user.json
//! └── .user.json.tmp   (only while a write is in flight)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{KeyValueStore, StoreError, validate_key};

/// A [`KeyValueStore`] that survives process restarts.
///
/// Writes are atomic: the value goes to a dotted temp file first and is
/// then renamed over the real one, so a crash mid-write leaves either the
/// old value or the new one, never half of each.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `base_path`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the directory can't be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            std::fs::create_dir_all(&base_path)?;
        }
        tracing::debug!(path = %base_path.display(), "file store opened");
        Ok(Self { base_path })
    }

    /// Returns the directory this store writes into.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!(".{key}.json.tmp"))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        match fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        let path = self.entry_path(key);
        let temp_path = self.temp_path(key);

        fs::write(&temp_path, value).await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!(key, "file store entry written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        match fs::remove_file(self.entry_path(key)).await {
            Ok(()) => {
                tracing::debug!(key, "file store entry removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
