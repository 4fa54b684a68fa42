//! Storage collaborators for the serialized companion state.
//!
//! Stores deal in opaque strings; the engine decides the format. A missing
//! save is `Ok(None)`, not an error.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

/// Errors that can occur in a state store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("state store I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Loads and saves the serialized state.
pub trait StateStore: Send + Sync {
    /// The last saved blob, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the saved blob.
    fn save(&self, blob: &str) -> Result<(), StoreError>;
}

/// Stores the state as a JSON file. Writes go to a sibling temp file that is
/// then renamed over the target, so a crash never leaves a torn file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        std::fs::write(&temp, blob)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), bytes = blob.len(), "state saved");
        Ok(())
    }
}

/// Keeps the state in memory. Useful for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .blob
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, blob: &str) -> Result<(), StoreError> {
        *self.blob.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.to_owned());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("pearl-store-{}", uuid::Uuid::new_v4()))
            .join("state.json")
    }

    #[test]
    fn missing_file_loads_none() {
        let store = JsonFileStore::new(scratch_path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let path = scratch_path();
        let store = JsonFileStore::new(&path);

        store.save(r#"{"a":1}"#).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"{"a":1}"#));

        store.save(r#"{"a":2}"#).unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some(r#"{"a":2}"#));
        assert!(!store.temp_path().exists());

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save("blob").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("blob"));
    }
}
