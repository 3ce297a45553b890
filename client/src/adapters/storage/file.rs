//! File-backed key-value storage
//!
//! All entries live in a single JSON object (`storage.json`) inside the
//! configured directory. The file is read on first use and rewritten on every
//! change through a temp file + rename so a crash never leaves it half written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::KeyValueStorage;
use crate::error::StorageError;

const FILE_NAME: &str = "storage.json";

#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// Loaded lazily on first access
    entries: Mutex<Option<HashMap<String, String>>>,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(FILE_NAME),
            entries: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) if raw.is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Run `f` against the loaded entries; persist when it reports a change.
    /// The cache only takes the change once it is on disk.
    async fn with_entries<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> (T, bool),
    ) -> Result<T, StorageError> {
        let mut guard = self.entries.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
            tracing::debug!(path = %self.path.display(), "Loaded local storage");
        }
        let entries = guard.get_or_insert_with(HashMap::new);
        // Work on a copy so a failed write leaves the cache matching the disk
        let mut next = entries.clone();
        let (value, changed) = f(&mut next);
        if changed {
            self.persist(&next).await?;
            *entries = next;
        }
        Ok(value)
    }
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_entries(|entries| (entries.get(key).cloned(), false))
            .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.with_entries(|entries| {
            let previous = entries.insert(key.to_string(), value.to_string());
            ((), previous.as_deref() != Some(value))
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.with_entries(|entries| ((), entries.remove(key).is_some()))
            .await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.with_entries(|entries| {
            let changed = !entries.is_empty();
            entries.clear();
            ((), changed)
        })
        .await
    }
}
