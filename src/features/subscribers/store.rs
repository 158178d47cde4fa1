//! Persisted recipient set
//!
//! Recipients are stored as a JSON array of channel ids. Every mutation
//! rewrites the whole set through a temporary file and an atomic rename, and
//! every read goes back to disk so changes made between firings are seen.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Initial release with atomic replace and read/write locking

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Opaque recipient identifier (a Discord channel id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub u64);

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File-backed set of recipients, safe to share behind an `Arc`
///
/// Readers run concurrently; `add` and `remove` hold the write lock for the
/// whole read-modify-replace cycle.
#[derive(Debug)]
pub struct RecipientStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl RecipientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Subscribe `id`; returns `true` if it was not already present
    pub async fn add(&self, id: RecipientId) -> Result<bool> {
        let _guard = self.lock.write().await;
        let mut ids = self.read_all().await?;
        if ids.contains(&id) {
            debug!("Recipient {id} already subscribed");
            return Ok(false);
        }
        ids.push(id);
        self.write_all(&ids).await?;
        info!("Recipient {id} subscribed ({} total)", ids.len());
        Ok(true)
    }

    /// Unsubscribe `id`; returns `true` if it was present
    pub async fn remove(&self, id: RecipientId) -> Result<bool> {
        let _guard = self.lock.write().await;
        let mut ids = self.read_all().await?;
        let before = ids.len();
        ids.retain(|existing| *existing != id);
        if ids.len() == before {
            debug!("Recipient {id} was not subscribed");
            return Ok(false);
        }
        self.write_all(&ids).await?;
        info!("Recipient {id} unsubscribed ({} remaining)", ids.len());
        Ok(true)
    }

    /// Snapshot of current recipients in subscription order
    ///
    /// A store that has never been written is empty, not an error.
    pub async fn list(&self) -> Result<Vec<RecipientId>> {
        let _guard = self.lock.read().await;
        self.read_all().await
    }

    async fn read_all(&self) -> Result<Vec<RecipientId>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read subscribers file {}", self.path.display())
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: Vec<RecipientId> = serde_json::from_str(&text)
            .with_context(|| format!("Corrupt subscribers file {}", self.path.display()))?;

        let mut ids = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    async fn write_all(&self, ids: &[RecipientId]) -> Result<()> {
        let json = serde_json::to_string(ids)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RecipientStore {
        RecipientStore::new(dir.path().join("subscribers.json"))
    }

    #[tokio::test]
    async fn test_missing_store_lists_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.add(RecipientId(42)).await.unwrap());
        assert!(!store.add(RecipientId(42)).await.unwrap());

        assert_eq!(store.list().await.unwrap(), vec![RecipientId(42)]);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.remove(RecipientId(7)).await.unwrap());
        store.add(RecipientId(7)).await.unwrap();
        store.add(RecipientId(8)).await.unwrap();
        assert!(store.remove(RecipientId(7)).await.unwrap());

        assert_eq!(store.list().await.unwrap(), vec![RecipientId(8)]);
    }

    #[tokio::test]
    async fn test_persists_as_json_array() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(RecipientId(10)).await.unwrap();
        store.add(RecipientId(20)).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "[10,20]");
        assert!(!dir.path().join("subscribers.json.tmp").exists());

        let reopened = store_in(&dir);
        assert_eq!(
            reopened.list().await.unwrap(),
            vec![RecipientId(10), RecipientId(20)]
        );
    }

    #[tokio::test]
    async fn test_reads_are_fresh() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.add(RecipientId(1)).await.unwrap();

        std::fs::write(store.path(), "[1, 2, 2]").unwrap();
        assert_eq!(
            store.list().await.unwrap(),
            vec![RecipientId(1), RecipientId(2)]
        );
    }

    #[tokio::test]
    async fn test_corrupt_store_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "not json").unwrap();

        assert!(store.list().await.is_err());
        assert!(store.add(RecipientId(1)).await.is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "not json");
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_every_id() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        let tasks: Vec<_> = (0..20u64)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.add(RecipientId(i)).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().unwrap());
        }

        let mut ids = store.list().await.unwrap();
        ids.sort();
        assert_eq!(ids, (0..20u64).map(RecipientId).collect::<Vec<_>>());
    }
}
