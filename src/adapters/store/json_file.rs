//! JSON file chain store.
//!
//! The whole `{ container: [[item, ...], ...] }` record lives in one file that
//! is rewritten on every change.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Chain, ChainBook, ContainerId, ItemId};
use crate::domain::ports::ChainStore;

/// Chain store persisted as a single JSON file.
pub struct JsonFileChainStore {
    path: PathBuf,
    // Serializes read-modify-write cycles from this process.
    write_lock: Mutex<()>,
}

impl JsonFileChainStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_book(&self) -> ChainBook {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no chain file yet");
                return ChainBook::new();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "could not read chain file, treating as empty");
                return ChainBook::new();
            }
        };

        if raw.trim().is_empty() {
            return ChainBook::new();
        }

        let stored: BTreeMap<ContainerId, Vec<Vec<ItemId>>> = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "malformed chain file, treating as empty");
                return ChainBook::new();
            }
        };

        // Validate chain by chain so one bad entry does not cost the others.
        let mut book = ChainBook::new();
        for (container, chains) in stored {
            for items in chains {
                match Chain::new(items) {
                    Ok(chain) => {
                        book.add_chain(container.clone(), chain);
                    }
                    Err(reason) => {
                        warn!(container = %container, %reason, "dropping invalid stored chain");
                    }
                }
            }
        }
        book
    }

    async fn write_book(&self, book: &ChainBook) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(book)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), chains = book.chain_count(), "chain file written");
        Ok(())
    }
}

#[async_trait]
impl ChainStore for JsonFileChainStore {
    async fn get_chains(&self) -> ChainBook {
        self.read_book().await
    }

    async fn save_chain(&self, container: &ContainerId, chain: Chain) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.read_book().await;
        let evicted = book.add_chain(container.clone(), chain);
        if evicted > 0 {
            debug!(container = %container, evicted, "replaced overlapping chains");
        }
        self.write_book(&book).await
    }

    async fn clear_chains(&self, container: &ContainerId) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut book = self.read_book().await;
        if !book.clear(container) {
            return Ok(());
        }
        self.write_book(&book).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(items: &[&str]) -> Chain {
        Chain::new(items.iter().map(|s| ItemId::from(*s)).collect()).unwrap()
    }

    fn playlist() -> ContainerId {
        ContainerId::normalize("spotify:playlist:p1").unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileChainStore::new(dir.path().join("chains.json"));
        assert!(store.get_chains().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = JsonFileChainStore::new(&path);
        assert!(store.get_chains().await.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.json");
        tokio::fs::write(&path, r#"{"playlist:p1": "a,b"}"#).await.unwrap();

        let store = JsonFileChainStore::new(&path);
        assert!(store.get_chains().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_chain_is_dropped_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.json");
        tokio::fs::write(
            &path,
            r#"{"playlist:p":[["a","b","a"],["c","d"]],"playlist:q":[["x","y"]]}"#,
        )
        .await
        .unwrap();
        let store = JsonFileChainStore::new(&path);
        let p = ContainerId::normalize("spotify:playlist:p").unwrap();
        let q = ContainerId::normalize("spotify:playlist:q").unwrap();
        let r = ContainerId::normalize("spotify:playlist:r").unwrap();

        let book = store.get_chains().await;
        assert_eq!(book.chains_for(&p), &[chain(&["c", "d"])]);
        assert_eq!(book.chains_for(&q), &[chain(&["x", "y"])]);

        store.save_chain(&r, chain(&["m", "n"])).await.unwrap();

        let reopened = JsonFileChainStore::new(&path).get_chains().await;
        assert_eq!(reopened.chains_for(&q), &[chain(&["x", "y"])]);
        assert_eq!(reopened.chains_for(&p), &[chain(&["c", "d"])]);
        assert_eq!(reopened.chains_for(&r), &[chain(&["m", "n"])]);
    }

    #[tokio::test]
    async fn test_save_creates_parent_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chains.json");
        let store = JsonFileChainStore::new(&path);

        store.save_chain(&playlist(), chain(&["a", "b"])).await.unwrap();

        let reopened = JsonFileChainStore::new(&path);
        assert_eq!(
            reopened.get_chains().await.chains_for(&playlist()),
            &[chain(&["a", "b"])]
        );
    }

    #[tokio::test]
    async fn test_overlapping_save_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileChainStore::new(dir.path().join("chains.json"));

        store.save_chain(&playlist(), chain(&["x", "y"])).await.unwrap();
        store.save_chain(&playlist(), chain(&["y", "z"])).await.unwrap();

        assert_eq!(
            store.get_chains().await.chains_for(&playlist()),
            &[chain(&["y", "z"])]
        );
    }

    #[tokio::test]
    async fn test_save_over_malformed_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chains.json");
        tokio::fs::write(&path, "garbage").await.unwrap();
        let store = JsonFileChainStore::new(&path);

        store.save_chain(&playlist(), chain(&["a", "b"])).await.unwrap();

        assert_eq!(store.get_chains().await.chain_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_chains() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileChainStore::new(dir.path().join("chains.json"));
        store.save_chain(&playlist(), chain(&["a", "b"])).await.unwrap();

        store.clear_chains(&playlist()).await.unwrap();
        store.clear_chains(&playlist()).await.unwrap();

        assert!(store.get_chains().await.is_empty());
    }
}
