//! Host player backed by a JSON state file.
//!
//! Lets the enforcement pipeline run outside the real client: the file holds
//! the shuffle flag, the playback context and the upcoming queue. It is loaded
//! into an [`InMemoryQueue`], edited through the usual ports and written back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::memory::InMemoryQueue;
use crate::domain::errors::{DomainError, DomainResult, QueueError};
use crate::domain::models::{InstanceId, ItemId, QueueEntry, QueueSnapshot};
use crate::domain::ports::{PlaybackMode, QueueAccess};

/// One upcoming track as stored in the state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRef {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

/// On-disk player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub context_uri: Option<String>,
    #[serde(default)]
    pub navigation_path: Option<String>,
    #[serde(default)]
    pub visible_limit: Option<usize>,
    #[serde(default)]
    pub next_up: Vec<TrackRef>,
}

const fn default_available() -> bool {
    true
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            shuffle: false,
            available: default_available(),
            context_uri: None,
            navigation_path: None,
            visible_limit: None,
            next_up: Vec::new(),
        }
    }
}

pub struct JsonFilePlayer {
    path: PathBuf,
    context_uri: Option<String>,
    navigation_path: Option<String>,
    visible_limit: Option<usize>,
    queue: InMemoryQueue,
}

impl JsonFilePlayer {
    /// Load the state file. Tracks without a uid get a fresh one.
    pub async fn load(path: impl Into<PathBuf>) -> DomainResult<Self> {
        let path = path.into();
        let raw = tokio::fs::read_to_string(&path).await.map_err(|err| {
            DomainError::StorageError(format!("cannot read {}: {err}", path.display()))
        })?;
        let state: PlayerState = serde_json::from_str(&raw)?;
        Ok(Self::from_state(path, state))
    }

    pub fn from_state(path: impl Into<PathBuf>, state: PlayerState) -> Self {
        let entries = state
            .next_up
            .into_iter()
            .map(|track| {
                let uid = track
                    .uid
                    .map_or_else(InMemoryQueue::mint_uid, InstanceId::new);
                QueueEntry::new(ItemId::new(track.uri), uid)
            })
            .collect();

        let queue = InMemoryQueue::new(entries)
            .with_shuffle(state.shuffle)
            .with_available(state.available)
            .with_visible_limit(state.visible_limit);

        Self {
            path: path.into(),
            context_uri: state.context_uri,
            navigation_path: state.navigation_path,
            visible_limit: state.visible_limit,
            queue,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn context_uri(&self) -> Option<&str> {
        self.context_uri.as_deref()
    }

    pub fn navigation_path(&self) -> Option<&str> {
        self.navigation_path.as_deref()
    }

    pub const fn queue(&self) -> &InMemoryQueue {
        &self.queue
    }

    /// Current state, including every edit made through the ports.
    pub async fn state(&self) -> PlayerState {
        let next_up = self
            .queue
            .entries()
            .await
            .into_iter()
            .map(|entry| TrackRef {
                uri: entry.item.as_str().to_string(),
                uid: Some(entry.uid.as_str().to_string()),
            })
            .collect();

        PlayerState {
            shuffle: self.queue.shuffle().await,
            available: self.queue.is_available().await,
            context_uri: self.context_uri.clone(),
            navigation_path: self.navigation_path.clone(),
            visible_limit: self.visible_limit,
            next_up,
        }
    }

    /// Write the current state back to the file it was loaded from.
    pub async fn save(&self) -> DomainResult<()> {
        let state = self.state().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&state)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), tracks = state.next_up.len(), "player state written");
        Ok(())
    }
}

#[async_trait]
impl QueueAccess for JsonFilePlayer {
    async fn is_available(&self) -> bool {
        self.queue.is_available().await
    }

    async fn snapshot(&self) -> Result<QueueSnapshot, QueueError> {
        self.queue.snapshot().await
    }

    async fn insert_before(&self, item: &ItemId, before: &InstanceId) -> Result<(), QueueError> {
        self.queue.insert_before(item, before).await
    }

    async fn remove(&self, item: &ItemId, uid: &InstanceId) -> Result<(), QueueError> {
        self.queue.remove(item, uid).await
    }
}

#[async_trait]
impl PlaybackMode for JsonFilePlayer {
    async fn is_shuffle_active(&self) -> Result<bool, QueueError> {
        self.queue.is_shuffle_active().await
    }
}
