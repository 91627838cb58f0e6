//! In-memory host queue.
//!
//! Behaves like the real host where it matters to convergence: inserting an
//! item always creates a new occurrence with a fresh uid, reads can be capped
//! to a visible window, and individual edits can be made to fail. By default
//! the old occurrence stays behind; `with_relocate_on_insert` makes the insert
//! move it instead.

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::errors::QueueError;
use crate::domain::models::{InstanceId, ItemId, QueueEntry, QueueSnapshot};
use crate::domain::ports::{PlaybackMode, QueueAccess};

/// Number of calls made against the queue, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCounters {
    pub snapshots: usize,
    pub inserts: usize,
    pub removals: usize,
}

impl QueueCounters {
    /// Successful edits (inserts and removals).
    pub const fn edits(&self) -> usize {
        self.inserts + self.removals
    }

    /// Any read or edit at all.
    pub const fn touched(&self) -> bool {
        self.snapshots + self.inserts + self.removals > 0
    }
}

#[derive(Debug)]
struct HostState {
    entries: Vec<QueueEntry>,
    shuffle: bool,
    available: bool,
    mode_reachable: bool,
    visible_limit: Option<usize>,
    relocate_on_insert: bool,
    snapshot_budget: Option<usize>,
    rejected_inserts: HashSet<ItemId>,
    rejected_removals: HashSet<InstanceId>,
    counters: QueueCounters,
}

/// Host queue and playback mode held in memory.
#[derive(Debug)]
pub struct InMemoryQueue {
    state: Mutex<HostState>,
}

impl InMemoryQueue {
    /// Queue with the given entries, shuffle on.
    pub fn new(entries: Vec<QueueEntry>) -> Self {
        Self {
            state: Mutex::new(HostState {
                entries,
                shuffle: true,
                available: true,
                mode_reachable: true,
                visible_limit: None,
                relocate_on_insert: false,
                snapshot_budget: None,
                rejected_inserts: HashSet::new(),
                rejected_removals: HashSet::new(),
                counters: QueueCounters::default(),
            }),
        }
    }

    /// Queue of items with uids `uid0`, `uid1`, ... in order.
    pub fn from_items(items: &[&str]) -> Self {
        Self::new(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| QueueEntry::new(*item, InstanceId::new(format!("uid{i}"))))
                .collect(),
        )
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.state.get_mut().shuffle = shuffle;
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.state.get_mut().available = available;
        self
    }

    /// Expose only the first `limit` entries to reads.
    pub fn with_visible_limit(mut self, limit: Option<usize>) -> Self {
        self.state.get_mut().visible_limit = limit;
        self
    }

    /// Move an existing occurrence of the inserted item instead of copying it.
    pub fn with_relocate_on_insert(mut self, relocate: bool) -> Self {
        self.state.get_mut().relocate_on_insert = relocate;
        self
    }

    /// Mint a fresh uid the way the host does.
    pub fn mint_uid() -> InstanceId {
        InstanceId::new(Uuid::new_v4().simple().to_string())
    }

    pub async fn set_shuffle(&self, shuffle: bool) {
        self.state.lock().await.shuffle = shuffle;
    }

    pub async fn set_available(&self, available: bool) {
        self.state.lock().await.available = available;
    }

    /// Make the shuffle query fail.
    pub async fn set_mode_reachable(&self, reachable: bool) {
        self.state.lock().await.mode_reachable = reachable;
    }

    /// Allow `budget` more snapshots, then fail every further read.
    pub async fn limit_snapshots(&self, budget: usize) {
        self.state.lock().await.snapshot_budget = Some(budget);
    }

    /// Reject every insert of `item`.
    pub async fn reject_inserts_of(&self, item: impl Into<ItemId>) {
        self.state.lock().await.rejected_inserts.insert(item.into());
    }

    /// Reject removal of the occurrence `uid`.
    pub async fn reject_removal_of(&self, uid: impl Into<InstanceId>) {
        self.state.lock().await.rejected_removals.insert(uid.into());
    }

    /// Full queue contents, ignoring the visible window.
    pub async fn entries(&self) -> Vec<QueueEntry> {
        self.state.lock().await.entries.clone()
    }

    /// Item ids of the full queue, in order.
    pub async fn items(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .entries
            .iter()
            .map(|entry| entry.item.as_str().to_string())
            .collect()
    }

    pub async fn counters(&self) -> QueueCounters {
        self.state.lock().await.counters
    }

    pub async fn reset_counters(&self) {
        self.state.lock().await.counters = QueueCounters::default();
    }

    pub async fn shuffle(&self) -> bool {
        self.state.lock().await.shuffle
    }
}

impl HostState {
    fn ensure_available(&self) -> Result<(), QueueError> {
        if self.available {
            Ok(())
        } else {
            Err(QueueError::Unavailable("host queue is not reachable".to_string()))
        }
    }
}

#[async_trait]
impl QueueAccess for InMemoryQueue {
    async fn is_available(&self) -> bool {
        self.state.lock().await.available
    }

    async fn snapshot(&self) -> Result<QueueSnapshot, QueueError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;

        if let Some(budget) = state.snapshot_budget {
            if budget == 0 {
                return Err(QueueError::Unavailable("queue read failed".to_string()));
            }
            state.snapshot_budget = Some(budget - 1);
        }

        state.counters.snapshots += 1;
        let visible = state
            .visible_limit
            .map_or(state.entries.len(), |limit| limit.min(state.entries.len()));
        Ok(QueueSnapshot::new(state.entries[..visible].to_vec()))
    }

    async fn insert_before(&self, item: &ItemId, before: &InstanceId) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;

        if state.rejected_inserts.contains(item) {
            return Err(QueueError::Rejected(format!("insert of {item} refused")));
        }

        let mut index = state
            .entries
            .iter()
            .position(|entry| entry.uid == *before)
            .ok_or_else(|| QueueError::InstanceNotFound {
                item: item.clone(),
                uid: before.clone(),
            })?;

        if state.relocate_on_insert {
            let existing = (0..state.entries.len())
                .find(|&i| i != index && state.entries[i].item == *item);
            if let Some(existing) = existing {
                state.entries.remove(existing);
                if existing < index {
                    index -= 1;
                }
            }
        }

        state
            .entries
            .insert(index, QueueEntry::new(item.clone(), Self::mint_uid()));
        state.counters.inserts += 1;
        Ok(())
    }

    async fn remove(&self, item: &ItemId, uid: &InstanceId) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        state.ensure_available()?;

        if state.rejected_removals.contains(uid) {
            return Err(QueueError::Rejected(format!("removal of {uid} refused")));
        }

        let index = state
            .entries
            .iter()
            .position(|entry| entry.uid == *uid && entry.item == *item)
            .ok_or_else(|| QueueError::InstanceNotFound {
                item: item.clone(),
                uid: uid.clone(),
            })?;

        state.entries.remove(index);
        state.counters.removals += 1;
        Ok(())
    }
}

#[async_trait]
impl PlaybackMode for InMemoryQueue {
    async fn is_shuffle_active(&self) -> Result<bool, QueueError> {
        let state = self.state.lock().await;
        if state.mode_reachable {
            Ok(state.shuffle)
        } else {
            Err(QueueError::Unavailable("playback mode is not reachable".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_keeps_old_occurrence_with_new_uid() {
        let queue = InMemoryQueue::from_items(&["a", "b", "c"]);

        queue
            .insert_before(&"c".into(), &"uid0".into())
            .await
            .unwrap();

        let entries = queue.entries().await;
        assert_eq!(queue.items().await, vec!["c", "a", "b", "c"]);
        assert_ne!(entries[0].uid, entries[3].uid);
        assert_eq!(entries[3].uid.as_str(), "uid2");
    }

    #[tokio::test]
    async fn test_relocating_insert_moves_occurrence() {
        let queue = InMemoryQueue::from_items(&["a", "b", "c"]).with_relocate_on_insert(true);

        queue
            .insert_before(&"c".into(), &"uid0".into())
            .await
            .unwrap();
        queue
            .insert_before(&"c".into(), &"uid2".into())
            .await
            .unwrap_err();

        let entries = queue.entries().await;
        assert_eq!(queue.items().await, vec!["c", "a", "b"]);
        assert_ne!(entries[0].uid.as_str(), "uid2");
        assert_eq!(queue.counters().await.removals, 0);
    }

    #[tokio::test]
    async fn test_relocating_insert_of_new_item_adds_occurrence() {
        let queue = InMemoryQueue::from_items(&["a", "b"]).with_relocate_on_insert(true);

        queue
            .insert_before(&"z".into(), &"uid1".into())
            .await
            .unwrap();

        assert_eq!(queue.items().await, vec!["a", "z", "b"]);
    }

    #[tokio::test]
    async fn test_insert_before_missing_uid_fails() {
        let queue = InMemoryQueue::from_items(&["a"]);
        let result = queue.insert_before(&"b".into(), &"gone".into()).await;
        assert!(matches!(result, Err(QueueError::InstanceNotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_requires_exact_occurrence() {
        let queue = InMemoryQueue::from_items(&["a", "a"]);

        assert!(queue.remove(&"b".into(), &"uid0".into()).await.is_err());
        queue.remove(&"a".into(), &"uid1".into()).await.unwrap();

        let entries = queue.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].uid.as_str(), "uid0");
    }

    #[tokio::test]
    async fn test_visible_limit_caps_snapshot() {
        let queue = InMemoryQueue::from_items(&["a", "b", "c"]).with_visible_limit(Some(2));
        let snapshot = queue.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(queue.items().await.len(), 3);
    }

    #[tokio::test]
    async fn test_snapshot_budget() {
        let queue = InMemoryQueue::from_items(&["a"]);
        queue.limit_snapshots(1).await;

        assert!(queue.snapshot().await.is_ok());
        assert!(queue.snapshot().await.is_err());
        assert_eq!(queue.counters().await.snapshots, 1);
    }

    #[tokio::test]
    async fn test_unavailable_queue_rejects_everything() {
        let queue = InMemoryQueue::from_items(&["a"]).with_available(false);

        assert!(!queue.is_available().await);
        assert!(queue.snapshot().await.is_err());
        assert!(queue.insert_before(&"b".into(), &"uid0".into()).await.is_err());
        assert!(!queue.counters().await.touched());
    }

    #[tokio::test]
    async fn test_playback_mode() {
        let queue = InMemoryQueue::from_items(&[]).with_shuffle(false);
        assert!(!queue.is_shuffle_active().await.unwrap());

        queue.set_mode_reachable(false).await;
        assert!(queue.is_shuffle_active().await.is_err());
    }
}
