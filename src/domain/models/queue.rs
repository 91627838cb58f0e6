//! Upcoming playback queue as seen through host snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::chain::{Chain, ItemId};

/// Identifier of one physical slot in the host queue.
///
/// The host issues a new instance id every time an item is inserted or moved,
/// so two entries for the same [`ItemId`] are told apart only by their uid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One occurrence of an item in the upcoming queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub item: ItemId,
    pub uid: InstanceId,
}

impl QueueEntry {
    pub fn new(item: impl Into<ItemId>, uid: impl Into<InstanceId>) -> Self {
        Self {
            item: item.into(),
            uid: uid.into(),
        }
    }
}

/// First chain member found in a snapshot; placement starts here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub item: ItemId,
    pub position: usize,
}

/// Ordered read of the upcoming queue at one point in time.
///
/// The host may cap how many entries it exposes, so an item missing from a
/// snapshot is not necessarily missing from the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueSnapshot {
    entries: Vec<QueueEntry>,
}

impl QueueSnapshot {
    pub const fn new(entries: Vec<QueueEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    pub fn entry_at(&self, position: usize) -> Option<&QueueEntry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.entries.iter().any(|entry| entry.item == *item)
    }

    /// Position of the first entry whose item belongs to `chain`.
    pub fn find_anchor(&self, chain: &Chain) -> Option<Anchor> {
        self.entries
            .iter()
            .position(|entry| chain.contains(&entry.item))
            .map(|position| Anchor {
                item: self.entries[position].item.clone(),
                position,
            })
    }

    /// Item ids in queue order.
    pub fn items(&self) -> Vec<&ItemId> {
        self.entries.iter().map(|entry| &entry.item).collect()
    }
}

impl From<Vec<QueueEntry>> for QueueSnapshot {
    fn from(entries: Vec<QueueEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(items: &[&str]) -> QueueSnapshot {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| QueueEntry::new(*item, format!("uid{i}").as_str()))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_anchor_is_first_member_in_queue_order() {
        let chain = Chain::new(vec!["c".into(), "b".into()]).unwrap();
        let snap = snapshot(&["a", "b", "c"]);

        let anchor = snap.find_anchor(&chain).unwrap();
        assert_eq!(anchor.item.as_str(), "b");
        assert_eq!(anchor.position, 1);
    }

    #[test]
    fn test_no_anchor() {
        let chain = Chain::new(vec!["x".into(), "y".into()]).unwrap();
        assert!(snapshot(&["a", "b"]).find_anchor(&chain).is_none());
        assert!(QueueSnapshot::default().find_anchor(&chain).is_none());
    }

    #[test]
    fn test_entry_at_and_contains() {
        let snap = snapshot(&["a", "b"]);
        assert_eq!(snap.entry_at(1).unwrap().uid.as_str(), "uid1");
        assert!(snap.entry_at(2).is_none());
        assert!(snap.contains(&"a".into()));
        assert!(!snap.contains(&"z".into()));
    }
}
