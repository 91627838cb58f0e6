//! Chain domain model.
//!
//! A chain is an ordered group of items that must always play back to back,
//! in the declared order. Chains are grouped per container in a [`ChainBook`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::container::ContainerId;

/// Stable identifier of a playable item (for example `spotify:track:4uLU6hMCjMI75M1A2tKUQC`).
///
/// Unlike [`InstanceId`](super::queue::InstanceId), an item id never changes when
/// the item is moved around in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Ordered, duplicate-free, non-empty run of items that must play contiguously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemId>", into = "Vec<ItemId>")]
pub struct Chain {
    items: Vec<ItemId>,
}

impl Chain {
    /// Build a chain, rejecting empty input and repeated items.
    pub fn new(items: Vec<ItemId>) -> Result<Self, String> {
        if items.is_empty() {
            return Err("chain must contain at least one item".to_string());
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item) {
                return Err(format!("chain contains {item} more than once"));
            }
        }

        Ok(Self { items })
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.items.contains(item)
    }

    /// True when at least one item appears in both chains.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.items.iter().any(|item| other.contains(item))
    }
}

impl TryFrom<Vec<ItemId>> for Chain {
    type Error = String;

    fn try_from(items: Vec<ItemId>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<Chain> for Vec<ItemId> {
    fn from(chain: Chain) -> Self {
        chain.items
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .items
            .iter()
            .map(ItemId::as_str)
            .collect::<Vec<_>>()
            .join(" -> ");
        f.write_str(&joined)
    }
}

/// Every chain known to the store, keyed by container.
///
/// Serializes as `{ "<container>": [["item", ...], ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainBook {
    containers: BTreeMap<ContainerId, Vec<Chain>>,
}

impl ChainBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chains for a container, in insertion order.
    pub fn chains_for(&self, container: &ContainerId) -> &[Chain] {
        self.containers
            .get(container)
            .map_or(&[], Vec::as_slice)
    }

    /// Append a chain to a container, evicting any chain that shares an item with it.
    ///
    /// Returns the number of evicted chains.
    pub fn add_chain(&mut self, container: ContainerId, chain: Chain) -> usize {
        let chains = self.containers.entry(container).or_default();
        let before = chains.len();
        chains.retain(|existing| !existing.overlaps(&chain));
        let evicted = before - chains.len();
        chains.push(chain);
        evicted
    }

    /// Drop every chain of a container. Returns true if anything was removed.
    pub fn clear(&mut self, container: &ContainerId) -> bool {
        self.containers.remove(container).is_some()
    }

    pub fn containers(&self) -> impl Iterator<Item = (&ContainerId, &[Chain])> {
        self.containers
            .iter()
            .map(|(container, chains)| (container, chains.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.containers.values().all(Vec::is_empty)
    }

    /// Total number of chains across all containers.
    pub fn chain_count(&self) -> usize {
        self.containers.values().map(Vec::len).sum()
    }
}
