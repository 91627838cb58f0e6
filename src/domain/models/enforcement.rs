//! Per-chain convergence state and enforcement results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::chain::{Chain, ItemId};
use super::container::ContainerId;
use super::queue::{InstanceId, QueueEntry, QueueSnapshot};

/// Lifecycle of one chain inside an enforcement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum ChainPhase {
    Scanning,
    AnchorFound,
    Placing { index: usize },
    CleaningDuplicates,
    Done,
    Abandoned,
}

impl ChainPhase {
    pub const fn can_transition_to(&self, next: Self) -> bool {
        match (*self, next) {
            (Self::Scanning, Self::AnchorFound | Self::Abandoned)
            | (Self::AnchorFound, Self::Placing { index: 0 })
            | (Self::Placing { .. } | Self::AnchorFound, Self::CleaningDuplicates)
            | (Self::CleaningDuplicates, Self::Done) => true,
            (Self::Placing { index }, Self::Placing { index: next_index }) => next_index == index + 1,
            _ => false,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Abandoned)
    }
}

impl fmt::Display for ChainPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scanning => f.write_str("scanning"),
            Self::AnchorFound => f.write_str("anchor_found"),
            Self::Placing { index } => write!(f, "placing[{index}]"),
            Self::CleaningDuplicates => f.write_str("cleaning_duplicates"),
            Self::Done => f.write_str("done"),
            Self::Abandoned => f.write_str("abandoned"),
        }
    }
}

/// Tracks the phase of a single chain and rejects out-of-order transitions.
#[derive(Debug)]
pub struct ChainRun {
    phase: ChainPhase,
}

impl ChainRun {
    pub const fn new() -> Self {
        Self {
            phase: ChainPhase::Scanning,
        }
    }

    pub const fn phase(&self) -> ChainPhase {
        self.phase
    }

    pub fn transition_to(&mut self, next: ChainPhase) -> Result<(), String> {
        if !self.phase.can_transition_to(next) {
            return Err(format!("Cannot transition from {} to {}", self.phase, next));
        }
        self.phase = next;
        Ok(())
    }
}

impl Default for ChainRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Uid judged correctly placed for each chain item during one run.
#[derive(Debug, Clone, Default)]
pub struct PlacementMap {
    placed: HashMap<ItemId, InstanceId>,
}

impl PlacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, item: ItemId, uid: InstanceId) {
        self.placed.insert(item, uid);
    }

    pub fn get(&self, item: &ItemId) -> Option<&InstanceId> {
        self.placed.get(item)
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Occurrences of chain items whose uid is not the recorded one.
    ///
    /// Items without a recorded uid are never reported.
    pub fn strays<'a>(&self, chain: &Chain, snapshot: &'a QueueSnapshot) -> Vec<&'a QueueEntry> {
        snapshot
            .entries()
            .iter()
            .filter(|entry| chain.contains(&entry.item))
            .filter(|entry| {
                self.get(&entry.item)
                    .is_some_and(|correct| *correct != entry.uid)
            })
            .collect()
    }
}

/// Edit counts for one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvergenceStats {
    pub anchor_position: usize,
    pub already_placed: usize,
    pub moved: usize,
    pub inserted: usize,
    pub strays_removed: usize,
    pub removal_failures: usize,
}

impl ConvergenceStats {
    /// Successful edits issued against the queue.
    pub const fn edits(&self) -> usize {
        self.moved + self.inserted + self.strays_removed
    }
}

/// Result of converging one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ChainOutcome {
    /// No chain member is visible in the queue.
    NoAnchor,
    /// Every item was placed and strays were cleaned up.
    Converged(ConvergenceStats),
    /// Placement stopped at `failed_index`; cleanup still ran for earlier items.
    Partial {
        stats: ConvergenceStats,
        failed_index: usize,
        item: ItemId,
        reason: String,
    },
    /// The queue could not be read before this chain started.
    Abandoned { reason: String },
}

impl ChainOutcome {
    pub fn stats(&self) -> Option<&ConvergenceStats> {
        match self {
            Self::Converged(stats) | Self::Partial { stats, .. } => Some(stats),
            Self::NoAnchor | Self::Abandoned { .. } => None,
        }
    }

    pub fn edits(&self) -> usize {
        self.stats().map_or(0, ConvergenceStats::edits)
    }

    pub const fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }
}

/// Why an enforcement run did or did not touch the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementStatus {
    ShuffleInactive,
    NoChains,
    Ran,
}

/// Summary of one `enforce` call.
#[derive(Debug, Clone, Serialize)]
pub struct EnforcementReport {
    pub container: ContainerId,
    pub status: EnforcementStatus,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<(Chain, ChainOutcome)>,
}

impl EnforcementReport {
    pub fn new(container: ContainerId, status: EnforcementStatus) -> Self {
        Self {
            container,
            status,
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn total_edits(&self) -> usize {
        self.outcomes.iter().map(|(_, outcome)| outcome.edits()).sum()
    }

    pub fn converged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_converged())
            .count()
    }
}
