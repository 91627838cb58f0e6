//! Queue convergence for a single chain.
//!
//! Drives the host queue until the chain's items sit back to back, in chain
//! order, starting where the first chain member was found (the anchor), then
//! removes the occurrences left behind by moves.
//!
//! The host has no reorder primitive: the only way to move an item is to
//! insert it again before some other entry, which creates a new occurrence
//! with a new uid. Every placement step therefore reads the queue again,
//! decides, edits, and reads back the uid it produced.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::QueueError;
use crate::domain::models::{
    Anchor, Chain, ChainOutcome, ChainPhase, ChainRun, ConvergenceStats, InstanceId, ItemId,
    PlacementMap, QueueSnapshot,
};
use crate::domain::ports::{QueueAccess, SettlePolicy};

/// What a single placement step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    AlreadyPlaced,
    Moved,
    Inserted,
}

/// Why a placement step stopped the chain.
#[derive(Debug, thiserror::Error)]
enum PlacementError {
    #[error("queue read failed: {0}")]
    Read(QueueError),

    #[error("no queue entry at position {0}")]
    TargetOutOfRange(usize),

    #[error("insert rejected: {0}")]
    Insert(QueueError),
}

/// Drives the host queue until one chain plays contiguously from its anchor.
pub struct ConvergenceEngine {
    queue: Arc<dyn QueueAccess>,
    settle: Arc<dyn SettlePolicy>,
}

impl ConvergenceEngine {
    /// Engine editing `queue`, pausing with `settle` after every insert.
    pub fn new(queue: Arc<dyn QueueAccess>, settle: Arc<dyn SettlePolicy>) -> Self {
        Self { queue, settle }
    }

    /// Converge one chain, starting from `snapshot` to locate the anchor.
    ///
    /// Never fails: a missing anchor, a rejected insert or a rejected removal
    /// is folded into the returned [`ChainOutcome`].
    #[instrument(skip(self, chain, snapshot), fields(chain = %chain, queue_len = snapshot.len()))]
    pub async fn converge(&self, chain: &Chain, snapshot: &QueueSnapshot) -> ChainOutcome {
        let mut run = ChainRun::new();

        let Some(anchor) = snapshot.find_anchor(chain) else {
            advance(&mut run, ChainPhase::Abandoned);
            warn!("none of the chained items are in the visible queue, skipping chain");
            return ChainOutcome::NoAnchor;
        };
        advance(&mut run, ChainPhase::AnchorFound);
        debug!(anchor = %anchor.item, position = anchor.position, "anchor found");

        let mut stats = ConvergenceStats {
            anchor_position: anchor.position,
            ..ConvergenceStats::default()
        };
        let mut placement = PlacementMap::new();
        let mut failure = None;

        for (index, desired) in chain.items().iter().enumerate() {
            advance(&mut run, ChainPhase::Placing { index });

            match self.place(desired, &anchor, index, &mut placement).await {
                Ok(Placement::AlreadyPlaced) => stats.already_placed += 1,
                Ok(Placement::Moved) => stats.moved += 1,
                Ok(Placement::Inserted) => stats.inserted += 1,
                Err(err) => {
                    warn!(item = %desired, index, error = %err, "failed to place chained item, stopping chain");
                    failure = Some((index, desired.clone(), err.to_string()));
                    break;
                }
            }
        }

        advance(&mut run, ChainPhase::CleaningDuplicates);
        self.remove_strays(chain, &placement, &mut stats).await;
        advance(&mut run, ChainPhase::Done);

        info!(
            moved = stats.moved,
            inserted = stats.inserted,
            removed = stats.strays_removed,
            "chain processed"
        );

        match failure {
            None => ChainOutcome::Converged(stats),
            Some((failed_index, item, reason)) => ChainOutcome::Partial {
                stats,
                failed_index,
                item,
                reason,
            },
        }
    }

    /// Read, decide, act, re-verify for one chain position.
    async fn place(
        &self,
        desired: &ItemId,
        anchor: &Anchor,
        index: usize,
        placement: &mut PlacementMap,
    ) -> Result<Placement, PlacementError> {
        let target_pos = anchor.position + index;
        let current = self.queue.snapshot().await.map_err(PlacementError::Read)?;
        let target = current
            .entry_at(target_pos)
            .ok_or(PlacementError::TargetOutOfRange(target_pos))?;

        if target.item == *desired {
            placement.record(desired.clone(), target.uid.clone());
            return Ok(Placement::AlreadyPlaced);
        }

        let action = if current.contains(desired) {
            Placement::Moved
        } else {
            debug!(item = %desired, "item not in visible queue, inserting a new occurrence");
            Placement::Inserted
        };

        self.queue
            .insert_before(desired, &target.uid)
            .await
            .map_err(PlacementError::Insert)?;
        self.settle.settle().await;

        match self.uid_at(target_pos).await {
            Some(uid) => placement.record(desired.clone(), uid),
            None => debug!(item = %desired, target_pos, "could not read back placed uid"),
        }

        Ok(action)
    }

    async fn uid_at(&self, position: usize) -> Option<InstanceId> {
        match self.queue.snapshot().await {
            Ok(snapshot) => snapshot.entry_at(position).map(|entry| entry.uid.clone()),
            Err(err) => {
                debug!(error = %err, "queue read after insert failed");
                None
            }
        }
    }

    /// Remove every chain-item occurrence whose uid is not the placed one.
    async fn remove_strays(
        &self,
        chain: &Chain,
        placement: &PlacementMap,
        stats: &mut ConvergenceStats,
    ) {
        if placement.is_empty() {
            return;
        }

        let snapshot = match self.queue.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "could not read queue for duplicate cleanup");
                return;
            }
        };

        let strays = placement.strays(chain, &snapshot);
        if !strays.is_empty() {
            debug!(count = strays.len(), placed = placement.len(), "removing stray duplicates");
        }

        for entry in strays {
            match self.queue.remove(&entry.item, &entry.uid).await {
                Ok(()) => stats.strays_removed += 1,
                Err(err) => {
                    stats.removal_failures += 1;
                    warn!(item = %entry.item, uid = %entry.uid, error = %err, "failed to remove duplicate");
                }
            }
        }
    }
}

fn advance(run: &mut ChainRun, next: ChainPhase) {
    if let Err(err) = run.transition_to(next) {
        warn!(error = %err, "unexpected chain phase transition");
    }
}
