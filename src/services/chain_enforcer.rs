//! Enforcement entry point: applies every chain of a container to the queue.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::EnforcementError;
use crate::domain::models::{ChainOutcome, ContainerId, EnforcementReport, EnforcementStatus};
use crate::domain::ports::{ChainStore, PlaybackMode, QueueAccess, SettlePolicy};
use crate::services::convergence_engine::ConvergenceEngine;

/// Runs the convergence engine over a container's chains, one chain at a time.
///
/// Chains are never processed concurrently: each one edits the shared queue,
/// and the next chain's anchor depends on the result.
pub struct ChainEnforcer {
    store: Arc<dyn ChainStore>,
    queue: Arc<dyn QueueAccess>,
    mode: Arc<dyn PlaybackMode>,
    engine: ConvergenceEngine,
}

impl ChainEnforcer {
    pub fn new(
        store: Arc<dyn ChainStore>,
        queue: Arc<dyn QueueAccess>,
        mode: Arc<dyn PlaybackMode>,
        settle: Arc<dyn SettlePolicy>,
    ) -> Self {
        let engine = ConvergenceEngine::new(queue.clone(), settle);
        Self {
            store,
            queue,
            mode,
            engine,
        }
    }

    /// Enforce every chain stored for `container`.
    ///
    /// Returns early, without touching the queue, when shuffle is off or the
    /// container has no chains. Fails only when the playback mode or the queue
    /// cannot be reached before the first edit.
    #[instrument(skip(self), fields(container = %container))]
    pub async fn enforce(
        &self,
        container: &ContainerId,
    ) -> Result<EnforcementReport, EnforcementError> {
        let shuffle = self
            .mode
            .is_shuffle_active()
            .await
            .map_err(|err| EnforcementError::unavailable("playback mode", err.to_string()))?;
        if !shuffle {
            debug!("shuffle is off, queue order is already authored");
            return Ok(EnforcementReport::new(
                container.clone(),
                EnforcementStatus::ShuffleInactive,
            ));
        }

        if !self.queue.is_available().await {
            return Err(EnforcementError::unavailable(
                "queue",
                "host queue is not reachable",
            ));
        }

        let book = self.store.get_chains().await;
        let chains = book.chains_for(container);
        if chains.is_empty() {
            debug!("no chains for container");
            return Ok(EnforcementReport::new(
                container.clone(),
                EnforcementStatus::NoChains,
            ));
        }

        let initial = self
            .queue
            .snapshot()
            .await
            .map_err(|err| EnforcementError::unavailable("queue", err.to_string()))?;

        let mut report = EnforcementReport::new(container.clone(), EnforcementStatus::Ran);
        for (index, chain) in chains.iter().enumerate() {
            let outcome = if index == 0 {
                self.engine.converge(chain, &initial).await
            } else {
                match self.queue.snapshot().await {
                    Ok(snapshot) => self.engine.converge(chain, &snapshot).await,
                    Err(err) => {
                        warn!(chain = %chain, error = %err, "could not read queue, skipping chain");
                        ChainOutcome::Abandoned {
                            reason: err.to_string(),
                        }
                    }
                }
            };
            report.outcomes.push((chain.clone(), outcome));
        }

        info!(
            chains = report.outcomes.len(),
            converged = report.converged_count(),
            edits = report.total_edits(),
            "chain enforcement finished"
        );
        Ok(report)
    }
}
