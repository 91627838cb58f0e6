//! Player-facing glue: chain and clear actions, track-change handling.
//!
//! Turns host events into store updates and enforcement runs, and reports
//! the result to the user through the [`Notifier`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Chain, ChainOutcome, ContainerId, EnforcementReport, EnforcementStatus, ItemId,
};
use crate::domain::ports::{ChainStore, Notifier, QueueAccess};
use crate::services::chain_enforcer::ChainEnforcer;

/// Smallest chain the "chain selected items" action accepts.
pub const MIN_CHAIN_LEN: usize = 2;

/// Events delivered by the host player.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// Playback moved to another track; carries the player's context URI.
    TrackChanged { context_uri: Option<String> },
    /// The user asked to chain the selected items.
    ChainSelected {
        context: Option<ContainerId>,
        items: Vec<ItemId>,
    },
    /// The user asked to forget every chain of a container.
    ClearChains { context: Option<ContainerId> },
    /// Stop the event loop.
    Shutdown,
}

/// Turns player events into store updates and enforcement runs.
pub struct ChainService {
    store: Arc<dyn ChainStore>,
    enforcer: Arc<ChainEnforcer>,
    notifier: Arc<dyn Notifier>,
    trigger_delay: Duration,
}

impl ChainService {
    /// Service with the default trigger delay.
    pub fn new(
        store: Arc<dyn ChainStore>,
        enforcer: Arc<ChainEnforcer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            enforcer,
            notifier,
            trigger_delay: Duration::from_millis(300),
        }
    }

    /// Wait this long after a track change before enforcing, so the host has
    /// finished rebuilding its queue.
    pub const fn with_trigger_delay(mut self, delay: Duration) -> Self {
        self.trigger_delay = delay;
        self
    }

    /// Store the selected items as a chain of `container`.
    ///
    /// Returns the chain length on success. Every outcome is also reported
    /// through the notifier.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn chain_selected(
        &self,
        container: Option<&ContainerId>,
        items: Vec<ItemId>,
    ) -> DomainResult<usize> {
        let Some(container) = container else {
            self.notifier
                .notify("Could not determine current playlist", true);
            return Err(DomainError::ContainerUnresolved);
        };

        let result = self.save_selection(container, items).await;
        match &result {
            Ok(len) => self.notifier.notify(&format!("Chained {len} songs!"), false),
            Err(err) => {
                error!(container = %container, error = %err, "failed to chain songs");
                self.notifier.notify("Failed to chain songs", true);
            }
        }
        result
    }

    async fn save_selection(&self, container: &ContainerId, items: Vec<ItemId>) -> DomainResult<usize> {
        if items.len() < MIN_CHAIN_LEN {
            return Err(DomainError::ValidationFailed(format!(
                "a chain needs at least {MIN_CHAIN_LEN} items, got {}",
                items.len()
            )));
        }

        let chain = Chain::new(items).map_err(DomainError::ValidationFailed)?;
        let len = chain.len();
        self.store.save_chain(container, chain).await?;
        info!(container = %container, len, "chain saved");
        Ok(len)
    }

    /// Forget every chain of `container`.
    #[instrument(skip(self))]
    pub async fn clear_chains(&self, container: Option<&ContainerId>) -> DomainResult<()> {
        let Some(container) = container else {
            self.notifier
                .notify("Could not determine current playlist", true);
            return Err(DomainError::ContainerUnresolved);
        };

        match self.store.clear_chains(container).await {
            Ok(()) => {
                info!(container = %container, "chains cleared");
                self.notifier
                    .notify("All chains cleared for this playlist", false);
                Ok(())
            }
            Err(err) => {
                error!(container = %container, error = %err, "failed to clear chains");
                self.notifier.notify("Failed to clear chains", true);
                Err(err)
            }
        }
    }

    /// React to a track change: wait for the host, then enforce the chains of
    /// the playing container.
    ///
    /// Returns `None` when nothing ran (no resolvable context, or a failure
    /// that was already reported).
    #[instrument(skip(self))]
    pub async fn track_changed(&self, context_uri: Option<&str>) -> Option<EnforcementReport> {
        let Some(container) = context_uri.and_then(ContainerId::normalize) else {
            debug!("track changed outside of a known container");
            return None;
        };

        if !self.trigger_delay.is_zero() {
            tokio::time::sleep(self.trigger_delay).await;
        }

        match self.enforcer.enforce(&container).await {
            Ok(report) => {
                self.report_partial_chains(&report);
                Some(report)
            }
            Err(err) => {
                error!(container = %container, error = %err, "failed to enforce chain order");
                self.notifier.notify("Failed to enforce song chains", true);
                None
            }
        }
    }

    fn report_partial_chains(&self, report: &EnforcementReport) {
        if report.status != EnforcementStatus::Ran {
            return;
        }
        for (_, outcome) in &report.outcomes {
            if let ChainOutcome::Partial { failed_index, .. } = outcome {
                self.notifier
                    .notify(&format!("Failed to chain song {}", failed_index + 1), true);
            }
        }
    }

    /// Handle events one at a time until the channel closes or `Shutdown` arrives.
    pub async fn run(&self, mut events: mpsc::Receiver<PlayerEvent>) {
        info!("chain service listening for player events");
        while let Some(event) = events.recv().await {
            match event {
                PlayerEvent::TrackChanged { context_uri } => {
                    self.track_changed(context_uri.as_deref()).await;
                }
                PlayerEvent::ChainSelected { context, items } => {
                    if let Err(err) = self.chain_selected(context.as_ref(), items).await {
                        debug!(error = %err, "chain request not saved");
                    }
                }
                PlayerEvent::ClearChains { context } => {
                    if let Err(err) = self.clear_chains(context.as_ref()).await {
                        debug!(error = %err, "clear request failed");
                    }
                }
                PlayerEvent::Shutdown => break,
            }
        }
        info!("chain service stopped");
    }
}

/// Poll the host until its queue is reachable.
///
/// Gives up after `max_attempts` polls when set; returns whether the host
/// became ready.
pub async fn wait_until_ready(
    queue: &dyn QueueAccess,
    poll_interval: Duration,
    max_attempts: Option<usize>,
) -> bool {
    let mut attempts = 0usize;
    loop {
        if queue.is_available().await {
            debug!(attempts, "host queue ready");
            return true;
        }

        attempts += 1;
        if max_attempts.is_some_and(|max| attempts >= max) {
            warn!(attempts, "host queue never became available");
            return false;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notify::RecordingNotifier;
    use crate::adapters::queue::InMemoryQueue;
    use crate::adapters::store::InMemoryChainStore;
    use crate::domain::ports::Immediate;

    struct Fixture {
        service: ChainService,
        store: Arc<InMemoryChainStore>,
        queue: Arc<InMemoryQueue>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(items: &[&str]) -> Fixture {
        let queue = Arc::new(InMemoryQueue::from_items(items));
        let store = Arc::new(InMemoryChainStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let enforcer = Arc::new(ChainEnforcer::new(
            store.clone(),
            queue.clone(),
            queue.clone(),
            Arc::new(Immediate),
        ));
        let service = ChainService::new(store.clone(), enforcer, notifier.clone())
            .with_trigger_delay(Duration::ZERO);
        Fixture {
            service,
            store,
            queue,
            notifier,
        }
    }

    fn playlist() -> ContainerId {
        ContainerId::normalize("spotify:playlist:p1").unwrap()
    }

    fn items(ids: &[&str]) -> Vec<ItemId> {
        ids.iter().map(|s| ItemId::from(*s)).collect()
    }

    #[tokio::test]
    async fn test_chain_selected_saves_and_notifies() {
        let f = fixture(&[]);

        let len = f
            .service
            .chain_selected(Some(&playlist()), items(&["a", "b", "c"]))
            .await
            .unwrap();

        assert_eq!(len, 3);
        assert_eq!(f.store.get_chains().await.chains_for(&playlist()).len(), 1);
        assert_eq!(
            f.notifier.messages(),
            vec![("Chained 3 songs!".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_chain_selected_needs_two_items() {
        let f = fixture(&[]);

        let result = f
            .service
            .chain_selected(Some(&playlist()), items(&["a"]))
            .await;

        assert!(matches!(result, Err(DomainError::ValidationFailed(_))));
        assert!(f.store.get_chains().await.is_empty());
        assert_eq!(
            f.notifier.messages(),
            vec![("Failed to chain songs".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_chain_selected_without_container() {
        let f = fixture(&[]);

        let result = f.service.chain_selected(None, items(&["a", "b"])).await;

        assert!(matches!(result, Err(DomainError::ContainerUnresolved)));
        assert_eq!(
            f.notifier.messages(),
            vec![("Could not determine current playlist".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_clear_chains_notifies() {
        let f = fixture(&[]);
        f.service
            .chain_selected(Some(&playlist()), items(&["a", "b"]))
            .await
            .unwrap();

        f.service.clear_chains(Some(&playlist())).await.unwrap();

        assert!(f.store.get_chains().await.is_empty());
        assert_eq!(
            f.notifier.messages().last().unwrap(),
            &("All chains cleared for this playlist".to_string(), false)
        );
    }

    #[tokio::test]
    async fn test_track_changed_enforces_normalized_context() {
        let f = fixture(&["b", "x", "a"]);
        f.store
            .save_chain(&playlist(), Chain::new(items(&["a", "b"])).unwrap())
            .await
            .unwrap();

        let report = f
            .service
            .track_changed(Some("spotify:user:bob:playlist:p1"))
            .await
            .unwrap();

        assert_eq!(report.converged_count(), 1);
        assert_eq!(f.queue.items().await, vec!["a", "b", "x"]);
    }

    #[tokio::test]
    async fn test_track_changed_reports_enforcement_failure() {
        let f = fixture(&["a", "b"]);
        f.queue.set_available(false).await;

        let report = f.service.track_changed(Some("spotify:playlist:p1")).await;

        assert!(report.is_none());
        assert_eq!(
            f.notifier.messages(),
            vec![("Failed to enforce song chains".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_track_changed_reports_partial_chain() {
        let f = fixture(&["a", "x", "y"]);
        f.store
            .save_chain(&playlist(), Chain::new(items(&["a", "b"])).unwrap())
            .await
            .unwrap();
        f.queue.reject_inserts_of("b").await;

        f.service.track_changed(Some("spotify:playlist:p1")).await;

        assert_eq!(
            f.notifier.messages(),
            vec![("Failed to chain song 2".to_string(), true)]
        );
    }

    #[tokio::test]
    async fn test_track_changed_without_context_does_nothing() {
        let f = fixture(&["a"]);

        assert!(f.service.track_changed(None).await.is_none());
        assert!(!f.queue.counters().await.touched());
    }

    #[tokio::test]
    async fn test_event_loop_processes_in_order_until_shutdown() {
        let f = fixture(&["b", "x", "a"]);
        let (tx, rx) = mpsc::channel(8);

        tx.send(PlayerEvent::ChainSelected {
            context: Some(playlist()),
            items: items(&["a", "b"]),
        })
        .await
        .unwrap();
        tx.send(PlayerEvent::TrackChanged {
            context_uri: Some("spotify:playlist:p1".to_string()),
        })
        .await
        .unwrap();
        tx.send(PlayerEvent::Shutdown).await.unwrap();
        tx.send(PlayerEvent::ClearChains {
            context: Some(playlist()),
        })
        .await
        .unwrap();

        f.service.run(rx).await;

        assert_eq!(f.queue.items().await, vec!["a", "b", "x"]);
        assert_eq!(f.store.get_chains().await.chain_count(), 1);
    }

    #[tokio::test]
    async fn test_wait_until_ready_gives_up() {
        let queue = InMemoryQueue::from_items(&[]).with_available(false);
        assert!(!wait_until_ready(&queue, Duration::from_millis(1), Some(3)).await);
    }

    #[tokio::test]
    async fn test_wait_until_ready_sees_host_come_up() {
        let queue = Arc::new(InMemoryQueue::from_items(&[]).with_available(false));
        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move {
                wait_until_ready(&*queue, Duration::from_millis(5), None).await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        queue.set_available(true).await;

        assert!(waiter.await.unwrap());
    }
}
