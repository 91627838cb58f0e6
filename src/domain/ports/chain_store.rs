use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Chain, ChainBook, ContainerId};

/// Persistence port for chain definitions.
///
/// Implementations keep a single `container -> chains` record and rewrite it
/// whole on every change (last write wins).
///
/// # Examples
///
/// ```no_run
/// use chained_songs::domain::models::{Chain, ContainerId};
/// use chained_songs::domain::ports::ChainStore;
///
/// async fn example(store: &dyn ChainStore) -> chained_songs::domain::DomainResult<()> {
///     let playlist = ContainerId::normalize("spotify:playlist:abc").unwrap();
///     let chain = Chain::new(vec!["spotify:track:1".into(), "spotify:track:2".into()]).unwrap();
///     store.save_chain(&playlist, chain).await?;
///     assert_eq!(store.get_chains().await.chains_for(&playlist).len(), 1);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Load every container's chains.
    ///
    /// Never fails: missing or unreadable data yields an empty book.
    async fn get_chains(&self) -> ChainBook;

    /// Append a chain to a container after evicting every chain that shares
    /// an item with it, then persist the whole record.
    async fn save_chain(&self, container: &ContainerId, chain: Chain) -> DomainResult<()>;

    /// Remove all chains of a container. No-op when it has none.
    async fn clear_chains(&self, container: &ContainerId) -> DomainResult<()>;
}
