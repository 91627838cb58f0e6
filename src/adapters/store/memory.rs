//! In-memory chain store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Chain, ChainBook, ContainerId};
use crate::domain::ports::ChainStore;

/// Chain store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryChainStore {
    book: RwLock<ChainBook>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(book: ChainBook) -> Self {
        Self {
            book: RwLock::new(book),
        }
    }
}

#[async_trait]
impl ChainStore for InMemoryChainStore {
    async fn get_chains(&self) -> ChainBook {
        self.book.read().await.clone()
    }

    async fn save_chain(&self, container: &ContainerId, chain: Chain) -> DomainResult<()> {
        self.book.write().await.add_chain(container.clone(), chain);
        Ok(())
    }

    async fn clear_chains(&self, container: &ContainerId) -> DomainResult<()> {
        self.book.write().await.clear(container);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ItemId;

    fn chain(items: &[&str]) -> Chain {
        Chain::new(items.iter().map(|s| ItemId::from(*s)).collect()).unwrap()
    }

    #[tokio::test]
    async fn test_seeded_book_is_visible_and_editable() {
        let album = ContainerId::normalize("spotify:album:x").unwrap();
        let mut book = ChainBook::new();
        book.add_chain(album.clone(), chain(&["a", "b"]));
        let store = InMemoryChainStore::with_book(book);

        store.save_chain(&album, chain(&["b", "c"])).await.unwrap();

        assert_eq!(store.get_chains().await.chains_for(&album), &[chain(&["b", "c"])]);

        store.clear_chains(&album).await.unwrap();
        assert!(store.get_chains().await.is_empty());
    }
}
