use async_trait::async_trait;

use crate::domain::errors::QueueError;
use crate::domain::models::{InstanceId, ItemId, QueueSnapshot};

/// Port onto the host's upcoming playback queue.
///
/// The host only offers reads of the whole (possibly truncated) queue and two
/// single-item edits. Every successful insert mints a fresh [`InstanceId`], so
/// positions and uids must be re-read after each edit.
#[async_trait]
pub trait QueueAccess: Send + Sync {
    /// Whether the host queue can currently be reached.
    async fn is_available(&self) -> bool;

    /// Read the upcoming queue in play order.
    async fn snapshot(&self) -> Result<QueueSnapshot, QueueError>;

    /// Insert `item` immediately before the entry whose uid is `before`.
    ///
    /// Fails with [`QueueError::InstanceNotFound`] if `before` is gone.
    async fn insert_before(&self, item: &ItemId, before: &InstanceId) -> Result<(), QueueError>;

    /// Remove the exact occurrence `uid` of `item`.
    async fn remove(&self, item: &ItemId, uid: &InstanceId) -> Result<(), QueueError>;
}

/// Port onto the host's playback mode.
#[async_trait]
pub trait PlaybackMode: Send + Sync {
    /// True while shuffle (randomized playback) is on.
    async fn is_shuffle_active(&self) -> Result<bool, QueueError>;
}
