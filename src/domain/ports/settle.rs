//! Wait policy applied after each queue insert.
//!
//! The host may apply an edit after acknowledging it, so the engine pauses
//! before reading back the uid it just created.

use async_trait::async_trait;
use std::time::Duration;

/// How long to wait before trusting the queue after an edit.
#[async_trait]
pub trait SettlePolicy: Send + Sync {
    /// Wait until the last edit is expected to be visible.
    async fn settle(&self);
}

/// Sleep for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SettlePolicy for FixedDelay {
    async fn settle(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Never wait. For hosts that apply edits before acknowledging them, and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

#[async_trait]
impl SettlePolicy for Immediate {
    async fn settle(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_delay_sleeps() {
        let policy = FixedDelay::from_millis(20);
        let start = tokio::time::Instant::now();
        policy.settle().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_immediate_returns() {
        Immediate.settle().await;
    }
}
