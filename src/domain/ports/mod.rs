//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces the core consumes:
//! - ChainStore: chain definitions per container
//! - QueueAccess: reads and single-item edits of the host queue
//! - PlaybackMode: shuffle state of the host player
//! - SettlePolicy: wait applied after each queue insert
//! - Notifier: user-facing status messages
//!
//! Adapters and test fakes implement these; nothing in the core reaches for
//! a global host handle.

pub mod chain_store;
pub mod notifier;
pub mod queue_access;
pub mod settle;

pub use chain_store::ChainStore;
pub use notifier::Notifier;
pub use queue_access::{PlaybackMode, QueueAccess};
pub use settle::{FixedDelay, Immediate, SettlePolicy};
