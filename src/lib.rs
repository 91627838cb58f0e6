//! Chained Songs - keep chosen songs together in a shuffled play queue
//!
//! Users pick an ordered run of songs inside a playlist or album (a *chain*).
//! Whenever playback moves on with shuffle enabled, the upcoming queue is
//! edited so each chain plays contiguously and in order, starting where its
//! first member would have played anyway.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): convergence engine, enforcer and player glue
//! - **Adapters** (`adapters`): chain stores, queue hosts and notifiers
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chained_songs::adapters::queue::InMemoryQueue;
//! use chained_songs::adapters::store::InMemoryChainStore;
//! use chained_songs::domain::ports::Immediate;
//! use chained_songs::ChainEnforcer;
//!
//! let queue = Arc::new(InMemoryQueue::from_items(&["b", "x", "a"]));
//! let enforcer = ChainEnforcer::new(
//!     Arc::new(InMemoryChainStore::new()),
//!     queue.clone(),
//!     queue,
//!     Arc::new(Immediate),
//! );
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Chain, ChainBook, ChainOutcome, Config, ContainerId, EnforcementReport, EnforcementStatus,
    InstanceId, ItemId, LoggingConfig, QueueEntry, QueueSnapshot,
};
pub use domain::ports::{ChainStore, Notifier, PlaybackMode, QueueAccess, SettlePolicy};
pub use domain::{DomainError, DomainResult, EnforcementError, QueueError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ChainEnforcer, ChainService, ConvergenceEngine, PlayerEvent};
