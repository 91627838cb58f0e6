//! Domain models for chains, containers and the host queue.

pub mod chain;
pub mod config;
pub mod container;
pub mod enforcement;
pub mod queue;

pub use chain::{Chain, ChainBook, ItemId};
pub use config::{Config, EnforcementConfig, LoggingConfig, PlayerConfig, StoreConfig};
pub use container::{resolve_active_container, ContainerId};
pub use enforcement::{
    ChainOutcome, ChainPhase, ChainRun, ConvergenceStats, EnforcementReport, EnforcementStatus,
    PlacementMap,
};
pub use queue::{Anchor, InstanceId, QueueEntry, QueueSnapshot};
