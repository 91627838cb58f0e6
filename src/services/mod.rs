//! Service layer: chain convergence, enforcement and player glue.

pub mod chain_enforcer;
pub mod chain_service;
pub mod convergence_engine;

pub use chain_enforcer::ChainEnforcer;
pub use chain_service::{wait_until_ready, ChainService, PlayerEvent, MIN_CHAIN_LEN};
pub use convergence_engine::ConvergenceEngine;
