//! Domain layer for chained-songs
//!
//! This module contains the chain and queue models, the error types and the
//! port traits that adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, EnforcementError, QueueError};
