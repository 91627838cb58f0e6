//! Domain errors for the chained-songs system.

use thiserror::Error;

use super::models::{InstanceId, ItemId};

/// Domain-level errors raised by chain definition and storage.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Could not determine the current container")]
    ContainerUnresolved,
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

/// Failures reported by the host queue port.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    #[error("Instance {uid} of {item} is not in the queue")]
    InstanceNotFound { item: ItemId, uid: InstanceId },

    #[error("Queue edit rejected: {0}")]
    Rejected(String),
}

/// Failures that abort a whole enforcement call before any edit is made.
#[derive(Debug, Error)]
pub enum EnforcementError {
    #[error("{dependency} unavailable: {reason}")]
    Unavailable {
        dependency: &'static str,
        reason: String,
    },
}

impl EnforcementError {
    pub fn unavailable(dependency: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            dependency,
            reason: reason.into(),
        }
    }
}
