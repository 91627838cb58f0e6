//! Adapters implementing the domain ports.

pub mod notify;
pub mod queue;
pub mod store;
