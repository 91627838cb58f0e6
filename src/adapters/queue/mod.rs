//! Host queue adapters.

pub mod json_player;
pub mod memory;

pub use json_player::{JsonFilePlayer, PlayerState, TrackRef};
pub use memory::{InMemoryQueue, QueueCounters};
