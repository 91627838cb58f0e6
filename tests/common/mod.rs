//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chained_songs::adapters::queue::{PlayerState, TrackRef};
use chained_songs::domain::models::config::Config;
use chained_songs::{Chain, ContainerId, ItemId};
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn chain(items: &[&str]) -> Chain {
    Chain::new(items.iter().map(|s| ItemId::from(*s)).collect()).expect("valid chain")
}

pub fn playlist(id: &str) -> ContainerId {
    ContainerId::normalize(&format!("spotify:user:tester:playlist:{id}")).expect("valid uri")
}

/// Player state with shuffle on, playing `context_uri`, with the given upcoming tracks.
pub fn shuffled_state(context_uri: &str, tracks: &[&str]) -> PlayerState {
    PlayerState {
        shuffle: true,
        context_uri: Some(context_uri.to_string()),
        next_up: tracks
            .iter()
            .enumerate()
            .map(|(i, uri)| TrackRef {
                uri: (*uri).to_string(),
                uid: Some(format!("uid{i}")),
            })
            .collect(),
        ..PlayerState::default()
    }
}

/// Write a player state file and return its path.
pub fn write_state(dir: &Path, state: &PlayerState) -> PathBuf {
    let path = dir.join("player.json");
    let json = serde_json::to_string_pretty(state).expect("serializable state");
    std::fs::write(&path, json).expect("write player state");
    path
}

/// Config whose store and player files live under `dir`, with no delays.
pub fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.store.path = dir.join("chains.json").display().to_string();
    config.player.state_path = dir.join("player.json").display().to_string();
    config.enforcement.settle_delay_ms = 0;
    config.enforcement.trigger_delay_ms = 0;
    config.enforcement.ready_poll_ms = 1;
    config
}

/// Track uris of a player state file, in queue order.
pub fn queued_uris(path: &Path) -> Vec<String> {
    let raw = std::fs::read_to_string(path).expect("read player state");
    let state: PlayerState = serde_json::from_str(&raw).expect("valid player state");
    state.next_up.into_iter().map(|track| track.uri).collect()
}
