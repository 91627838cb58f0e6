//! CLI command implementations.

pub mod chain;
pub mod clear;
pub mod enforce;
pub mod list;
pub mod queue;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::notify::TracingNotifier;
use crate::adapters::queue::{JsonFilePlayer, PlayerState};
use crate::adapters::store::JsonFileChainStore;
use crate::domain::models::config::Config;
use crate::domain::ports::FixedDelay;
use crate::services::{ChainEnforcer, ChainService};

/// Player state path: the command-line override, or the configured one.
pub(crate) fn state_path(config: &Config, state: Option<PathBuf>) -> PathBuf {
    state.unwrap_or_else(|| PathBuf::from(&config.player.state_path))
}

/// Load the player state file, failing if it does not exist.
pub(crate) async fn load_player(path: &Path) -> Result<Arc<JsonFilePlayer>> {
    let player = JsonFilePlayer::load(path)
        .await
        .with_context(|| format!("Failed to load player state from {}", path.display()))?;
    Ok(Arc::new(player))
}

/// Load the player state file, or start from an empty player when it is absent.
pub(crate) async fn load_player_or_empty(path: &Path) -> Result<Arc<JsonFilePlayer>> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        load_player(path).await
    } else {
        Ok(Arc::new(JsonFilePlayer::from_state(path, PlayerState::default())))
    }
}

pub(crate) fn chain_store(config: &Config) -> Arc<JsonFileChainStore> {
    Arc::new(JsonFileChainStore::new(&config.store.path))
}

pub(crate) fn build_enforcer(
    config: &Config,
    store: Arc<JsonFileChainStore>,
    player: Arc<JsonFilePlayer>,
) -> Arc<ChainEnforcer> {
    let settle = Arc::new(FixedDelay::from_millis(config.enforcement.settle_delay_ms));
    Arc::new(ChainEnforcer::new(store, player.clone(), player, settle))
}

/// Wire the chain service against the configured store and player.
pub(crate) fn build_service(
    config: &Config,
    store: Arc<JsonFileChainStore>,
    player: Arc<JsonFilePlayer>,
) -> ChainService {
    let enforcer = build_enforcer(config, store.clone(), player);
    ChainService::new(store, enforcer, Arc::new(TracingNotifier))
        .with_trigger_delay(Duration::from_millis(config.enforcement.trigger_delay_ms))
}
