//! `clear`: forget every chain of a playlist or album.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::{build_service, chain_store, load_player_or_empty, state_path};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::{resolve_active_container, ContainerId};

#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Playlist or album URI; defaults to the page open in the player
    #[arg(long)]
    pub context: Option<String>,

    /// Player state file used to resolve the current playlist
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ClearOutput {
    pub success: bool,
    pub container: String,
}

impl CommandOutput for ClearOutput {
    fn to_human(&self) -> String {
        format!("All chains cleared for {}", self.container)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ClearArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = chain_store(config);
    let player = load_player_or_empty(&state_path(config, args.state)).await?;

    let container = match args.context.as_deref() {
        Some(uri) => ContainerId::normalize(uri),
        None => resolve_active_container(player.navigation_path(), player.context_uri()),
    };

    let service = build_service(config, store, player);
    service
        .clear_chains(container.as_ref())
        .await
        .context("Failed to clear chains")?;

    let out = ClearOutput {
        success: true,
        container: container.map(|c| c.to_string()).unwrap_or_default(),
    };
    output(&out, json_mode);
    Ok(())
}
