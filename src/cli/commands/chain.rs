//! `chain`: save songs as a chain of a playlist or album.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::{build_service, chain_store, load_player_or_empty, state_path};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::{resolve_active_container, ContainerId, ItemId};

#[derive(Args, Debug)]
pub struct ChainArgs {
    /// Songs to chain, in play order
    #[arg(required = true, num_args = 1..)]
    pub items: Vec<String>,

    /// Playlist or album URI; defaults to the page open in the player
    #[arg(long)]
    pub context: Option<String>,

    /// Player state file used to resolve the current playlist
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ChainOutput {
    pub success: bool,
    pub container: String,
    pub length: usize,
    pub items: Vec<String>,
}

impl CommandOutput for ChainOutput {
    fn to_human(&self) -> String {
        format!("Chained {} songs in {}", self.length, self.container)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ChainArgs, config: &Config, json_mode: bool) -> Result<()> {
    let store = chain_store(config);
    let player = load_player_or_empty(&state_path(config, args.state)).await?;

    let container = match args.context.as_deref() {
        Some(uri) => ContainerId::normalize(uri),
        None => resolve_active_container(player.navigation_path(), player.context_uri()),
    };

    let items: Vec<ItemId> = args.items.into_iter().map(ItemId::new).collect();
    let service = build_service(config, store, player);
    let length = service
        .chain_selected(container.as_ref(), items.clone())
        .await
        .context("Failed to chain songs")?;

    let out = ChainOutput {
        success: true,
        container: container.map(|c| c.to_string()).unwrap_or_default(),
        length,
        items: items.iter().map(ToString::to_string).collect(),
    };
    output(&out, json_mode);
    Ok(())
}
