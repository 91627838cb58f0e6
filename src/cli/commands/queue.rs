//! `queue`: show the upcoming queue of the player state.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use super::{load_player, state_path};
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::QueueEntry;

#[derive(Args, Debug)]
pub struct QueueArgs {
    /// Player state file (defaults to player.state_path from the config)
    #[arg(long)]
    pub state: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct QueueOutput {
    pub shuffle: bool,
    pub context_uri: Option<String>,
    pub entries: Vec<QueueEntry>,
}

impl CommandOutput for QueueOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Context: {}", self.context_uri.as_deref().unwrap_or("-")),
            format!("Shuffle: {}", if self.shuffle { "on" } else { "off" }),
        ];

        if self.entries.is_empty() {
            lines.push("Queue is empty.".to_string());
        } else {
            lines.push(TableFormatter::new().format_queue(&self.entries));
        }

        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: QueueArgs, config: &Config, json_mode: bool) -> Result<()> {
    let player = load_player(&state_path(config, args.state)).await?;
    let state = player.state().await;

    let out = QueueOutput {
        shuffle: state.shuffle,
        context_uri: state.context_uri,
        entries: player.queue().entries().await,
    };
    output(&out, json_mode);
    Ok(())
}
