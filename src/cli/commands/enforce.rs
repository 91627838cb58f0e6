//! `enforce`: rearrange the player's queue so every chain plays in order.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use super::{build_enforcer, chain_store, load_player, state_path};
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::{ContainerId, EnforcementReport, EnforcementStatus};
use crate::services::wait_until_ready;

/// Availability polls before giving up on the player.
const READY_ATTEMPTS: usize = 3;

#[derive(Args, Debug)]
pub struct EnforceArgs {
    /// Player state file (defaults to player.state_path from the config)
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Playlist or album URI; defaults to the player's playback context
    #[arg(long)]
    pub context: Option<String>,

    /// Do not write the rearranged queue back to the state file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct EnforceOutput {
    pub report: EnforcementReport,
    pub total_edits: usize,
    pub saved: bool,
    pub dry_run: bool,
}

impl CommandOutput for EnforceOutput {
    fn to_human(&self) -> String {
        match self.report.status {
            EnforcementStatus::ShuffleInactive => {
                "Shuffle is off; queue left unchanged.".to_string()
            }
            EnforcementStatus::NoChains => {
                format!("No chains stored for {}.", self.report.container)
            }
            EnforcementStatus::Ran => {
                let mut lines = vec![TableFormatter::new().format_report(&self.report)];
                lines.push(format!(
                    "\n{} of {} chain(s) in order, {} queue edit(s)",
                    self.report.converged_count(),
                    self.report.outcomes.len(),
                    self.total_edits
                ));
                if self.dry_run {
                    lines.push("Dry run: player state not written".to_string());
                }
                lines.join("\n")
            }
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: EnforceArgs, config: &Config, json_mode: bool) -> Result<()> {
    let player = load_player(&state_path(config, args.state)).await?;

    let uri = args
        .context
        .as_deref()
        .or_else(|| player.context_uri())
        .ok_or_else(|| anyhow!("No playback context; pass --context"))?;
    let container = ContainerId::normalize(uri)
        .ok_or_else(|| anyhow!("Invalid context URI: {uri:?}"))?;

    let poll = Duration::from_millis(config.enforcement.ready_poll_ms);
    wait_until_ready(&*player, poll, Some(READY_ATTEMPTS)).await;

    let enforcer = build_enforcer(config, chain_store(config), player.clone());
    let report = enforcer
        .enforce(&container)
        .await
        .context("Failed to enforce song chains")?;

    let total_edits = report.total_edits();
    let saved = !args.dry_run && total_edits > 0;
    if saved {
        player
            .save()
            .await
            .context("Failed to write player state")?;
    }

    let out = EnforceOutput {
        report,
        total_edits,
        saved,
        dry_run: args.dry_run,
    };
    output(&out, json_mode);
    Ok(())
}
