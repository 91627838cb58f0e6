//! `list`: show stored chains.

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use super::chain_store;
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::config::Config;
use crate::domain::models::{ChainBook, ContainerId};
use crate::domain::ports::ChainStore;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show chains of this playlist or album URI
    #[arg(long)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub container: Option<ContainerId>,
    pub total: usize,
    pub chains: ChainBook,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        if self.total == 0 {
            return "No chains found.".to_string();
        }

        format!(
            "{}\n\nShowing {} chain(s)",
            TableFormatter::new().format_chains(&self.chains, self.container.as_ref()),
            self.total
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ListArgs, config: &Config, json_mode: bool) -> Result<()> {
    let container = match args.context.as_deref() {
        Some(uri) => match ContainerId::normalize(uri) {
            Some(container) => Some(container),
            None => bail!("Invalid context URI: {uri:?}"),
        },
        None => None,
    };

    let book = chain_store(config).get_chains().await;

    // Narrow the book to the requested container so JSON output matches the table.
    let chains = match &container {
        Some(wanted) => {
            let mut narrowed = ChainBook::new();
            for chain in book.chains_for(wanted) {
                narrowed.add_chain(wanted.clone(), chain.clone());
            }
            narrowed
        }
        None => book,
    };

    let out = ListOutput {
        total: chains.chain_count(),
        container,
        chains,
    };
    output(&out, json_mode);
    Ok(())
}
