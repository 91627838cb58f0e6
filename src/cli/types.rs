//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::chain::ChainArgs;
use super::commands::clear::ClearArgs;
use super::commands::enforce::EnforceArgs;
use super::commands::list::ListArgs;
use super::commands::queue::QueueArgs;

#[derive(Parser, Debug)]
#[command(name = "chained-songs")]
#[command(about = "Keep chained songs together in a shuffled play queue", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .chained-songs/config.yaml)
    #[arg(short, long, global = true, env = "CHAINED_SONGS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save the given songs as a chain of a playlist or album
    Chain(ChainArgs),

    /// Forget every chain of a playlist or album
    Clear(ClearArgs),

    /// Show stored chains
    List(ListArgs),

    /// Show the upcoming queue of the player state
    Queue(QueueArgs),

    /// Rearrange the queue so every chain plays in order
    Enforce(EnforceArgs),
}
