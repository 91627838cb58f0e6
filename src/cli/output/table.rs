//! Table output formatting for CLI commands
//!
//! Renders chains, queue entries and enforcement outcomes with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::truncate;
use crate::domain::models::{ChainBook, ChainOutcome, ContainerId, EnforcementReport, QueueEntry};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// One row per stored chain, optionally limited to a single container.
    pub fn format_chains(&self, book: &ChainBook, only: Option<&ContainerId>) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            header("Container"),
            header("#"),
            header("Length"),
            header("Songs"),
        ]);

        for (container, chains) in book.containers() {
            if only.is_some_and(|wanted| wanted != container) {
                continue;
            }
            for (index, chain) in chains.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(container.as_str()),
                    Cell::new(index + 1),
                    Cell::new(chain.len()),
                    Cell::new(chain.to_string()),
                ]);
            }
        }

        table.to_string()
    }

    /// Upcoming queue with positions and instance ids.
    pub fn format_queue(&self, entries: &[QueueEntry]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("Pos"), header("Song"), header("Uid")]);

        for (position, entry) in entries.iter().enumerate() {
            table.add_row(vec![
                Cell::new(position),
                Cell::new(entry.item.as_str()),
                Cell::new(truncate(entry.uid.as_str(), 16)),
            ]);
        }

        table.to_string()
    }

    /// Per-chain outcome of an enforcement run.
    pub fn format_report(&self, report: &EnforcementReport) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            header("Chain"),
            header("Outcome"),
            header("Moved"),
            header("Inserted"),
            header("Removed"),
        ]);

        for (chain, outcome) in &report.outcomes {
            let label = outcome_label(outcome);
            let outcome_cell = if self.use_colors {
                Cell::new(&label).fg(outcome_color(outcome))
            } else {
                Cell::new(&label)
            };
            let stats = outcome.stats().cloned().unwrap_or_default();

            table.add_row(vec![
                Cell::new(truncate(&chain.to_string(), 60)),
                outcome_cell,
                Cell::new(stats.moved),
                Cell::new(stats.inserted),
                Cell::new(stats.strays_removed),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(title: &str) -> Cell {
    Cell::new(title).add_attribute(Attribute::Bold)
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

fn outcome_label(outcome: &ChainOutcome) -> String {
    match outcome {
        ChainOutcome::NoAnchor => "not in queue".to_string(),
        ChainOutcome::Converged(_) => "in order".to_string(),
        ChainOutcome::Partial {
            failed_index, item, ..
        } => format!("stopped at song {} ({item})", failed_index + 1),
        ChainOutcome::Abandoned { reason } => format!("skipped: {reason}"),
    }
}

const fn outcome_color(outcome: &ChainOutcome) -> Color {
    match outcome {
        ChainOutcome::NoAnchor => Color::DarkGrey,
        ChainOutcome::Converged(_) => Color::Green,
        ChainOutcome::Partial { .. } => Color::Yellow,
        ChainOutcome::Abandoned { .. } => Color::Red,
    }
}
