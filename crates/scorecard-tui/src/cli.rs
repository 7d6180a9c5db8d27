//! Command-line interface for the scorecard dashboard.
//!
//! Defines the CLI contract using clap derive macros.
//!
//! # Examples
//!
//! ```bash
//! # Run the interactive dashboard
//! scorecard
//!
//! # Deterministic data, light theme, 12-month window
//! scorecard --seed 7 --theme light --window 12
//!
//! # Headless self-check (for CI)
//! scorecard --self-check
//!
//! # Print the projected grid without a terminal
//! scorecard dump --format json
//! scorecard dump --expand 3
//! ```

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use scorecard_core::{MetricId, MetricsFilter};

/// Scorecard - KPI performance grid for the terminal.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "scorecard",
    author,
    version,
    about = "Scorecard - KPI performance grid for the terminal",
    long_about = "A terminal dashboard rendering KPI performance as an expandable \
                  grid: one row per metric, one column per reporting month, with \
                  per-leader breakdowns under each expanded row."
)]
pub struct Cli {
    /// Theme to use for styling (dark, light)
    #[arg(long, short = 't', default_value = "dark", env = "SCORECARD_THEME")]
    pub theme: String,

    /// Seed for deterministic data generation
    ///
    /// Using the same seed produces an identical dataset, useful for
    /// reproducible demos and testing
    #[arg(long, short = 's', global = true, default_value_t = 42, env = "SCORECARD_SEED")]
    pub seed: u64,

    /// Number of month columns to display (1-24)
    #[arg(long, short = 'w', global = true, default_value_t = 6, env = "SCORECARD_WINDOW")]
    pub window: usize,

    /// Only show months in this period (year-month prefix, e.g. 2025-01)
    #[arg(long, global = true, env = "SCORECARD_MONTH")]
    pub month: Option<String>,

    /// Only show metrics reported on by this leader id
    #[arg(long, global = true, env = "SCORECARD_LEADER")]
    pub leader: Option<String>,

    /// Only show metrics of this type category
    #[arg(long = "metric-type", global = true, env = "SCORECARD_METRIC_TYPE")]
    pub metric_type: Option<String>,

    /// Run headless self-check and exit
    ///
    /// Projects the grid without a TTY, useful for CI validation
    #[arg(long)]
    pub self_check: bool,

    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Optional subcommand
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The metrics filter described by the filter flags.
    #[must_use]
    pub fn filter(&self) -> MetricsFilter {
        MetricsFilter {
            month: self.month.clone(),
            leader_id: self.leader.clone(),
            metric_type: self.metric_type.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the projected grid to stdout and exit
    Dump(DumpArgs),
}

/// Arguments for the dump subcommand.
#[derive(Parser, Debug, Clone)]
pub struct DumpArgs {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = DumpFormat::Plain)]
    pub format: DumpFormat,

    /// Expand this metric id before printing
    #[arg(long)]
    pub expand: Option<MetricId>,
}

/// Dump output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// Aligned text table
    Plain,
    /// Flat ordinal-keyed row objects
    Json,
}
