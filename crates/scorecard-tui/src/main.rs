#![forbid(unsafe_code)]

//! # Scorecard
//!
//! Terminal dashboard for the scorecard KPI grid: one row per metric, one
//! column per reporting month, per-leader breakdowns under each expanded
//! row.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p scorecard-tui
//! ```

mod app;
mod cli;
mod dump;
mod theme;
mod view;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use app::AppConfig;
use cli::{Cli, Command};
use scorecard_core::GridConfig;
use theme::ThemePreset;

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::from_default_env(),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(Command::Dump(args)) = &cli.command {
        return dump::run(&cli, args);
    }

    if cli.self_check {
        // Headless projection of the default grid, for CI.
        let grid = dump::build_grid(&cli, None)?;
        print!("{}", view::render_plain(&grid));
        println!("self-check: ok ({} rows)", grid.rows().len());
        return Ok(());
    }

    let preset = ThemePreset::from_name(&cli.theme)
        .ok_or_else(|| anyhow::anyhow!("unknown theme '{}' (expected dark or light)", cli.theme))?;

    let config = AppConfig {
        preset,
        seed: cli.seed,
        grid: GridConfig::new(cli.window),
        filter: cli.filter(),
        ..AppConfig::default()
    };
    app::run(config).await
}
