//! Non-interactive grid projection for CI and scripting.
//!
//! Builds the same grid the dashboard renders, optionally pre-expands one
//! metric, and prints it to stdout as an aligned text table or as the flat
//! ordinal-keyed row objects.

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::warn;

use scorecard_core::{
    DetailResponse, GridConfig, MetricsGrid, MetricsProvider, MockProvider, Toggle,
};

use crate::cli::{Cli, DumpArgs, DumpFormat};
use crate::view;

/// Build the projected grid for the given CLI options.
pub(crate) fn build_grid(cli: &Cli, expand: Option<scorecard_core::MetricId>) -> Result<MetricsGrid> {
    let provider = MockProvider::seeded(cli.seed);
    let filter = cli.filter();

    let mut grid = MetricsGrid::new(GridConfig::new(cli.window));
    grid.set_filter(filter.clone());
    grid.set_metrics(provider.fetch_metrics(&filter)?);

    if let Some(metric_id) = expand {
        if let Toggle::BeginExpand(request) = grid.toggle(metric_id) {
            match provider.fetch_details(metric_id, &filter) {
                Ok(records) => {
                    grid.apply_details(&DetailResponse {
                        metric_id: request.metric_id,
                        generation: request.generation,
                        records,
                    });
                }
                Err(err) => {
                    warn!(metric_id, %err, "detail fetch failed");
                    grid.fail_details(&request);
                }
            }
        }
    }
    Ok(grid)
}

/// Run the dump subcommand.
pub fn run(cli: &Cli, args: &DumpArgs) -> Result<()> {
    let grid = build_grid(cli, args.expand)?;

    match args.format {
        DumpFormat::Plain => print!("{}", view::render_plain(&grid)),
        DumpFormat::Json => {
            let rows: Vec<BTreeMap<String, String>> = grid
                .rows()
                .iter()
                .map(|row| row.flat_fields(grid.window()))
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use scorecard_core::GridRow;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scorecard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn build_without_expand_is_parents_only() {
        let grid = build_grid(&cli(&[]), None).unwrap();
        assert!(!grid.rows().is_empty());
        assert!(grid.rows().iter().all(GridRow::is_parent));
    }

    #[test]
    fn build_with_expand_adds_children_after_the_parent() {
        let grid = build_grid(&cli(&[]), Some(1)).unwrap();
        let parent_index = grid
            .rows()
            .iter()
            .position(|r| r.is_parent() && r.metric_id() == 1)
            .unwrap();
        assert!(!grid.rows()[parent_index + 1].is_parent());
        assert_eq!(grid.rows()[parent_index + 1].metric_id(), 1);
    }

    #[test]
    fn build_with_unknown_expand_is_harmless() {
        let grid = build_grid(&cli(&[]), Some(9999)).unwrap();
        assert!(grid.rows().iter().all(GridRow::is_parent));
        assert_eq!(grid.expansion().pending(), None);
    }

    #[test]
    fn build_respects_window_flag() {
        let grid = build_grid(&cli(&["--window", "3"]), None).unwrap();
        assert_eq!(grid.window().len(), 3);
    }
}
