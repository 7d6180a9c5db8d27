//! Rendering for the scorecard dashboard.
//!
//! Pure functions from grid state to strings: the interactive frame uses
//! ANSI styling via crossterm, the plain variant backs the `dump`
//! subcommand and `--self-check`.

use crossterm::style::Stylize;
use scorecard_core::{GridRow, MetricsGrid, format_summary};
use unicode_width::UnicodeWidthStr;

use crate::theme::Theme;

/// Width of the leading metric/leader column.
const LABEL_WIDTH: usize = 38;

/// Width of one month column.
const CELL_WIDTH: usize = 15;

/// Spinner frames for the loading affordance.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Truncate to `width` display columns (with an ellipsis) and pad.
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let pad = width - text.width();
        return format!("{text}{}", " ".repeat(pad));
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    let pad = width.saturating_sub(out.width());
    format!("{out}{}", " ".repeat(pad))
}

/// Label for a row, including its expansion marker.
fn row_label(grid: &MetricsGrid, row: &GridRow, spinner: usize) -> String {
    match row {
        GridRow::Parent(parent) => {
            let marker = if grid.is_row_loading(parent.metric_id) {
                SPINNER_FRAMES[spinner % SPINNER_FRAMES.len()]
            } else if grid.expansion().is_expanded(parent.metric_id) {
                "▾"
            } else {
                "▸"
            };
            format!("{marker} {}", row.label())
        }
        GridRow::Child(_) => format!("  └ {}", row.label()),
    }
}

/// Render the column header line.
fn header_line(grid: &MetricsGrid) -> String {
    let mut line = fit("Metric", LABEL_WIDTH);
    for month in grid.window().months() {
        line.push_str(&fit(month, CELL_WIDTH));
    }
    line
}

/// Render the filter summary line.
fn filter_line(grid: &MetricsGrid) -> String {
    let filter = grid.filter();
    let month = filter.month.as_deref().unwrap_or("all");
    let leader = filter.leader_id.as_deref().unwrap_or("all");
    let metric_type = filter.metric_type.as_deref().unwrap_or("all");
    format!(
        "month: {month}  leader: {leader}  type: {metric_type}  window: {}",
        grid.config().window_size
    )
}

/// Render the interactive dashboard frame.
#[must_use]
pub fn render(
    grid: &MetricsGrid,
    theme: &Theme,
    cursor: usize,
    spinner: usize,
    loading_metrics: bool,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}\r\n",
        "Scorecard".to_string().with(theme.accent).bold()
    ));
    out.push_str(&format!(
        "{}\r\n",
        filter_line(grid).with(theme.text_muted)
    ));

    if loading_metrics {
        out.push_str(&format!(
            "\r\n{} loading metrics…\r\n",
            SPINNER_FRAMES[spinner % SPINNER_FRAMES.len()]
        ));
        return out;
    }

    out.push_str(&format!(
        "{}\r\n",
        header_line(grid).with(theme.text).bold()
    ));
    let total_width = LABEL_WIDTH + grid.window().len() * CELL_WIDTH;
    out.push_str(&format!(
        "{}\r\n",
        "─".repeat(total_width).with(theme.border)
    ));

    if grid.rows().is_empty() {
        out.push_str(&format!(
            "{}\r\n",
            "no metrics match the active filter".with(theme.text_muted)
        ));
    }

    for (index, row) in grid.rows().iter().enumerate() {
        let selected = index == cursor;
        let label = fit(&row_label(grid, row, spinner), LABEL_WIDTH);
        let label = if selected {
            label.with(theme.accent).bold()
        } else {
            label.with(theme.text)
        };
        out.push_str(&label.to_string());

        for cell in row.cells() {
            let tone = cell.tone();
            let text = fit(
                &format!(" {}", format_summary(&cell.result, row.value_type())),
                CELL_WIDTH,
            );
            let styled = text
                .with(Theme::tone_fg(tone, row.is_parent()))
                .on(theme.tone_bg(tone, row.is_parent()));
            out.push_str(&styled.to_string());
        }
        out.push_str("\r\n");
    }

    out.push_str(&format!(
        "\r\n{}\r\n",
        "j/k move  enter expand/collapse  m month  l leader  y type  w window  r refresh  q quit"
            .with(theme.text_muted)
    ));
    out
}

/// Render the grid as an aligned, unstyled text table.
#[must_use]
pub fn render_plain(grid: &MetricsGrid) -> String {
    let mut out = String::new();
    out.push_str(&filter_line(grid));
    out.push('\n');
    out.push_str(header_line(grid).trim_end());
    out.push('\n');

    for row in grid.rows() {
        let label = match row {
            GridRow::Parent(_) => row.label(),
            GridRow::Child(_) => format!("  └ {}", row.label()),
        };
        let mut line = fit(&label, LABEL_WIDTH);
        for cell in row.cells() {
            let tone = cell.tone();
            line.push_str(&fit(
                &format!("{} [{}]", format_summary(&cell.result, row.value_type()), tone.name()),
                CELL_WIDTH + 10,
            ));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorecard_core::{GridConfig, MetricsFilter, MetricsProvider, MockProvider};

    fn loaded_grid() -> MetricsGrid {
        let provider = MockProvider::seeded(42);
        let mut grid = MetricsGrid::new(GridConfig::default());
        grid.set_metrics(provider.fetch_metrics(&MetricsFilter::default()).unwrap());
        grid
    }

    #[test]
    fn fit_pads_and_truncates_by_display_width() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("", 3), "   ");
    }

    #[test]
    fn plain_render_has_one_line_per_row_plus_chrome() {
        let grid = loaded_grid();
        let rendered = render_plain(&grid);
        assert_eq!(rendered.lines().count(), grid.rows().len() + 2);
    }

    #[test]
    fn plain_render_lists_window_months() {
        let grid = loaded_grid();
        let rendered = render_plain(&grid);
        let header = rendered.lines().nth(1).unwrap();
        for month in grid.window().months() {
            assert!(header.contains(month), "missing {month} in {header}");
        }
    }

    #[test]
    fn interactive_render_mentions_every_parent() {
        let grid = loaded_grid();
        let theme = Theme::default();
        let rendered = render(&grid, &theme, 0, 0, false);
        for row in grid.rows() {
            let GridRow::Parent(parent) = row else {
                continue;
            };
            assert!(rendered.contains(&format!("[{}]", parent.prefix)));
        }
    }

    #[test]
    fn loading_state_short_circuits_the_table() {
        let grid = loaded_grid();
        let theme = Theme::default();
        let rendered = render(&grid, &theme, 0, 3, true);
        assert!(rendered.contains("loading metrics"));
        assert!(!rendered.contains("[PM001]"));
    }
}
