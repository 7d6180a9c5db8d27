//! Month window resolution and ordinal labels.
//!
//! The grid's columns come from the data, not from a calendar: every month
//! identifier present across all metrics is collected, the newest N are kept
//! (N is the configured window size), and the survivors are displayed oldest
//! first so the grid reads left to right chronologically.
//!
//! Column identity is positional: each slot in the window gets a fixed
//! ordinal label (`first`, `second`, ...) used as the stable key suffix
//! wherever rows are flattened, so column definitions stay stable while the
//! underlying calendar window slides.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::catalog::Metric;

/// Largest supported window size.
pub const MAX_WINDOW: usize = 24;

/// Default window size.
pub const DEFAULT_WINDOW: usize = 6;

/// Ordinal labels for window positions, in order.
const ORDINALS: [&str; MAX_WINDOW] = [
    "first",
    "second",
    "third",
    "fourth",
    "fifth",
    "sixth",
    "seventh",
    "eighth",
    "ninth",
    "tenth",
    "eleventh",
    "twelfth",
    "thirteenth",
    "fourteenth",
    "fifteenth",
    "sixteenth",
    "seventeenth",
    "eighteenth",
    "nineteenth",
    "twentieth",
    "twentyFirst",
    "twentySecond",
    "twentyThird",
    "twentyFourth",
];

/// Get the ordinal label for a zero-based window position.
#[must_use]
pub fn ordinal_name(position: usize) -> Option<&'static str> {
    ORDINALS.get(position).copied()
}

/// Parse a month identifier into a calendar date for ordering.
///
/// Identifiers are normally `YYYY-MM` but may carry a day component.
/// Unparseable identifiers fall back to lexicographic ordering.
fn calendar_key(month: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(month, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").ok())
}

/// The resolved, ascending window of month identifiers shown as columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthWindow {
    months: Vec<String>,
}

impl MonthWindow {
    /// Resolve the display window from the full metric list.
    ///
    /// Every `month` value across every metric's records is deduplicated,
    /// sorted newest first, and truncated to `size`. If `month_filter` is
    /// set, only identifiers with that prefix survive (this is how "all
    /// months in this period" works when identifiers carry more granularity
    /// than year-month). The survivors are returned oldest first.
    ///
    /// An empty metric list yields an empty window; fewer distinct months
    /// than `size` yields all of them, with no padding.
    #[must_use]
    pub fn resolve(metrics: &[Metric], size: usize, month_filter: Option<&str>) -> Self {
        let unique: BTreeSet<&str> = metrics
            .iter()
            .flat_map(|m| m.monthly.iter())
            .map(|r| r.month.as_str())
            .collect();

        let mut months: Vec<String> = unique.into_iter().map(str::to_string).collect();
        // Newest first for window selection.
        months.sort_by(|a, b| match (calendar_key(a), calendar_key(b)) {
            (Some(da), Some(db)) => db.cmp(&da),
            _ => b.cmp(a),
        });
        months.truncate(size.min(MAX_WINDOW));

        if let Some(prefix) = month_filter {
            months.retain(|m| m.starts_with(prefix));
        }

        // Oldest first for display.
        months.reverse();
        Self { months }
    }

    /// The month identifiers, oldest first.
    #[must_use]
    pub fn months(&self) -> &[String] {
        &self.months
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Find the window position of a month identifier.
    #[must_use]
    pub fn position(&self, month: &str) -> Option<usize> {
        self.months.iter().position(|m| m == month)
    }

    /// Get the ordinal label for a month identifier in this window.
    #[must_use]
    pub fn ordinal_for(&self, month: &str) -> Option<&'static str> {
        self.position(month).and_then(ordinal_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MonthlyRecord;
    use crate::tone::StatusColor;

    fn metric_with_months(id: u32, months: &[&str]) -> Metric {
        let mut metric = Metric::new(id, "PM001", "System Availability Percentage");
        for month in months {
            metric
                .monthly
                .push(MonthlyRecord::new(*month, "90.00-90-100", StatusColor::Green));
        }
        metric
    }

    #[test]
    fn window_unions_and_dedupes_across_metrics() {
        let metrics = vec![
            metric_with_months(1, &["2025-01", "2025-02"]),
            metric_with_months(2, &["2025-02", "2025-03"]),
        ];
        let window = MonthWindow::resolve(&metrics, 6, None);
        assert_eq!(window.months(), ["2025-01", "2025-02", "2025-03"]);
    }

    #[test]
    fn window_keeps_newest_and_displays_ascending() {
        let metrics = vec![metric_with_months(
            1,
            &["2024-10", "2024-11", "2024-12", "2025-01", "2025-02", "2025-03", "2025-04"],
        )];
        let window = MonthWindow::resolve(&metrics, 6, None);
        assert_eq!(
            window.months(),
            ["2024-11", "2024-12", "2025-01", "2025-02", "2025-03", "2025-04"]
        );
    }

    #[test]
    fn window_handles_year_boundaries() {
        let metrics = vec![metric_with_months(1, &["2025-01", "2024-12", "2024-02"])];
        let window = MonthWindow::resolve(&metrics, 2, None);
        assert_eq!(window.months(), ["2024-12", "2025-01"]);
    }

    #[test]
    fn empty_metrics_yield_empty_window() {
        let window = MonthWindow::resolve(&[], 6, None);
        assert!(window.is_empty());
    }

    #[test]
    fn short_data_is_not_padded() {
        let metrics = vec![metric_with_months(1, &["2025-01", "2025-02"])];
        let window = MonthWindow::resolve(&metrics, 6, None);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn month_filter_is_a_prefix_match() {
        let metrics = vec![metric_with_months(
            1,
            &["2025-01-15", "2025-01-31", "2025-02-15"],
        )];
        let window = MonthWindow::resolve(&metrics, 6, Some("2025-01"));
        assert_eq!(window.months(), ["2025-01-15", "2025-01-31"]);
    }

    #[test]
    fn ordinals_are_positional() {
        assert_eq!(ordinal_name(0), Some("first"));
        assert_eq!(ordinal_name(5), Some("sixth"));
        assert_eq!(ordinal_name(23), Some("twentyFourth"));
        assert_eq!(ordinal_name(24), None);
    }

    #[test]
    fn window_ordinals_follow_display_order() {
        let metrics = vec![metric_with_months(1, &["2025-02", "2025-01"])];
        let window = MonthWindow::resolve(&metrics, 6, None);
        assert_eq!(window.ordinal_for("2025-01"), Some("first"));
        assert_eq!(window.ordinal_for("2025-02"), Some("second"));
        assert_eq!(window.ordinal_for("2025-03"), None);
    }

    #[test]
    fn unparseable_identifiers_order_lexicographically() {
        let metrics = vec![metric_with_months(1, &["alpha", "beta", "2025-01"])];
        let window = MonthWindow::resolve(&metrics, 2, None);
        // "beta" > "alpha" lexicographically, so it survives the newest-2 cut.
        assert_eq!(window.len(), 2);
        assert!(window.position("beta").is_some());
    }
}
