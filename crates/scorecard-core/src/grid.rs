//! The grid model: one owner for rows, window, filter, and expansion state.
//!
//! Data flows one direction: catalog in, window resolved, parent rows
//! projected, child rows spliced in and out by the expansion controller.
//! All structural mutation of the row array happens here, behind explicit
//! methods; callers drive fetches and hand results back.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Metric, MetricId};
use crate::expansion::{DetailRequest, DetailResponse, ExpansionController, Toggle};
use crate::months::{DEFAULT_WINDOW, MAX_WINDOW, MonthWindow};
use crate::provider::MetricsFilter;
use crate::rows::{GridRow, project_children, project_parents};

/// Grid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of month columns to display, clamped to `1..=24`.
    pub window_size: usize,
}

impl GridConfig {
    /// Create a config with the window size clamped to the supported range.
    #[must_use]
    pub const fn new(window_size: usize) -> Self {
        Self {
            window_size: if window_size == 0 {
                1
            } else if window_size > MAX_WINDOW {
                MAX_WINDOW
            } else {
                window_size
            },
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// The metrics grid: projected rows plus expansion state.
#[derive(Debug, Default)]
pub struct MetricsGrid {
    config: GridConfig,
    filter: MetricsFilter,
    metrics: Vec<Metric>,
    window: MonthWindow,
    rows: Vec<GridRow>,
    expansion: ExpansionController,
}

impl MetricsGrid {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Replace the metric list, typically after a (re)fetch.
    ///
    /// Resets expansion: fresh data invalidates any spliced-in children.
    pub fn set_metrics(&mut self, metrics: Vec<Metric>) {
        self.metrics = metrics;
        self.expansion.reset();
        self.reproject();
    }

    /// Change the active filter.
    ///
    /// Expansion state is reset unconditionally: expanded detail is
    /// filter-scoped and must not leak across filter boundaries. The caller
    /// is expected to refetch metrics and call [`Self::set_metrics`]; until
    /// then the current metrics are reprojected under the new filter.
    pub fn set_filter(&mut self, filter: MetricsFilter) {
        debug!(?filter, "filter changed; resetting expansion");
        self.filter = filter;
        self.expansion.reset();
        self.reproject();
    }

    /// Change the window size. Columns change, so expansion resets too.
    pub fn set_window_size(&mut self, window_size: usize) {
        self.config = GridConfig::new(window_size);
        self.expansion.reset();
        self.reproject();
    }

    fn reproject(&mut self) {
        self.window = MonthWindow::resolve(
            &self.metrics,
            self.config.window_size,
            self.filter.month.as_deref(),
        );
        self.rows = project_parents(&self.metrics, &self.window);
    }

    /// Request an expand/collapse toggle for a metric row.
    ///
    /// Collapse settles synchronously (child rows are removed before this
    /// returns). Expand returns the [`DetailRequest`] the caller must
    /// resolve via a detail fetch and [`Self::apply_details`] /
    /// [`Self::fail_details`]. Unknown metric ids and toggles issued while
    /// another structural change is pending are ignored.
    pub fn toggle(&mut self, metric_id: MetricId) -> Toggle {
        if !self
            .rows
            .iter()
            .any(|row| row.is_parent() && row.metric_id() == metric_id)
        {
            debug!(metric_id, "toggle ignored: no such parent row");
            return Toggle::Ignored;
        }

        let outcome = self.expansion.toggle(metric_id);
        if let Toggle::BeginCollapse(id) = outcome {
            self.rows.retain(|row| row.is_parent() || row.metric_id() != id);
            self.expansion.finish_collapse(id);
        }
        outcome
    }

    /// Apply a settled detail fetch.
    ///
    /// Returns `true` when child rows were spliced in. Stale responses
    /// (filter changed mid-flight) and empty responses change nothing
    /// beyond clearing the pending action.
    pub fn apply_details(&mut self, response: &DetailResponse) -> bool {
        let Some(parent_index) = self
            .rows
            .iter()
            .position(|row| row.is_parent() && row.metric_id() == response.metric_id)
        else {
            // Parent vanished (metrics replaced mid-flight); drop the
            // response and clear the pending action if it is still ours.
            self.expansion.fail_expand(&response.request());
            return false;
        };

        if !self.expansion.complete_expand(response) {
            return false;
        }

        let children = project_children(response.metric_id, &response.records, &self.window);
        self.rows.splice(parent_index + 1..parent_index + 1, children);
        true
    }

    /// Record a failed detail fetch: pending clears, row stays collapsed.
    pub fn fail_details(&mut self, request: &DetailRequest) {
        self.expansion.fail_expand(request);
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    #[must_use]
    pub const fn window(&self) -> &MonthWindow {
        &self.window
    }

    #[must_use]
    pub const fn config(&self) -> GridConfig {
        self.config
    }

    #[must_use]
    pub const fn filter(&self) -> &MetricsFilter {
        &self.filter
    }

    #[must_use]
    pub const fn expansion(&self) -> &ExpansionController {
        &self.expansion
    }

    /// Whether a row should show its loading affordance.
    #[must_use]
    pub fn is_row_loading(&self, metric_id: MetricId) -> bool {
        self.expansion.is_loading(metric_id)
    }
}
