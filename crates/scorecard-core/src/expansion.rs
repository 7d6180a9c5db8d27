//! Expand/collapse state machine for the grid.
//!
//! Structural changes to the row array are single-flight: at most one
//! expand or collapse may be pending across the whole grid, and toggle
//! requests arriving while one is pending are ignored. Expansion settles
//! asynchronously through a detail fetch; collapse settles synchronously.
//!
//! Staleness is first-class: every expand request carries the controller's
//! current generation, and a response is applied only while its generation
//! is still current. Filter changes bump the generation, so a response that
//! arrives after the filter moved on is dropped without touching the rows.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{MetricId, SubEntityRecord};

/// The single in-flight structural change, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Expand(MetricId),
    Collapse(MetricId),
}

/// Token identifying one expand request.
///
/// Carried by the caller through the detail fetch and handed back with the
/// response; the generation is the cancellation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub metric_id: MetricId,
    pub generation: u64,
}

/// A settled detail fetch, ready to be applied.
#[derive(Debug, Clone)]
pub struct DetailResponse {
    pub metric_id: MetricId,
    pub generation: u64,
    pub records: Vec<SubEntityRecord>,
}

impl DetailResponse {
    /// The request this response answers.
    #[must_use]
    pub const fn request(&self) -> DetailRequest {
        DetailRequest {
            metric_id: self.metric_id,
            generation: self.generation,
        }
    }
}

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Another structural change is pending; nothing happened.
    Ignored,
    /// The metric's children must be removed; call
    /// [`ExpansionController::finish_collapse`] once they are.
    BeginCollapse(MetricId),
    /// A detail fetch must be issued for this request.
    BeginExpand(DetailRequest),
}

/// Expansion state of one metric row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Collapsed,
    /// Detail fetch in flight.
    Expanding,
    /// Children present.
    Expanded,
}

/// Tracks which metrics are expanded and mediates structural changes.
#[derive(Debug, Default)]
pub struct ExpansionController {
    expanded: BTreeSet<MetricId>,
    /// The metric whose children are (or were last) being fetched.
    selected: Option<MetricId>,
    pending: Option<PendingAction>,
    generation: u64,
}

impl ExpansionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a toggle for a metric.
    ///
    /// Ignored while any structural change is pending, including a toggle
    /// of the same metric.
    pub fn toggle(&mut self, metric_id: MetricId) -> Toggle {
        if self.pending.is_some() {
            debug!(metric_id, "toggle ignored: structural change pending");
            return Toggle::Ignored;
        }

        if self.expanded.contains(&metric_id) {
            self.pending = Some(PendingAction::Collapse(metric_id));
            Toggle::BeginCollapse(metric_id)
        } else {
            self.pending = Some(PendingAction::Expand(metric_id));
            self.selected = Some(metric_id);
            Toggle::BeginExpand(DetailRequest {
                metric_id,
                generation: self.generation,
            })
        }
    }

    /// Settle a collapse after the caller removed the child rows.
    pub fn finish_collapse(&mut self, metric_id: MetricId) {
        if self.pending == Some(PendingAction::Collapse(metric_id)) {
            self.expanded.remove(&metric_id);
            self.pending = None;
        }
    }

    /// Settle an expand with a fetched response.
    ///
    /// Returns `true` when the response is current and non-empty and the
    /// caller should splice the child rows in. A stale response (generation
    /// or metric mismatch) changes nothing; an empty response clears the
    /// pending action and leaves the row collapsed.
    pub fn complete_expand(&mut self, response: &DetailResponse) -> bool {
        if response.generation != self.generation
            || self.pending != Some(PendingAction::Expand(response.metric_id))
        {
            debug!(
                metric_id = response.metric_id,
                generation = response.generation,
                current = self.generation,
                "stale detail response dropped"
            );
            return false;
        }

        self.pending = None;
        if response.records.is_empty() {
            debug!(metric_id = response.metric_id, "detail fetch returned no data");
            return false;
        }

        self.expanded.insert(response.metric_id);
        true
    }

    /// Settle a failed expand: clear the pending action, stay collapsed.
    pub fn fail_expand(&mut self, request: &DetailRequest) {
        if request.generation == self.generation
            && self.pending == Some(PendingAction::Expand(request.metric_id))
        {
            self.pending = None;
        }
    }

    /// Reset to the initial state and invalidate in-flight fetches.
    ///
    /// Called on every filter change: expanded detail is filter-scoped and
    /// must not leak across filter boundaries.
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.selected = None;
        self.pending = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether a row should show its loading affordance.
    #[must_use]
    pub fn is_loading(&self, metric_id: MetricId) -> bool {
        self.selected == Some(metric_id) && self.pending == Some(PendingAction::Expand(metric_id))
    }

    #[must_use]
    pub fn is_expanded(&self, metric_id: MetricId) -> bool {
        self.expanded.contains(&metric_id)
    }

    /// Current expansion state of a metric row.
    #[must_use]
    pub fn state(&self, metric_id: MetricId) -> RowState {
        if self.pending == Some(PendingAction::Expand(metric_id)) {
            RowState::Expanding
        } else if self.expanded.contains(&metric_id) {
            RowState::Expanded
        } else {
            RowState::Collapsed
        }
    }

    #[must_use]
    pub const fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    #[must_use]
    pub const fn selected(&self) -> Option<MetricId> {
        self.selected
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Metric ids currently expanded, in ascending order.
    #[must_use]
    pub fn expanded_ids(&self) -> Vec<MetricId> {
        self.expanded.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(metric_id: MetricId, generation: u64, leaders: usize) -> DetailResponse {
        DetailResponse {
            metric_id,
            generation,
            records: (0..leaders)
                .map(|i| SubEntityRecord::new(format!("NB{i}"), format!("Leader {i}")))
                .collect(),
        }
    }

    #[test]
    fn expand_round_trip() {
        let mut controller = ExpansionController::new();

        let Toggle::BeginExpand(request) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };
        assert_eq!(controller.state(1), RowState::Expanding);
        assert!(controller.is_loading(1));

        assert!(controller.complete_expand(&response(1, request.generation, 2)));
        assert_eq!(controller.state(1), RowState::Expanded);
        assert!(!controller.is_loading(1));
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn collapse_is_synchronous() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(request) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };
        assert!(controller.complete_expand(&response(1, request.generation, 1)));

        assert_eq!(controller.toggle(1), Toggle::BeginCollapse(1));
        controller.finish_collapse(1);
        assert_eq!(controller.state(1), RowState::Collapsed);
        assert_eq!(controller.pending(), None);
    }

    #[test]
    fn toggles_ignored_while_pending() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(request) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };

        // Any row, including the one in flight.
        assert_eq!(controller.toggle(1), Toggle::Ignored);
        assert_eq!(controller.toggle(2), Toggle::Ignored);
        assert_eq!(controller.pending(), Some(PendingAction::Expand(1)));

        assert!(controller.complete_expand(&response(1, request.generation, 1)));
        // Settled; a new toggle is accepted again.
        assert_eq!(controller.toggle(2), Toggle::BeginExpand(DetailRequest {
            metric_id: 2,
            generation: request.generation,
        }));
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(request) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };

        controller.reset();
        assert!(!controller.complete_expand(&response(1, request.generation, 2)));
        assert_eq!(controller.state(1), RowState::Collapsed);
    }

    #[test]
    fn empty_response_clears_pending_and_stays_collapsed() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(request) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };

        assert!(!controller.complete_expand(&response(1, request.generation, 0)));
        assert_eq!(controller.pending(), None);
        assert_eq!(controller.state(1), RowState::Collapsed);
        // The grid is free to accept new toggles: no stuck spinner.
        assert!(matches!(controller.toggle(1), Toggle::BeginExpand(_)));
    }

    #[test]
    fn failed_fetch_clears_pending() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(request) = controller.toggle(3) else {
            panic!("expected BeginExpand");
        };

        controller.fail_expand(&request);
        assert_eq!(controller.pending(), None);
        assert_eq!(controller.state(3), RowState::Collapsed);
    }

    #[test]
    fn stale_failure_does_not_clobber_new_fetch() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(old) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };

        controller.reset();
        let Toggle::BeginExpand(fresh) = controller.toggle(2) else {
            panic!("expected BeginExpand");
        };

        controller.fail_expand(&old);
        assert_eq!(controller.pending(), Some(PendingAction::Expand(2)));

        assert!(controller.complete_expand(&response(2, fresh.generation, 1)));
    }

    #[test]
    fn reset_clears_everything_and_bumps_generation() {
        let mut controller = ExpansionController::new();
        let Toggle::BeginExpand(request) = controller.toggle(1) else {
            panic!("expected BeginExpand");
        };
        assert!(controller.complete_expand(&response(1, request.generation, 1)));
        let _ = controller.toggle(2);

        let generation = controller.generation();
        controller.reset();

        assert!(controller.expanded_ids().is_empty());
        assert_eq!(controller.selected(), None);
        assert_eq!(controller.pending(), None);
        assert_eq!(controller.generation(), generation + 1);
    }

    #[test]
    fn loading_is_scoped_to_the_selected_metric() {
        let mut controller = ExpansionController::new();
        let _ = controller.toggle(5);
        assert!(controller.is_loading(5));
        assert!(!controller.is_loading(6));
    }
}
