//! The data-provider contract the grid consumes.
//!
//! The grid does not know or care whether metrics come from a real backend
//! or a mock; it only requires the stable shapes in [`crate::catalog`] and
//! eventual settlement of each request. [`MockProvider`] is the in-process
//! implementation backed by the seeded [`crate::generator`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Metric, MetricId, SubEntityRecord};
use crate::generator::Generator;

/// Active cross-filter for both the metric list and detail fetches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsFilter {
    /// Year-month prefix (e.g. "2025-01"); `None` means all months.
    pub month: Option<String>,
    /// Leader id; `None` means all leaders.
    pub leader_id: Option<String>,
    /// Metric type category; `None` means all types.
    pub metric_type: Option<String>,
}

impl MetricsFilter {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.month.is_none() && self.leader_id.is_none() && self.metric_type.is_none()
    }
}

/// Provider failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("metric {0} not found")]
    UnknownMetric(MetricId),
    #[error("detail fetch timed out")]
    Timeout,
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Source of metric and breakdown data.
pub trait MetricsProvider {
    /// Fetch the metric list with embedded monthly records.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the backing source cannot serve the
    /// request.
    fn fetch_metrics(&self, filter: &MetricsFilter) -> Result<Vec<Metric>, ProviderError>;

    /// Fetch one metric's leader breakdown.
    ///
    /// A metric with no breakdown yields an empty list, which the grid
    /// treats as "nothing happened" rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::UnknownMetric`] for ids not in the catalog.
    fn fetch_details(
        &self,
        metric_id: MetricId,
        filter: &MetricsFilter,
    ) -> Result<Vec<SubEntityRecord>, ProviderError>;
}

/// Seeded in-memory provider.
#[derive(Debug)]
pub struct MockProvider {
    catalog: Vec<Metric>,
    details: BTreeMap<MetricId, Vec<SubEntityRecord>>,
}

/// Metrics generated per seeded provider.
const MOCK_METRIC_COUNT: usize = 12;
/// Months of history generated (more than any default window, so windowing
/// actually truncates).
const MOCK_MONTH_COUNT: usize = 9;

impl MockProvider {
    /// Build a provider from a seed. Same seed, same dataset.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let mut generator = Generator::new(seed);
        let catalog = generator.catalog(MOCK_METRIC_COUNT, MOCK_MONTH_COUNT);
        let details = generator.breakdowns(&catalog, MOCK_MONTH_COUNT);
        Self { catalog, details }
    }

    /// Distinct leaders across all breakdowns, as `(id, name)` pairs sorted
    /// by id. Used to drive the leader filter UI.
    #[must_use]
    pub fn leaders(&self) -> Vec<(String, String)> {
        let mut leaders: BTreeMap<String, String> = BTreeMap::new();
        for records in self.details.values() {
            for slt in records {
                leaders
                    .entry(slt.leader_id.clone())
                    .or_insert_with(|| slt.leader_name.clone());
            }
        }
        leaders.into_iter().collect()
    }

    /// Distinct metric type categories present in the catalog.
    #[must_use]
    pub fn metric_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .catalog
            .iter()
            .map(|m| m.metric_type.clone())
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }

    fn metric_matches(metric: &Metric, filter: &MetricsFilter) -> bool {
        if let Some(wanted) = &filter.metric_type {
            if !metric.metric_type.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        true
    }
}

impl MetricsProvider for MockProvider {
    fn fetch_metrics(&self, filter: &MetricsFilter) -> Result<Vec<Metric>, ProviderError> {
        let mut metrics: Vec<Metric> = self
            .catalog
            .iter()
            .filter(|m| Self::metric_matches(m, filter))
            .cloned()
            .collect();

        // A leader filter narrows the list to metrics that leader reports on.
        if let Some(leader_id) = &filter.leader_id {
            metrics.retain(|m| {
                self.details
                    .get(&m.metric_id)
                    .is_some_and(|slts| slts.iter().any(|s| &s.leader_id == leader_id))
            });
        }

        // A month filter narrows each metric's records to that period.
        if let Some(month) = &filter.month {
            for metric in &mut metrics {
                metric.monthly.retain(|r| r.month.starts_with(month));
            }
        }

        Ok(metrics)
    }

    fn fetch_details(
        &self,
        metric_id: MetricId,
        filter: &MetricsFilter,
    ) -> Result<Vec<SubEntityRecord>, ProviderError> {
        let Some(records) = self.details.get(&metric_id) else {
            return Err(ProviderError::UnknownMetric(metric_id));
        };

        let mut records = records.clone();
        if let Some(leader_id) = &filter.leader_id {
            records.retain(|s| &s.leader_id == leader_id);
        }
        if let Some(month) = &filter.month {
            for slt in &mut records {
                slt.monthly.retain(|r| r.month.starts_with(month));
            }
        }
        Ok(records)
    }
}
