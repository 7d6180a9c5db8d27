//! Deterministic mock-data generation for the scorecard.
//!
//! Provides seedable generation of a realistic metric catalog with monthly
//! records, threshold-derived status colors, occasional missing months, and
//! per-metric leader breakdowns. Two runs with the same seed produce
//! identical datasets.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use rand::Rng;
use rand::prelude::IndexedRandom;
use rand_pcg::Pcg64;

use crate::catalog::{Metric, MetricId, MonthlyRecord, SubEntityRecord, ValueType};
use crate::tone::StatusColor;

// ============================================================================
// Static Data Pools
// ============================================================================

/// Metric prefix codes.
const METRIC_PREFIXES: &[&str] = &[
    "PM001", "PM002", "PM003", "PM004", "PM005", "PM006", "PM007", "PM008",
];

/// Metric names (service-management style).
const METRIC_NAMES: &[&str] = &[
    "PBI Record has Coordinator 24 hours after creation",
    "Incident Resolution within SLA",
    "Change Request Approval Rate",
    "Service Request Completion Time",
    "System Availability Percentage",
    "First Contact Resolution Rate",
    "Customer Satisfaction Score",
    "Backlog Reduction Rate",
];

/// Reporting sources.
const SOURCES: &[&str] = &["DataMart", "ServiceNow", "PowerBI", "Tableau", "JIRA"];

/// Metric type categories.
const METRIC_TYPES: &[&str] = &["Performance", "Compliance", "Adoption"];

/// Value-type rotation, applied by metric id.
const VALUE_TYPES: &[ValueType] = &[
    ValueType::Percentage,
    ValueType::Days,
    ValueType::Hours,
    ValueType::Count,
    ValueType::Score,
];

/// Leader names for breakdown rows.
const LEADER_NAMES: &[&str] = &[
    "Avery Quinn",
    "Jordan Blake",
    "Morgan Hayes",
    "Riley Carter",
    "Casey Nguyen",
    "Drew Patel",
    "Emerson Clarke",
    "Finley Ross",
    "Harper Singh",
    "Jamie Torres",
    "Kendall Brooks",
    "Logan Rivera",
    "Parker Ellis",
    "Quincy Adams",
    "Rowan Foster",
    "Sage Mitchell",
];

/// Newest month in the generated dataset (the mock's "today").
const BASE_YEAR: i32 = 2025;
const BASE_MONTH: u32 = 3;

// ============================================================================
// Generator
// ============================================================================

/// Deterministic data generator.
///
/// Uses a seeded PRNG to produce reproducible datasets.
pub struct Generator {
    rng: Pcg64,
    next_id: MetricId,
}

impl Generator {
    /// Create a new generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::new(seed.into(), 0x5851_f42d_4c95_7f2d),
            next_id: 1,
        }
    }

    /// Get the next unique metric ID.
    #[allow(clippy::missing_const_for_fn)] // Cannot be const: mutates self
    fn next_id(&mut self) -> MetricId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Month identifiers for the `count` most recent months, oldest first.
    #[must_use]
    pub fn recent_months(count: usize) -> Vec<String> {
        let base = NaiveDate::from_ymd_opt(BASE_YEAR, BASE_MONTH, 1).unwrap_or_default();
        let mut months: Vec<String> = (0..count)
            .filter_map(|back| {
                let back = u32::try_from(back).unwrap_or(u32::MAX);
                base.checked_sub_months(Months::new(back))
                    .map(|d| d.format("%Y-%m").to_string())
            })
            .collect();
        months.reverse();
        months
    }

    /// Generate a composite result summary `"pct-num-den"`.
    fn result_summary(&mut self) -> String {
        let denominator: u32 = self.rng.random_range(100..=200);
        let numerator: u32 = self.rng.random_range(denominator * 7 / 10..=denominator);
        let percentage = f64::from(numerator) / f64::from(denominator) * 100.0;
        format!("{percentage:.2}-{numerator}-{denominator}")
    }

    /// Derive the status color for a result against thresholds.
    ///
    /// An absent result is grey; otherwise the summary's percentage part is
    /// compared against the trigger ("good") and limit ("bad") boundaries.
    #[must_use]
    pub fn color_for(result: Option<&str>, trigger: f64, limit: f64) -> StatusColor {
        let Some(result) = result else {
            return StatusColor::Grey;
        };
        let Some(percentage) = result.split('-').next().and_then(|p| p.parse::<f64>().ok())
        else {
            return StatusColor::Grey;
        };
        if percentage >= trigger {
            StatusColor::Green
        } else if percentage >= limit {
            StatusColor::Amber
        } else {
            StatusColor::Red
        }
    }

    /// Random threshold pair: trigger in 75..95, limit at least 2 below it.
    fn thresholds(&mut self) -> (f64, f64) {
        let trigger = round2(self.rng.random_range(75.0..95.0));
        let limit = round2(self.rng.random_range(65.0..trigger - 2.0));
        (trigger, limit)
    }

    /// Monthly records over `months`, with occasional gaps.
    ///
    /// The oldest month is missing 30% of the time, any other 5%; gaps are
    /// simply absent records, surfacing as NDTR cells at projection time.
    fn monthly_records(&mut self, months: &[String], trigger: f64, limit: f64) -> Vec<MonthlyRecord> {
        months
            .iter()
            .enumerate()
            .filter_map(|(i, month)| {
                let gap_chance = if i == 0 { 0.3 } else { 0.05 };
                if self.rng.random_bool(gap_chance) {
                    return None;
                }
                let result = self.result_summary();
                let color = Self::color_for(Some(&result), trigger, limit);
                Some(MonthlyRecord::new(month.clone(), result, color))
            })
            .collect()
    }

    /// Generate a single metric over the given months.
    #[must_use]
    pub fn metric(&mut self, months: &[String]) -> Metric {
        let id = self.next_id();
        let index = (id as usize).saturating_sub(1);
        let name = METRIC_NAMES[index % METRIC_NAMES.len()];
        let (trigger, limit) = self.thresholds();

        let mut metric = Metric::new(id, METRIC_PREFIXES[index % METRIC_PREFIXES.len()], name);
        metric.value_type = VALUE_TYPES[index % VALUE_TYPES.len()];
        metric.description = format!("Tracks: {name}.");
        metric.calculation = "Numerator over denominator for the reporting month.".to_string();
        metric.service_alignment = if self.rng.random_bool(0.7) {
            Some("IT Services".to_string())
        } else {
            None
        };
        metric.trigger = trigger;
        metric.limit = limit;
        metric.source = SOURCES
            .choose(&mut self.rng)
            .map(|s| (*s).to_string());
        metric.metric_type = METRIC_TYPES[index % METRIC_TYPES.len()].to_string();
        metric.threshold_direction = None;
        metric.monthly = self.monthly_records(months, trigger, limit);
        metric
    }

    /// Generate the leader breakdown for a metric.
    ///
    /// Between 3 and 6 distinct leaders, each with their own monthly records
    /// colored against the metric's thresholds.
    #[must_use]
    pub fn leaders(&mut self, metric: &Metric, months: &[String]) -> Vec<SubEntityRecord> {
        let count = self.rng.random_range(3..=6);
        let names: Vec<&&str> = LEADER_NAMES.choose_multiple(&mut self.rng, count).collect();
        names
            .into_iter()
            .map(|name| {
                let id = format!("NB{:05}", self.rng.random_range(10_000..100_000));
                let mut slt = SubEntityRecord::new(id, *name);
                slt.monthly = self.monthly_records(months, metric.trigger, metric.limit);
                slt
            })
            .collect()
    }

    /// Generate a full catalog of `metric_count` metrics spanning the
    /// `month_count` most recent months.
    #[must_use]
    pub fn catalog(&mut self, metric_count: usize, month_count: usize) -> Vec<Metric> {
        let months = Self::recent_months(month_count);
        (0..metric_count).map(|_| self.metric(&months)).collect()
    }

    /// Generate leader breakdowns for every metric in a catalog.
    #[must_use]
    pub fn breakdowns(
        &mut self,
        metrics: &[Metric],
        month_count: usize,
    ) -> BTreeMap<MetricId, Vec<SubEntityRecord>> {
        let months = Self::recent_months(month_count);
        metrics
            .iter()
            .map(|m| (m.metric_id, self.leaders(m, &months)))
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
