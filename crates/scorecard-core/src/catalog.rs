//! Domain model for the metric catalog.
//!
//! These types mirror the shape of the upstream performance API: a flat list
//! of metric definitions, each carrying a variable-length array of monthly
//! records, plus per-leader breakdowns fetched lazily when a metric row is
//! expanded. They are designed to be:
//! - Small and presentation-friendly
//! - Cheaply cloneable
//! - Serializable for the dump surface and debugging

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tone::StatusColor;

/// Unique identifier for a metric.
pub type MetricId = u32;

/// Unit tag for a metric's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// A percentage result; formatted with a `%` suffix.
    #[default]
    Percentage,
    Days,
    Hours,
    Count,
    Score,
}

impl ValueType {
    /// Parse a raw unit tag. Unknown tags fall back to [`ValueType::Count`].
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "%" | "percentage" => Self::Percentage,
            "days" => Self::Days,
            "hours" => Self::Hours,
            "score" => Self::Score,
            _ => Self::Count,
        }
    }

    /// Get the display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Percentage => "%",
            Self::Days => "Days",
            Self::Hours => "Hours",
            Self::Count => "Count",
            Self::Score => "Score",
        }
    }

    /// Suffix appended to a formatted percentage part, if any.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Percentage => "%",
            _ => "",
        }
    }
}

impl From<String> for ValueType {
    fn from(tag: String) -> Self {
        Self::parse(&tag)
    }
}

impl From<ValueType> for String {
    fn from(value_type: ValueType) -> Self {
        value_type.symbol().to_string()
    }
}

/// Whether a higher or lower result is better for a metric.
///
/// Present in the data model but not consulted by classification; upstream
/// colors are taken as authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdDirection {
    HigherIsBetter,
    LowerIsBetter,
}

/// One metric's recorded result for one calendar month.
///
/// A metric may have zero or more monthly records; months with no record are
/// synthesized at projection time, never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Year-month identifier (e.g. "2025-03"), unique per metric.
    pub month: String,
    pub numerator: String,
    pub denominator: String,
    /// Composite summary `"pct-num-den"`, or the NDTR sentinel.
    pub result: String,
    /// Status color, normalized at ingestion.
    pub color: StatusColor,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MonthlyRecord {
    /// Create a record from a composite result summary.
    ///
    /// Numerator and denominator are derived from the summary when it has
    /// the canonical three-part shape, and default to "0" otherwise.
    #[must_use]
    pub fn new(month: impl Into<String>, result: impl Into<String>, color: StatusColor) -> Self {
        let result = result.into();
        let parts: Vec<&str> = result.split('-').collect();
        let (numerator, denominator) = if parts.len() == 3 {
            (parts[1].to_string(), parts[2].to_string())
        } else {
            ("0".to_string(), "0".to_string())
        };
        Self {
            month: month.into(),
            numerator,
            denominator,
            result,
            color,
            updated_at: None,
        }
    }
}

/// One monitored KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub metric_id: MetricId,
    /// Short code shown before the name (e.g. "PM003").
    pub prefix: String,
    pub name: String,
    pub value_type: ValueType,
    pub description: String,
    pub calculation: String,
    pub service_alignment: Option<String>,
    /// "Good" boundary. No ordering against `limit` is enforced.
    pub trigger: f64,
    /// "Bad" boundary.
    pub limit: f64,
    pub source: Option<String>,
    pub metric_type: String,
    pub threshold_direction: Option<ThresholdDirection>,
    pub monthly: Vec<MonthlyRecord>,
}

impl Metric {
    /// Create a new metric with empty monthly data.
    #[must_use]
    pub fn new(metric_id: MetricId, prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metric_id,
            prefix: prefix.into(),
            name: name.into(),
            value_type: ValueType::default(),
            description: String::new(),
            calculation: String::new(),
            service_alignment: None,
            trigger: 0.0,
            limit: 0.0,
            source: None,
            metric_type: String::new(),
            threshold_direction: None,
            monthly: Vec::new(),
        }
    }

    /// Look up the monthly record for a month identifier.
    #[must_use]
    pub fn record_for(&self, month: &str) -> Option<&MonthlyRecord> {
        self.monthly.iter().find(|r| r.month == month)
    }
}

/// One organizational leader's contribution to a metric.
///
/// Fetched lazily when a metric row is expanded; rendered as child rows
/// directly under the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEntityRecord {
    pub leader_id: String,
    pub leader_name: String,
    pub monthly: Vec<MonthlyRecord>,
}

impl SubEntityRecord {
    /// Create a record with empty monthly data.
    #[must_use]
    pub fn new(leader_id: impl Into<String>, leader_name: impl Into<String>) -> Self {
        Self {
            leader_id: leader_id.into(),
            leader_name: leader_name.into(),
            monthly: Vec::new(),
        }
    }

    /// Look up the monthly record for a month identifier.
    #[must_use]
    pub fn record_for(&self, month: &str) -> Option<&MonthlyRecord> {
        self.monthly.iter().find(|r| r.month == month)
    }
}
