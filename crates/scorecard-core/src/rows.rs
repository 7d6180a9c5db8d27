//! Row projection: metrics and leader breakdowns flattened for the grid.
//!
//! Projection is pure: `(metrics, window)` in, rows out. Every in-window
//! month is materialized on every row; a month with no record synthesizes
//! an NDTR/grey cell here, so the presentation layer never sees an absent
//! field. Child rows are projected separately, on demand, when a parent is
//! expanded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Metric, MetricId, SubEntityRecord, ValueType};
use crate::months::MonthWindow;
use crate::tone::{StatusColor, Tone};

/// Sentinel for "no data this record".
pub const NDTR: &str = "NDTR";

/// The three parts of a well-formed composite result summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParts<'a> {
    pub percentage: &'a str,
    pub numerator: &'a str,
    pub denominator: &'a str,
}

/// Split a composite result summary into its three parts.
///
/// The NDTR sentinel never splits. Anything that does not split into
/// exactly three parts returns `None`; callers pass such values through
/// unformatted rather than treating them as errors.
#[must_use]
pub fn split_summary(raw: &str) -> Option<SummaryParts<'_>> {
    if raw == NDTR {
        return None;
    }
    let mut parts = raw.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(percentage), Some(numerator), Some(denominator), None) => Some(SummaryParts {
            percentage,
            numerator,
            denominator,
        }),
        _ => None,
    }
}

/// Format a result summary for display.
///
/// Well-formed summaries render as `"97.50% 39/40"` (the unit suffix
/// applies only to percentage-typed metrics). NDTR and malformed values
/// render verbatim.
#[must_use]
pub fn format_summary(raw: &str, value_type: ValueType) -> String {
    let Some(parts) = split_summary(raw) else {
        return raw.to_string();
    };
    let Ok(pct) = parts.percentage.parse::<f64>() else {
        return raw.to_string();
    };
    format!(
        "{pct:.2}{} {}/{}",
        value_type.suffix(),
        parts.numerator,
        parts.denominator
    )
}

/// One projected month column cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCell {
    /// Literal month identifier (for tooltips/headers).
    pub month: String,
    /// Raw result summary, or NDTR.
    pub result: String,
    pub color: StatusColor,
}

impl MonthCell {
    /// Synthesized cell for a month with no record.
    #[must_use]
    pub fn ndtr(month: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            result: NDTR.to_string(),
            color: StatusColor::Grey,
        }
    }

    #[must_use]
    pub fn is_ndtr(&self) -> bool {
        self.result == NDTR
    }

    /// Display tone of this cell.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        self.color.tone()
    }
}

/// A projected metric row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRow {
    pub metric_id: MetricId,
    pub prefix: String,
    pub name: String,
    pub value_type: ValueType,
    pub description: String,
    pub calculation: String,
    pub service_alignment: Option<String>,
    pub trigger: f64,
    pub limit: f64,
    pub source: Option<String>,
    pub metric_type: String,
    pub cells: Vec<MonthCell>,
}

/// A projected leader breakdown row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRow {
    pub metric_id: MetricId,
    pub leader_id: String,
    pub leader_name: String,
    pub cells: Vec<MonthCell>,
}

/// One row of the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GridRow {
    Parent(ParentRow),
    Child(ChildRow),
}

impl GridRow {
    #[must_use]
    pub const fn is_parent(&self) -> bool {
        matches!(self, Self::Parent(_))
    }

    #[must_use]
    pub const fn metric_id(&self) -> MetricId {
        match self {
            Self::Parent(row) => row.metric_id,
            Self::Child(row) => row.metric_id,
        }
    }

    /// Globally unique row key.
    #[must_use]
    pub fn row_key(&self) -> String {
        match self {
            Self::Parent(row) => format!("metric-{}", row.metric_id),
            Self::Child(row) => format!("slt-{}-{}", row.metric_id, row.leader_id),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[MonthCell] {
        match self {
            Self::Parent(row) => &row.cells,
            Self::Child(row) => &row.cells,
        }
    }

    /// Label for the leading grid column.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Parent(row) => format!("[{}] {}", row.prefix, row.name),
            Self::Child(row) => row.leader_name.clone(),
        }
    }

    /// Unit tag used when formatting this row's cells.
    ///
    /// Child rows inherit the percentage default; the upstream breakdown
    /// feed carries no unit of its own.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Parent(row) => row.value_type,
            Self::Child(_) => ValueType::Percentage,
        }
    }

    /// Flatten this row into the ordinal-keyed field shape
    /// (`firstMonth`, `firstMonth_Result`, `firstMonth_Color`, ...).
    #[must_use]
    pub fn flat_fields(&self, window: &MonthWindow) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("rowKey".to_string(), self.row_key());
        fields.insert("metricId".to_string(), self.metric_id().to_string());
        fields.insert("isParent".to_string(), self.is_parent().to_string());

        match self {
            Self::Parent(row) => {
                fields.insert("metricPrefix".to_string(), row.prefix.clone());
                fields.insert("metricName".to_string(), row.name.clone());
                fields.insert("valueType".to_string(), row.value_type.symbol().to_string());
                fields.insert("metricType".to_string(), row.metric_type.clone());
                fields.insert("trigger".to_string(), format!("{:.2}", row.trigger));
                fields.insert("limit".to_string(), format!("{:.2}", row.limit));
                if let Some(alignment) = &row.service_alignment {
                    fields.insert("serviceAlignment".to_string(), alignment.clone());
                }
                if let Some(source) = &row.source {
                    fields.insert("source".to_string(), source.clone());
                }
            }
            Self::Child(row) => {
                fields.insert("sltName".to_string(), row.leader_name.clone());
                fields.insert("sltId".to_string(), row.leader_id.clone());
            }
        }

        for cell in self.cells() {
            if let Some(ordinal) = window.ordinal_for(&cell.month) {
                fields.insert(format!("{ordinal}Month"), cell.month.clone());
                fields.insert(format!("{ordinal}Month_Result"), cell.result.clone());
                fields.insert(
                    format!("{ordinal}Month_Color"),
                    cell.color.name().to_string(),
                );
            }
        }
        fields
    }
}

/// Project month cells for one record set against the window.
fn project_cells<'a>(
    window: &MonthWindow,
    record_for: impl Fn(&str) -> Option<&'a crate::catalog::MonthlyRecord>,
) -> Vec<MonthCell> {
    window
        .months()
        .iter()
        .map(|month| {
            record_for(month).map_or_else(
                || MonthCell::ndtr(month.clone()),
                |record| MonthCell {
                    month: month.clone(),
                    result: record.result.clone(),
                    color: record.color,
                },
            )
        })
        .collect()
}

/// Project each metric into one parent row.
#[must_use]
pub fn project_parents(metrics: &[Metric], window: &MonthWindow) -> Vec<GridRow> {
    metrics
        .iter()
        .map(|metric| {
            GridRow::Parent(ParentRow {
                metric_id: metric.metric_id,
                prefix: metric.prefix.clone(),
                name: metric.name.clone(),
                value_type: metric.value_type,
                description: metric.description.clone(),
                calculation: metric.calculation.clone(),
                service_alignment: metric.service_alignment.clone(),
                trigger: metric.trigger,
                limit: metric.limit,
                source: metric.source.clone(),
                metric_type: metric.metric_type.clone(),
                cells: project_cells(window, |month| metric.record_for(month)),
            })
        })
        .collect()
}

/// Project a metric's leader breakdowns into child rows, preserving
/// source order.
#[must_use]
pub fn project_children(
    metric_id: MetricId,
    sub_entities: &[SubEntityRecord],
    window: &MonthWindow,
) -> Vec<GridRow> {
    sub_entities
        .iter()
        .map(|slt| {
            GridRow::Child(ChildRow {
                metric_id,
                leader_id: slt.leader_id.clone(),
                leader_name: slt.leader_name.clone(),
                cells: project_cells(window, |month| slt.record_for(month)),
            })
        })
        .collect()
}
