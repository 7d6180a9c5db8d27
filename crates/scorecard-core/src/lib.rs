#![forbid(unsafe_code)]

//! # Scorecard Core
//!
//! Grid engine for the scorecard KPI dashboard: the data model, month
//! windowing, row projection, and expansion state machine behind the
//! performance grid, independent of any rendering layer.
//!
//! ## Modules
//!
//! - [`catalog`] - Metric, monthly record, and leader breakdown types
//! - [`months`] - Distinct-month windowing and ordinal column labels
//! - [`rows`] - Projection of metrics into parent/child grid rows
//! - [`expansion`] - Single-flight expand/collapse state machine
//! - [`grid`] - The grid model tying rows, window, filter, and expansion together
//! - [`tone`] - Status-color normalization and tone classification
//! - [`provider`] - The data-provider contract and the seeded mock
//! - [`generator`] - Deterministic mock-data generation

pub mod catalog;
pub mod expansion;
pub mod generator;
pub mod grid;
pub mod months;
pub mod provider;
pub mod rows;
pub mod tone;

pub use catalog::{Metric, MetricId, MonthlyRecord, SubEntityRecord, ThresholdDirection, ValueType};
pub use expansion::{
    DetailRequest, DetailResponse, ExpansionController, PendingAction, RowState, Toggle,
};
pub use generator::Generator;
pub use grid::{GridConfig, MetricsGrid};
pub use months::{DEFAULT_WINDOW, MAX_WINDOW, MonthWindow, ordinal_name};
pub use provider::{MetricsFilter, MetricsProvider, MockProvider, ProviderError};
pub use rows::{
    ChildRow, GridRow, MonthCell, NDTR, ParentRow, SummaryParts, format_summary, project_children,
    project_parents, split_summary,
};
pub use tone::{StatusColor, Tone, TonePair, TonePalette};
