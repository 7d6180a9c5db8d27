//! Property tests for the grid invariants: window stability, row-key
//! uniqueness, and NDTR synthesis under arbitrary data and toggle
//! sequences.

use std::collections::BTreeSet;

use proptest::prelude::*;

use scorecard_core::{
    DetailResponse, GridConfig, GridRow, Metric, MetricsFilter, MetricsGrid, MetricsProvider,
    MockProvider, MonthWindow, MonthlyRecord, StatusColor, SubEntityRecord, Toggle,
};

/// A metric with an arbitrary subset of months recorded.
fn arb_metric(id: u32) -> impl Strategy<Value = Metric> {
    proptest::collection::btree_set(0u32..18, 0..10).prop_map(move |month_offsets| {
        let mut metric = Metric::new(id, format!("PM{id:03}"), format!("Synthetic metric {id}"));
        for offset in month_offsets {
            let year = 2024 + i32::try_from(offset / 12).unwrap_or(0);
            let month = offset % 12 + 1;
            metric.monthly.push(MonthlyRecord::new(
                format!("{year}-{month:02}"),
                "75.00-3-4",
                StatusColor::Amber,
            ));
        }
        metric
    })
}

fn arb_metrics() -> impl Strategy<Value = Vec<Metric>> {
    proptest::collection::vec(1u32..200, 0..12).prop_flat_map(|ids| {
        let distinct: Vec<u32> = ids
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        distinct
            .into_iter()
            .map(arb_metric)
            .collect::<Vec<_>>()
    })
}

fn distinct_month_count(metrics: &[Metric]) -> usize {
    metrics
        .iter()
        .flat_map(|m| m.monthly.iter())
        .map(|r| r.month.as_str())
        .collect::<BTreeSet<_>>()
        .len()
}

fn assert_unique_row_keys(grid: &MetricsGrid) {
    let keys: Vec<String> = grid.rows().iter().map(GridRow::row_key).collect();
    let distinct: BTreeSet<&String> = keys.iter().collect();
    assert_eq!(distinct.len(), keys.len(), "duplicate row keys: {keys:?}");
}

proptest! {
    /// Window stability: exactly `min(N, distinct_month_count)` months,
    /// ascending, no duplicates.
    #[test]
    fn window_stability(metrics in arb_metrics(), size in 1usize..24) {
        let window = MonthWindow::resolve(&metrics, size, None);

        prop_assert_eq!(window.len(), size.min(distinct_month_count(&metrics)));

        let months = window.months();
        let distinct: BTreeSet<&String> = months.iter().collect();
        prop_assert_eq!(distinct.len(), months.len());
        for pair in months.windows(2) {
            prop_assert!(pair[0] < pair[1], "window not ascending: {:?}", months);
        }
    }

    /// NDTR synthesis: every in-window month absent from a metric's records
    /// projects as NDTR/grey; every present month projects its record.
    #[test]
    fn ndtr_synthesis(metrics in arb_metrics(), size in 1usize..24) {
        let mut grid = MetricsGrid::new(GridConfig::new(size));
        grid.set_metrics(metrics.clone());

        for (metric, row) in metrics.iter().zip(grid.rows()) {
            prop_assert_eq!(row.cells().len(), grid.window().len());
            for cell in row.cells() {
                match metric.record_for(&cell.month) {
                    Some(record) => {
                        prop_assert_eq!(&cell.result, &record.result);
                        prop_assert_eq!(cell.color, record.color);
                    }
                    None => {
                        prop_assert_eq!(&cell.result, &"NDTR".to_string());
                        prop_assert_eq!(cell.color, StatusColor::Grey);
                    }
                }
            }
        }
    }

    /// Row-key uniqueness holds through arbitrary toggle sequences against
    /// the seeded provider, including immediately after each expand and
    /// collapse.
    #[test]
    fn row_keys_unique_through_toggles(seed in 0u64..50, toggles in proptest::collection::vec(1u32..13, 1..20)) {
        let provider = MockProvider::seeded(seed);
        let mut grid = MetricsGrid::new(GridConfig::default());
        grid.set_metrics(provider.fetch_metrics(&MetricsFilter::default()).unwrap());

        for metric_id in toggles {
            match grid.toggle(metric_id) {
                Toggle::BeginExpand(request) => {
                    let records = provider
                        .fetch_details(metric_id, &MetricsFilter::default())
                        .unwrap_or_default();
                    grid.apply_details(&DetailResponse {
                        metric_id: request.metric_id,
                        generation: request.generation,
                        records,
                    });
                }
                Toggle::BeginCollapse(_) | Toggle::Ignored => {}
            }
            assert_unique_row_keys(&grid);

            // Children, when present, sit contiguously after their parent.
            let rows = grid.rows();
            for (i, row) in rows.iter().enumerate() {
                if !row.is_parent() {
                    let prev = &rows[i - 1];
                    prop_assert!(
                        prev.metric_id() == row.metric_id(),
                        "child row not adjacent to its group at index {}",
                        i
                    );
                }
            }
        }
    }

    /// Expand then collapse returns the grid to its pre-expand shape.
    #[test]
    fn expand_collapse_round_trip(seed in 0u64..50, metric_id in 1u32..13) {
        let provider = MockProvider::seeded(seed);
        let mut grid = MetricsGrid::new(GridConfig::default());
        grid.set_metrics(provider.fetch_metrics(&MetricsFilter::default()).unwrap());
        let baseline: Vec<String> = grid.rows().iter().map(GridRow::row_key).collect();

        if let Toggle::BeginExpand(request) = grid.toggle(metric_id) {
            let records = provider
                .fetch_details(metric_id, &MetricsFilter::default())
                .unwrap_or_default();
            let applied = grid.apply_details(&DetailResponse {
                metric_id: request.metric_id,
                generation: request.generation,
                records,
            });
            if applied {
                grid.toggle(metric_id);
            }
        }

        let after: Vec<String> = grid.rows().iter().map(GridRow::row_key).collect();
        prop_assert_eq!(baseline, after);
    }
}

/// Subentity fixtures keep the child-adjacency property honest even when
/// the provider returns an empty breakdown.
#[test]
fn empty_breakdown_is_a_no_op() {
    let mut metric = Metric::new(1, "PM001", "Backlog Reduction Rate");
    metric
        .monthly
        .push(MonthlyRecord::new("2025-02", "88.00-88-100", StatusColor::Amber));
    let mut grid = MetricsGrid::new(GridConfig::default());
    grid.set_metrics(vec![metric]);

    let Toggle::BeginExpand(request) = grid.toggle(1) else {
        panic!("expected BeginExpand");
    };
    let applied = grid.apply_details(&DetailResponse {
        metric_id: 1,
        generation: request.generation,
        records: Vec::<SubEntityRecord>::new(),
    });
    assert!(!applied);
    assert_eq!(grid.rows().len(), 1);
}
