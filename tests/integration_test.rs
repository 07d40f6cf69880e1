//! Integration tests for the dashboard pipeline.
//!
//! Tests cover:
//! - Full pipeline with mock data port (fetch, select, align, derive)
//! - Instruments without data are excluded and reported
//! - Selection edge cases (only missing instruments, unknown names)
//! - Non-overlapping date ranges under both row policies
//! - Cumulative/price round-trip over a long series
//! - End-to-end report rendering from a pipeline result

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use equitydash::adapters::html_report::HtmlReportAdapter;
use equitydash::domain::acquisition::MissingReason;
use equitydash::domain::dashboard::{
    DashboardParams, assemble_dashboard, build_dashboard, fetch_prices,
};
use equitydash::domain::error::DashboardError;
use equitydash::domain::metrics::RowPolicy;
use equitydash::ports::report_port::ReportPort;

fn params() -> DashboardParams {
    let mut params = DashboardParams::new(date(2025, 12, 31));
    params.start_date = date(2025, 1, 1);
    params
}

fn column(table: &equitydash::domain::table::DateTable, name: &str) -> Vec<f64> {
    table.column_values(name).into_iter().map(|(_, v)| v).collect()
}

mod full_pipeline {
    use super::*;

    #[test]
    fn known_prices_produce_known_metrics() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 110.0, 99.0]));

        let dashboard = build_dashboard(&port, &sample_registry(), &params()).unwrap();

        assert_eq!(dashboard.selected, vec!["A".to_string()]);
        assert_eq!(dashboard.close_prices.len(), 3);

        let returns = column(&dashboard.returns, "A");
        assert_eq!(returns.len(), 2);
        assert_abs_diff_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(returns[1], -0.10, epsilon = 1e-12);

        let cumulative = column(&dashboard.cumulative_returns, "A");
        assert_abs_diff_eq!(cumulative[0], 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(cumulative[1], -0.01, epsilon = 1e-12);

        let change = column(&dashboard.price_change, "A");
        assert_abs_diff_eq!(change[0], 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(change[1], -11.0, epsilon = 1e-12);

        let stats = &dashboard.statistics["A"];
        assert_eq!(stats.observations, 2);
        assert_abs_diff_eq!(stats.mean_daily_return, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.std_daily_return, 0.02_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            stats.annualized_volatility,
            0.02_f64.sqrt() * 252.0_f64.sqrt(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn events_follow_registry_order() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[1.0, 2.0]));

        let dashboard = build_dashboard(&port, &sample_registry(), &params()).unwrap();

        let labels: Vec<&str> = dashboard.events.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["First event", "Second event"]);
    }

    #[test]
    fn every_registry_instrument_is_fetched_once() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[1.0, 2.0]));

        build_dashboard(&port, &sample_registry(), &params()).unwrap();

        assert_eq!(*port.calls.borrow(), vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn date_range_limits_rows() {
        let port = MockDataPort::new().with_bars(
            "AAA",
            bars_from_closes("AAA", "2024-12-30", &[1.0, 2.0, 3.0, 4.0, 5.0]),
        );

        let dashboard = build_dashboard(&port, &sample_registry(), &params()).unwrap();

        assert_eq!(dashboard.close_prices.dates().first(), Some(&date(2025, 1, 1)));
        assert_eq!(dashboard.close_prices.len(), 3);
    }

    #[test]
    fn inverted_range_fails_before_fetching() {
        let port = MockDataPort::new();
        let mut params = params();
        params.end_date = date(2024, 6, 1);

        let result = build_dashboard(&port, &sample_registry(), &params);

        assert!(matches!(result, Err(DashboardError::InvalidDateRange { .. })));
        assert!(port.calls.borrow().is_empty());
    }
}

mod missing_instruments {
    use super::*;

    #[test]
    fn instrument_without_data_is_excluded_and_reported() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 101.0]))
            .with_error("CCC", "connection reset");

        let dashboard = build_dashboard(&port, &sample_registry(), &params()).unwrap();

        assert_eq!(dashboard.selected, vec!["A".to_string()]);
        assert_eq!(dashboard.close_prices.columns(), &["A".to_string()]);
        assert_eq!(dashboard.missing.len(), 2);
        assert_eq!(dashboard.missing[0].name, "B");
        assert_eq!(dashboard.missing[0].reason, MissingReason::NoData);
        assert!(matches!(
            &dashboard.missing[1].reason,
            MissingReason::FetchFailed(reason) if reason.contains("connection reset")
        ));
    }

    #[test]
    fn selecting_only_missing_instrument_is_empty_selection() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 101.0]));
        let mut params = params();
        params.selection = Some(vec!["B".to_string()]);

        let result = build_dashboard(&port, &sample_registry(), &params);

        assert!(matches!(result, Err(DashboardError::EmptySelection)));
    }

    #[test]
    fn missing_list_is_known_before_selection_fails() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 101.0]));
        let mut params = params();
        params.selection = Some(vec!["B".to_string()]);

        let acquisition = fetch_prices(&port, &sample_registry(), &params).unwrap();
        let missing: Vec<&str> = acquisition.missing.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(missing, vec!["B", "C"]);

        let result = assemble_dashboard(acquisition, &sample_registry(), &params);
        assert!(matches!(result, Err(DashboardError::EmptySelection)));
    }

    #[test]
    fn fetch_prices_rejects_inverted_range() {
        let port = MockDataPort::new();
        let mut params = params();
        params.end_date = date(2024, 6, 1);

        assert!(matches!(
            fetch_prices(&port, &sample_registry(), &params),
            Err(DashboardError::InvalidDateRange { .. })
        ));
        assert!(port.calls.borrow().is_empty());
    }

    #[test]
    fn no_data_anywhere_is_empty_selection() {
        let result = build_dashboard(&MockDataPort::new(), &sample_registry(), &params());
        assert!(matches!(result, Err(DashboardError::EmptySelection)));
    }

    #[test]
    fn unknown_names_are_dropped_from_selection() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[1.0, 2.0]))
            .with_bars("CCC", bars_from_closes("CCC", "2025-01-01", &[3.0, 4.0]));
        let mut params = params();
        params.selection = Some(vec!["C".to_string(), "Z".to_string(), "C".to_string()]);

        let dashboard = build_dashboard(&port, &sample_registry(), &params).unwrap();

        assert_eq!(dashboard.selected, vec!["C".to_string()]);
    }
}

mod row_policies {
    use super::*;

    fn staggered_port() -> MockDataPort {
        MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 110.0, 99.0]))
            .with_bars("CCC", bars_from_closes("CCC", "2025-01-03", &[50.0, 55.0, 60.5]))
    }

    #[test]
    fn alignment_is_outer_join() {
        let dashboard = build_dashboard(&staggered_port(), &sample_registry(), &params()).unwrap();

        assert_eq!(dashboard.close_prices.len(), 5);
        assert_eq!(dashboard.close_prices.value(date(2025, 1, 1), "C"), None);
        assert_eq!(dashboard.close_prices.value(date(2025, 1, 5), "A"), None);
        assert_eq!(dashboard.close_prices.value(date(2025, 1, 3), "A"), Some(99.0));
        assert_eq!(dashboard.close_prices.value(date(2025, 1, 3), "C"), Some(50.0));
    }

    #[test]
    fn complete_policy_requires_every_pair() {
        let dashboard = build_dashboard(&staggered_port(), &sample_registry(), &params()).unwrap();

        assert!(dashboard.returns.is_empty());
        assert!(dashboard.price_change.is_empty());
        assert!(dashboard.histogram.is_none());
    }

    #[test]
    fn independent_policy_keeps_each_instruments_pairs() {
        let mut params = params();
        params.row_policy = RowPolicy::Independent;

        let dashboard = build_dashboard(&staggered_port(), &sample_registry(), &params).unwrap();

        assert_eq!(dashboard.returns.len(), 4);
        assert_eq!(column(&dashboard.returns, "A").len(), 2);
        assert_eq!(column(&dashboard.returns, "C").len(), 2);
        // No return bridges A's last quote and C's first.
        assert_eq!(dashboard.returns.value(date(2025, 1, 3), "C"), None);
        assert!(dashboard.histogram.is_some());
    }

    #[test]
    fn statistics_use_each_instruments_own_range() {
        // Statistics are identical under both policies.
        let complete = build_dashboard(&staggered_port(), &sample_registry(), &params()).unwrap();

        let c = &complete.statistics["C"];
        assert_eq!(c.observations, 2);
        assert_abs_diff_eq!(c.mean_daily_return, 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(c.std_daily_return, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn single_quote_has_undefined_statistics() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 101.0, 102.0]))
            .with_bars("BBB", bars_from_closes("BBB", "2025-01-02", &[7.0]));
        let mut params = params();
        params.row_policy = RowPolicy::Independent;

        let dashboard = build_dashboard(&port, &sample_registry(), &params).unwrap();

        let b = &dashboard.statistics["B"];
        assert_eq!(b.observations, 0);
        assert!(b.mean_daily_return.is_nan());
        assert!(b.std_daily_return.is_nan());
        assert!(!b.is_defined());
    }
}

mod round_trip {
    use super::*;

    #[test]
    fn cumulative_return_matches_price_ratio() {
        let closes: Vec<f64> = (0..250)
            .map(|i| 100.0 * (1.0 + 0.03 * ((i as f64) * 0.7).sin()) + i as f64 * 0.05)
            .collect();
        let port = MockDataPort::new().with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &closes));
        let mut params = params();
        params.end_date = date(2026, 12, 31);

        let dashboard = build_dashboard(&port, &sample_registry(), &params).unwrap();

        let (_, last_cum) = dashboard.cumulative_returns.last_value("A").unwrap();
        let expected = closes[closes.len() - 1] / closes[0] - 1.0;
        assert_abs_diff_eq!(last_cum, expected, epsilon = 1e-9);

        let total_change: f64 = column(&dashboard.price_change, "A").iter().sum();
        assert_abs_diff_eq!(total_change, closes[closes.len() - 1] - closes[0], epsilon = 1e-9);
    }
}

mod report_rendering {
    use super::*;
    use std::fs;

    #[test]
    fn pipeline_result_renders_html() {
        let port = MockDataPort::new()
            .with_bars("AAA", bars_from_closes("AAA", "2025-01-01", &[100.0, 110.0, 99.0, 101.0]))
            .with_bars("CCC", bars_from_closes("CCC", "2025-01-01", &[20.0, 21.0, 22.0, 21.5]));
        let dashboard = build_dashboard(&port, &sample_registry(), &params()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.html");
        HtmlReportAdapter::default()
            .write(&dashboard, output.to_str().unwrap())
            .unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("No data obtained for B (BBB)"));
        assert!(html.contains("First event"));
        assert!(html.contains("Second event"));
        assert_eq!(html.matches("<svg").count(), 5);
        assert!(!html.contains("{{"));
    }
}
