//! HTML table formatting for reports.
//!
//! Provides functions to generate markup for:
//! - Run parameters and missing-instrument warnings
//! - The tail of each derived date table
//! - The summary statistics table
//! - The event list

use super::escape_html;
use crate::domain::acquisition::MissingInstrument;
use crate::domain::dashboard::Dashboard;
use crate::domain::metrics::SummaryStatistics;
use crate::domain::registry::EventMarker;
use crate::domain::table::DateTable;
use indexmap::IndexMap;

pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a finite value with `decimals` places; missing or NaN is `N/A`.
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn render_parameters(dashboard: &Dashboard) -> String {
    let params = &dashboard.params;
    let rows = [
        ("Start date", params.start_date.to_string()),
        ("End date", params.end_date.to_string()),
        ("Selected", dashboard.selected.join(", ")),
        ("Row policy", params.row_policy.as_str().to_string()),
        ("Rows", dashboard.close_prices.len().to_string()),
    ];

    let mut output = String::from("<table class=\"params\">\n");
    for (label, value) in rows {
        output.push_str(&format!(
            "  <tr><th>{}</th><td>{}</td></tr>\n",
            label,
            escape_html(&value)
        ));
    }
    output.push_str("</table>\n");
    output
}

pub fn render_warnings(missing: &[MissingInstrument]) -> String {
    if missing.is_empty() {
        return String::new();
    }
    let mut output = String::from("<div class=\"warnings\">\n<ul>\n");
    for m in missing {
        output.push_str(&format!(
            "  <li>No data obtained for {} ({}): {}</li>\n",
            escape_html(&m.name),
            escape_html(&m.symbol),
            escape_html(&m.reason.to_string())
        ));
    }
    output.push_str("</ul>\n</div>\n");
    output
}

/// Last `rows` rows of `table`, one column per instrument.
pub fn render_date_table(table: &DateTable, rows: usize, format: fn(Option<f64>) -> String) -> String {
    if table.is_empty() {
        return "<p class=\"empty\">No rows.</p>\n".to_string();
    }
    let tail = table.tail(rows);

    let mut output = String::from("<table>\n  <thead><tr><th>Date</th>");
    for column in tail.columns() {
        output.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    output.push_str("</tr></thead>\n  <tbody>\n");

    for (date, cells) in tail.rows() {
        output.push_str(&format!("    <tr><td>{date}</td>"));
        for cell in cells {
            output.push_str(&format!("<td>{}</td>", format(*cell)));
        }
        output.push_str("</tr>\n");
    }

    output.push_str("  </tbody>\n</table>\n");
    output
}

pub fn render_statistics_table(statistics: &IndexMap<String, SummaryStatistics>) -> String {
    if statistics.is_empty() {
        return "<p class=\"empty\">No statistics.</p>\n".to_string();
    }

    let mut output = String::from(
        "<table>\n  <thead><tr><th>Instrument</th><th>Mean daily return</th><th>Std daily return</th><th>Annualized return</th><th>Annualized volatility</th><th>Observations</th></tr></thead>\n  <tbody>\n",
    );
    for (name, stats) in statistics {
        output.push_str(&format!(
            "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(name),
            format_value(Some(stats.mean_daily_return), 4),
            format_value(Some(stats.std_daily_return), 4),
            format_value(Some(stats.annualized_return), 4),
            format_value(Some(stats.annualized_volatility), 4),
            stats.observations
        ));
    }
    output.push_str("  </tbody>\n</table>\n");
    output
}

pub fn render_events(events: &[EventMarker]) -> String {
    if events.is_empty() {
        return String::new();
    }
    let mut output = String::from("<ul class=\"events\">\n");
    for event in events {
        output.push_str(&format!(
            "  <li>{}: {}</li>\n",
            event.date,
            escape_html(&event.label)
        ));
    }
    output.push_str("</ul>\n");
    output
}
