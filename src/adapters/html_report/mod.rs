//! HTML dashboard report.
//!
//! Reads an HTML template (either the built-in default or a custom file via
//! `template_path`), resolves all `{{PLACEHOLDER}}` markers with helpers from
//! `chart_svg` and `tables`, and writes a single self-contained page.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::domain::registry::EventMarker;
use crate::domain::table::DateTable;
use crate::ports::report_port::ReportPort;
use chart_svg::{SvgChart, empty_chart, format_number, format_percent, render_histogram};

pub const DEFAULT_TITLE: &str = "Interactive Equity Price and Performance Dashboard";
pub const DEFAULT_TABLE_ROWS: usize = 5;

/// Escapes text for HTML element and attribute content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Options for resolving template placeholders.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub description: String,
    pub table_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: String::new(),
            table_rows: DEFAULT_TABLE_ROWS,
        }
    }
}

fn line_chart(title: &str, table: &DateTable, events: &[EventMarker], format: fn(f64) -> String) -> String {
    match SvgChart::for_table(title, table, events) {
        Some(chart) => chart.render_lines(table, format),
        None => empty_chart(title),
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in `template` and return the final page.
pub fn resolve(template: &str, dashboard: &Dashboard, options: &ReportOptions) -> String {
    let rows = options.table_rows;
    let mut output = template.to_string();

    output = output.replace("{{TITLE}}", &escape_html(&options.title));
    output = output.replace("{{DESCRIPTION}}", &escape_html(&options.description));
    output = output.replace("{{PARAMETERS}}", &tables::render_parameters(dashboard));
    output = output.replace("{{WARNINGS}}", &tables::render_warnings(&dashboard.missing));
    output = output.replace("{{EVENTS}}", &tables::render_events(&dashboard.events));

    // Close prices
    output = output.replace(
        "{{CLOSE_TABLE}}",
        &tables::render_date_table(&dashboard.close_prices, rows, |v| tables::format_value(v, 2)),
    );
    output = output.replace(
        "{{CLOSE_CHART}}",
        &line_chart("Close Price", &dashboard.close_prices, &dashboard.events, format_number),
    );

    // Daily returns
    output = output.replace(
        "{{RETURNS_TABLE}}",
        &tables::render_date_table(&dashboard.returns, rows, tables::format_pct),
    );
    output = output.replace(
        "{{RETURNS_CHART}}",
        &line_chart("Daily Returns", &dashboard.returns, &dashboard.events, format_percent),
    );

    // Cumulative returns
    output = output.replace(
        "{{CUMULATIVE_TABLE}}",
        &tables::render_date_table(&dashboard.cumulative_returns, rows, tables::format_pct),
    );
    output = output.replace(
        "{{CUMULATIVE_CHART}}",
        &line_chart(
            "Cumulative Returns",
            &dashboard.cumulative_returns,
            &dashboard.events,
            format_percent,
        ),
    );

    // Price change bars
    output = output.replace(
        "{{PRICE_CHANGE_TABLE}}",
        &tables::render_date_table(&dashboard.price_change, rows, |v| tables::format_value(v, 2)),
    );
    let change_title = "Daily Absolute Price Change";
    let change_chart = match SvgChart::for_table(change_title, &dashboard.price_change, &dashboard.events) {
        Some(chart) => chart.render_grouped_bars(&dashboard.price_change, format_number),
        None => empty_chart(change_title),
    };
    output = output.replace("{{PRICE_CHANGE_CHART}}", &change_chart);

    output = output.replace(
        "{{HISTOGRAM_CHART}}",
        &render_histogram("Daily Return Histogram", dashboard.histogram.as_ref()),
    );
    output = output.replace(
        "{{STATISTICS_TABLE}}",
        &tables::render_statistics_table(&dashboard.statistics),
    );

    output
}

pub struct HtmlReportAdapter {
    options: ReportOptions,
    template_path: Option<PathBuf>,
}

impl HtmlReportAdapter {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            template_path: None,
        }
    }

    pub fn with_template_path(mut self, path: PathBuf) -> Self {
        self.template_path = Some(path);
        self
    }

    fn load_template(&self) -> Result<String, DashboardError> {
        match &self.template_path {
            Some(path) => fs::read_to_string(path).map_err(|e| DashboardError::Report {
                reason: format!("failed to read template {}: {}", path.display(), e),
            }),
            None => Ok(default_template::template().to_string()),
        }
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}

impl ReportPort for HtmlReportAdapter {
    fn write(&self, dashboard: &Dashboard, output_path: &str) -> Result<(), DashboardError> {
        let template = self.load_template()?;
        let html = resolve(&template, dashboard, &self.options);

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;

        info!(path = %path.display(), "report written");
        Ok(())
    }
}
