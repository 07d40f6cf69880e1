//! Plain-text dashboard tables for the terminal.
//!
//! Writes the close, returns, cumulative, price-change and statistics tables
//! with `comfy-table`. The path `-` means stdout.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::adapters::html_report::DEFAULT_TABLE_ROWS;
use crate::adapters::html_report::tables::{format_pct, format_value};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::domain::table::DateTable;
use crate::ports::report_port::ReportPort;

pub const STDOUT_PATH: &str = "-";

pub struct ConsoleReportAdapter {
    table_rows: usize,
}

impl ConsoleReportAdapter {
    pub fn new(table_rows: usize) -> Self {
        Self { table_rows }
    }
}

impl Default for ConsoleReportAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_ROWS)
    }
}

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn date_table(source: &DateTable, rows: usize, format: fn(Option<f64>) -> String) -> Table {
    let mut header = vec!["Date".to_string()];
    header.extend(source.columns().iter().cloned());
    let mut table = new_table(header);

    for (date, cells) in source.tail(rows).rows() {
        let mut row = vec![Cell::new(date)];
        row.extend(
            cells
                .iter()
                .map(|c| Cell::new(format(*c)).set_alignment(CellAlignment::Right)),
        );
        table.add_row(row);
    }
    table
}

fn statistics_table(dashboard: &Dashboard) -> Table {
    let mut table = new_table(
        [
            "Instrument",
            "Mean daily",
            "Std daily",
            "Annualized return",
            "Annualized volatility",
            "Obs",
        ]
        .map(String::from)
        .to_vec(),
    );
    for (name, stats) in &dashboard.statistics {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(format_value(Some(stats.mean_daily_return), 4)),
            Cell::new(format_value(Some(stats.std_daily_return), 4)),
            Cell::new(format_value(Some(stats.annualized_return), 4)),
            Cell::new(format_value(Some(stats.annualized_volatility), 4)),
            Cell::new(stats.observations),
        ]);
    }
    table
}

/// Full text rendering of the dashboard tables.
pub fn render(dashboard: &Dashboard, rows: usize) -> String {
    let price = |v: Option<f64>| format_value(v, 2);
    let sections = [
        ("Close prices", date_table(&dashboard.close_prices, rows, price)),
        ("Daily returns", date_table(&dashboard.returns, rows, format_pct)),
        (
            "Cumulative returns",
            date_table(&dashboard.cumulative_returns, rows, format_pct),
        ),
        (
            "Daily price change",
            date_table(&dashboard.price_change, rows, price),
        ),
        ("Summary statistics", statistics_table(dashboard)),
    ];

    let mut output = format!(
        "{} to {} | {} | policy: {}\n",
        dashboard.params.start_date,
        dashboard.params.end_date,
        dashboard.selected.join(", "),
        dashboard.params.row_policy.as_str()
    );
    for missing in &dashboard.missing {
        output.push_str(&format!(
            "warning: no data obtained for {} ({}): {}\n",
            missing.name, missing.symbol, missing.reason
        ));
    }
    for (title, table) in sections {
        output.push_str(&format!("\n{title}\n{table}\n"));
    }
    output
}

impl ReportPort for ConsoleReportAdapter {
    fn write(&self, dashboard: &Dashboard, output_path: &str) -> Result<(), DashboardError> {
        let text = render(dashboard, self.table_rows);
        if output_path == STDOUT_PATH {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            return Ok(());
        }

        let path = Path::new(output_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        Ok(())
    }
}
