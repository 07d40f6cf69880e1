//! CSV directory data adapter.
//!
//! Reads `<base>/<SYMBOL>.csv`. Columns are located by header name
//! (case-insensitive): `date` and `close` are required, `open`, `high`, `low`
//! and `volume` are optional. A missing file is an empty result.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord, symbol: &str) -> Result<Self, DashboardError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            find(name).ok_or_else(|| DashboardError::DataSource {
                symbol: symbol.to_string(),
                reason: format!("missing {name} column"),
            })
        };
        Ok(Self {
            date: required("date")?,
            close: required("close")?,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_price(
    record: &StringRecord,
    index: usize,
    column: &str,
    symbol: &str,
) -> Result<f64, DashboardError> {
    let raw = record.get(index).unwrap_or("").trim();
    // Provider exports leave holidays blank or write "null".
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") || raw.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    raw.parse().map_err(|e| DashboardError::DataSource {
        symbol: symbol.to_string(),
        reason: format!("invalid {} value '{}': {}", column, raw, e),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DashboardError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            debug!(path = %path.display(), "no CSV file for symbol");
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(|e| DashboardError::DataSource {
            symbol: symbol.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DashboardError::DataSource {
            symbol: symbol.to_string(),
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::from_headers(headers, symbol)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DashboardError::DataSource {
                symbol: symbol.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(columns.date).unwrap_or("").trim();
            // Timestamped exports ("2024-01-15 00:00:00-06:00") keep the date part.
            let date_part = date_str.get(..10).unwrap_or(date_str);
            let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
                DashboardError::DataSource {
                    symbol: symbol.to_string(),
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            let close = parse_price(&record, columns.close, "close", symbol)?;
            // Close-only files mirror the close into the other prices.
            let mut bar = OhlcvBar::from_close(symbol, date, close);
            if let Some(i) = columns.open {
                bar.open = parse_price(&record, i, "open", symbol)?;
            }
            if let Some(i) = columns.high {
                bar.high = parse_price(&record, i, "high", symbol)?;
            }
            if let Some(i) = columns.low {
                bar.low = parse_price(&record, i, "low", symbol)?;
            }
            if let Some(i) = columns.volume {
                let v = parse_price(&record, i, "volume", symbol)?;
                if v.is_finite() {
                    bar.volume = v as i64;
                }
            }
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
