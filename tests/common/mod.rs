#![allow(dead_code)]

use chrono::NaiveDate;
use equitydash::domain::error::DashboardError;
pub use equitydash::domain::ohlcv::OhlcvBar;
use equitydash::domain::registry::{EventMarker, Instrument, Registry};
use equitydash::ports::data_port::DataPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DashboardError> {
        self.calls.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DashboardError::DataSource {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar::from_close(
        symbol,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        close,
    )
}

/// One bar per calendar day starting at `start_date`.
pub fn bars_from_closes(symbol: &str, start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            OhlcvBar::from_close(symbol, start + chrono::Duration::days(i as i64), *close)
        })
        .collect()
}

/// Registry with instruments A (AAA), B (BBB) and C (CCC) and two events.
pub fn sample_registry() -> Registry {
    Registry::new(
        vec![
            Instrument::new("A", "AAA"),
            Instrument::new("B", "BBB"),
            Instrument::new("C", "CCC"),
        ],
        vec![
            EventMarker::new("First event", date(2025, 1, 3)),
            EventMarker::new("Second event", date(2025, 1, 3)),
        ],
    )
    .unwrap()
}

pub fn write_csv(dir: &Path, symbol: &str, rows: &[(&str, f64)]) {
    let mut content = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (date, close) in rows {
        content.push_str(&format!("{date},{close},{close},{close},{close},{close},1000\n"));
    }
    std::fs::write(dir.join(format!("{symbol}.csv")), content).unwrap();
}
