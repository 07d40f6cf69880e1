//! Fetches close prices for every registry instrument.
//!
//! A failed or empty fetch never aborts the run: the instrument is recorded as
//! missing and the remaining instruments proceed. Callers surface the
//! missing list to the user.

use crate::domain::price_series::PriceSeries;
use crate::domain::registry::Instrument;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum MissingReason {
    /// The provider returned no rows for the range.
    NoData,
    /// The provider call failed.
    FetchFailed(String),
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReason::NoData => write!(f, "no data for the requested range"),
            MissingReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingInstrument {
    pub name: String,
    pub symbol: String,
    pub reason: MissingReason,
}

#[derive(Debug, Clone, Default)]
pub struct Acquisition {
    /// Non-empty series in registry order.
    pub series: IndexMap<String, PriceSeries>,
    pub missing: Vec<MissingInstrument>,
}

impl Acquisition {
    /// Names offered for selection.
    pub fn available(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }
}

pub fn acquire(
    data_port: &dyn DataPort,
    instruments: &[Instrument],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Acquisition {
    let mut acquisition = Acquisition::default();

    for instrument in instruments {
        let name = &instrument.display_name;
        let symbol = &instrument.symbol;

        let reason = match data_port.fetch_ohlcv(symbol, start_date, end_date) {
            Err(e) => MissingReason::FetchFailed(e.to_string()),
            Ok(bars) => match PriceSeries::from_bars(name, &bars) {
                Ok(series) => match series.date_range() {
                    Some((first, last)) => {
                        info!(
                            instrument = %name,
                            symbol = %symbol,
                            rows = series.len(),
                            first = %first,
                            last = %last,
                            "loaded prices"
                        );
                        acquisition.series.insert(name.clone(), series);
                        continue;
                    }
                    None => MissingReason::NoData,
                },
                Err(e) => MissingReason::FetchFailed(e.to_string()),
            },
        };

        debug!(instrument = %name, symbol = %symbol, "no data obtained: {reason}");
        acquisition.missing.push(MissingInstrument {
            name: name.clone(),
            symbol: symbol.clone(),
            reason,
        });
    }

    acquisition
}
