//! Instrument and event registry.
//!
//! The registry is the fixed set of instruments the dashboard tracks and the
//! calendar events overlaid on its charts. It is read once at startup (built-in
//! defaults or the `[instruments]` / `[events]` config sections) and never
//! mutated afterwards.

use crate::domain::error::DashboardError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub display_name: String,
    pub symbol: String,
}

impl Instrument {
    pub fn new(display_name: &str, symbol: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMarker {
    pub label: String,
    pub date: NaiveDate,
}

impl EventMarker {
    pub fn new(label: &str, date: NaiveDate) -> Self {
        Self {
            label: label.to_string(),
            date,
        }
    }
}

const DEFAULT_INSTRUMENTS: [(&str, &str); 4] = [
    ("Ternium México", "TX.MX"),
    ("Grupo Simec", "SIMECB.MX"),
    ("Industrias CH", "ICHB.MX"),
    ("AHMSA", "AHMSA.MX"),
];

const DEFAULT_EVENTS: [(&str, i32, u32, u32); 3] = [
    ("Tariff announcement (Trump)", 2025, 2, 9),
    ("Tariffs imposed (USA)", 2025, 3, 12),
    ("Pending decision (Sheinbaum)", 2025, 4, 2),
];

#[derive(Debug, Clone)]
pub struct Registry {
    instruments: Vec<Instrument>,
    events: Vec<EventMarker>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            instruments: default_instruments(),
            events: default_events(),
        }
    }
}

impl Registry {
    pub fn new(
        instruments: Vec<Instrument>,
        events: Vec<EventMarker>,
    ) -> Result<Self, DashboardError> {
        let mut names = HashSet::new();
        for instrument in &instruments {
            if instrument.display_name.trim().is_empty() {
                return Err(DashboardError::config_invalid(
                    "instruments",
                    &instrument.symbol,
                    "empty instrument name",
                ));
            }
            if instrument.symbol.trim().is_empty() {
                return Err(DashboardError::config_invalid(
                    "instruments",
                    &instrument.display_name,
                    "empty symbol",
                ));
            }
            if !names.insert(instrument.display_name.as_str()) {
                return Err(DashboardError::config_invalid(
                    "instruments",
                    &instrument.display_name,
                    "duplicate instrument name",
                ));
            }
        }
        Ok(Self {
            instruments,
            events,
        })
    }

    /// Builds the registry from the `[instruments]` and `[events]` sections.
    /// A missing section falls back to the built-in defaults.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, DashboardError> {
        let instruments = if config.has_section("instruments") {
            config
                .get_section("instruments")
                .into_iter()
                .map(|(name, symbol)| Instrument {
                    display_name: name.trim().to_string(),
                    symbol: symbol.trim().to_string(),
                })
                .collect()
        } else {
            default_instruments()
        };

        let events = if config.has_section("events") {
            config
                .get_section("events")
                .into_iter()
                .map(|(label, date)| {
                    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(
                        |_| {
                            DashboardError::config_invalid(
                                "events",
                                &label,
                                "invalid date format (expected YYYY-MM-DD)",
                            )
                        },
                    )?;
                    Ok(EventMarker {
                        label: label.trim().to_string(),
                        date: parsed,
                    })
                })
                .collect::<Result<Vec<_>, DashboardError>>()?
        } else {
            default_events()
        };

        Self::new(instruments, events)
    }

    pub fn list_instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn list_events(&self) -> &[EventMarker] {
        &self.events
    }

    pub fn find(&self, display_name: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.display_name == display_name)
    }
}

fn default_instruments() -> Vec<Instrument> {
    DEFAULT_INSTRUMENTS
        .iter()
        .map(|(name, symbol)| Instrument::new(name, symbol))
        .collect()
}

fn default_events() -> Vec<EventMarker> {
    DEFAULT_EVENTS
        .iter()
        .filter_map(|&(label, y, m, d)| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| EventMarker::new(label, date))
        })
        .collect()
}
