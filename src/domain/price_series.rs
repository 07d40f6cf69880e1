//! Close-price series for one instrument.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub name: String,
    points: Vec<(NaiveDate, f64)>,
}

impl PriceSeries {
    /// Dates must be strictly increasing.
    pub fn new(name: &str, points: Vec<(NaiveDate, f64)>) -> Result<Self, DashboardError> {
        if let Some(pair) = points.windows(2).find(|w| w[1].0 <= w[0].0) {
            let reason = if pair[1].0 == pair[0].0 {
                format!("duplicate date {}", pair[1].0)
            } else {
                format!("date {} follows {}", pair[1].0, pair[0].0)
            };
            return Err(DashboardError::InvalidSeries {
                name: name.to_string(),
                reason,
            });
        }
        Ok(Self {
            name: name.to_string(),
            points,
        })
    }

    /// Builds a series from provider bars, sorting by date and skipping bars
    /// without a usable close.
    pub fn from_bars(name: &str, bars: &[OhlcvBar]) -> Result<Self, DashboardError> {
        let mut points: Vec<(NaiveDate, f64)> = bars
            .iter()
            .filter(|bar| {
                let usable = bar.has_usable_close();
                if !usable {
                    debug!(instrument = name, date = %bar.date, close = bar.close, "skipping bar without usable close");
                }
                usable
            })
            .map(|bar| (bar.date, bar.close))
            .collect();
        points.sort_by_key(|(date, _)| *date);
        Self::new(name, points)
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.0, last.0)),
            _ => None,
        }
    }
}
