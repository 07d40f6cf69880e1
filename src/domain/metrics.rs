//! Derived metrics over aligned close prices.
//!
//! Every function is pure and returns a fresh table; nothing is cached between
//! dashboard runs.

use super::table::DateTable;
use indexmap::IndexMap;
use statrs::statistics::Statistics;
use std::str::FromStr;

/// Trading days per year used for annualization. Fixed, not configurable.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Which rows of a pairwise series (returns, price change) are kept.
///
/// A cell always requires a value on both the row and the previous row of the
/// aligned table; the policy only decides what happens to rows where some
/// instruments have a value and others don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Keep a row only when every instrument has a value on it.
    #[default]
    Complete,
    /// Keep a row when at least one instrument has a value on it.
    Independent,
}

impl RowPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowPolicy::Complete => "complete",
            RowPolicy::Independent => "independent",
        }
    }
}

impl FromStr for RowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "complete" => Ok(RowPolicy::Complete),
            "independent" | "per_instrument" => Ok(RowPolicy::Independent),
            other => Err(format!(
                "unknown row policy '{other}' (expected complete or independent)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStatistics {
    pub mean_daily_return: f64,
    pub std_daily_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub observations: usize,
}

impl SummaryStatistics {
    pub fn from_moments(mean: f64, std_dev: f64, observations: usize) -> Self {
        Self {
            mean_daily_return: mean,
            std_daily_return: std_dev,
            annualized_return: mean * TRADING_DAYS_PER_YEAR,
            annualized_volatility: std_dev * TRADING_DAYS_PER_YEAR.sqrt(),
            observations,
        }
    }

    /// Sample mean and Bessel-corrected standard deviation. The mean is NaN
    /// for an empty slice and the deviation is NaN below two observations.
    pub fn from_returns(returns: &[f64]) -> Self {
        Self::from_moments(returns.mean(), returns.std_dev(), returns.len())
    }

    pub fn is_defined(&self) -> bool {
        self.mean_daily_return.is_finite() && self.std_daily_return.is_finite()
    }
}

/// Simple daily returns: `price[t] / price[t-1] - 1`.
pub fn daily_returns(prices: &DateTable, policy: RowPolicy) -> DateTable {
    pairwise(prices, policy, |prev, curr| curr / prev - 1.0)
}

/// Day-over-day absolute price change: `price[t] - price[t-1]`.
pub fn price_change(prices: &DateTable, policy: RowPolicy) -> DateTable {
    pairwise(prices, policy, |prev, curr| curr - prev)
}

/// Running compounded return per instrument over its own non-missing returns.
pub fn cumulative_returns(returns: &DateTable) -> DateTable {
    let mut running: Vec<Option<f64>> = vec![None; returns.columns().len()];
    let mut out = DateTable::new(returns.columns().to_vec());

    for (date, cells) in returns.rows() {
        let row = cells
            .iter()
            .zip(running.iter_mut())
            .map(|(cell, acc)| {
                let r = (*cell)?;
                let next = match *acc {
                    Some(prev) => (1.0 + prev) * (1.0 + r) - 1.0,
                    None => r,
                };
                *acc = Some(next);
                Some(next)
            })
            .collect();
        out.push_row(date, row);
    }
    out
}

/// Per-instrument statistics over each column's own non-missing returns.
pub fn summary_statistics(returns: &DateTable) -> IndexMap<String, SummaryStatistics> {
    returns
        .columns()
        .iter()
        .map(|name| {
            let values: Vec<f64> = returns
                .column_values(name)
                .into_iter()
                .map(|(_, v)| v)
                .collect();
            (name.clone(), SummaryStatistics::from_returns(&values))
        })
        .collect()
}

fn pairwise(prices: &DateTable, policy: RowPolicy, f: impl Fn(f64, f64) -> f64) -> DateTable {
    let mut out = DateTable::new(prices.columns().to_vec());

    for t in 1..prices.len() {
        let prev = prices.row(t - 1);
        let curr = prices.row(t);
        let cells: Vec<Option<f64>> = prev
            .iter()
            .zip(curr)
            .map(|(p, c)| match (p, c) {
                (Some(p), Some(c)) => Some(f(*p, *c)),
                _ => None,
            })
            .collect();

        let keep = match policy {
            RowPolicy::Complete => cells.iter().all(Option::is_some),
            RowPolicy::Independent => cells.iter().any(Option::is_some),
        };
        if keep {
            out.push_row(prices.dates()[t], cells);
        }
    }
    out
}
