//! One dashboard run: fetch, select, align, derive.
//!
//! Every run recomputes all tables from scratch. `EmptySelection` stops the
//! run before alignment; missing instruments are carried as warnings.

use crate::domain::acquisition::{Acquisition, MissingInstrument, acquire};
use crate::domain::alignment::{align, resolve_selection};
use crate::domain::error::DashboardError;
use crate::domain::histogram::ReturnHistogram;
use crate::domain::metrics::{
    cumulative_returns, daily_returns, price_change, summary_statistics, RowPolicy,
    SummaryStatistics,
};
use crate::domain::registry::{EventMarker, Registry};
use crate::domain::table::DateTable;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::info;

pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid constant date")
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` selects every instrument with data.
    pub selection: Option<Vec<String>>,
    pub row_policy: RowPolicy,
    pub histogram_bins: usize,
}

impl DashboardParams {
    /// Defaults: from 2020-01-01 to `today`, all instruments, complete rows.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            start_date: default_start_date(),
            end_date: today,
            selection: None,
            row_policy: RowPolicy::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.start_date > self.end_date {
            return Err(DashboardError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub params: DashboardParams,
    pub selected: Vec<String>,
    pub events: Vec<EventMarker>,
    pub missing: Vec<MissingInstrument>,
    pub close_prices: DateTable,
    pub returns: DateTable,
    pub cumulative_returns: DateTable,
    pub price_change: DateTable,
    pub statistics: IndexMap<String, SummaryStatistics>,
    pub histogram: Option<ReturnHistogram>,
}

pub fn build_dashboard(
    data_port: &dyn DataPort,
    registry: &Registry,
    params: &DashboardParams,
) -> Result<Dashboard, DashboardError> {
    let acquisition = fetch_prices(data_port, registry, params)?;
    assemble_dashboard(acquisition, registry, params)
}

/// Validates the range and fetches every registry instrument.
pub fn fetch_prices(
    data_port: &dyn DataPort,
    registry: &Registry,
    params: &DashboardParams,
) -> Result<Acquisition, DashboardError> {
    params.validate()?;

    info!(
        start = %params.start_date,
        end = %params.end_date,
        instruments = registry.list_instruments().len(),
        "fetching prices"
    );
    Ok(acquire(
        data_port,
        registry.list_instruments(),
        params.start_date,
        params.end_date,
    ))
}

/// Selects, aligns and derives the tables from fetched prices.
pub fn assemble_dashboard(
    acquisition: Acquisition,
    registry: &Registry,
    params: &DashboardParams,
) -> Result<Dashboard, DashboardError> {
    let selected = resolve_selection(&acquisition.available(), params.selection.as_deref())?;
    info!(selected = ?selected, policy = params.row_policy.as_str(), "aligning prices");

    let close_prices = align(&acquisition.series, &selected)?;
    let returns = daily_returns(&close_prices, params.row_policy);
    let cumulative = cumulative_returns(&returns);
    let change = price_change(&close_prices, params.row_policy);

    // Statistics always use each instrument's own effective date range.
    let statistics = summary_statistics(&daily_returns(&close_prices, RowPolicy::Independent));
    let histogram = ReturnHistogram::build(&returns, params.histogram_bins);

    info!(
        rows = close_prices.len(),
        return_rows = returns.len(),
        "derived metrics computed"
    );

    Ok(Dashboard {
        params: params.clone(),
        selected,
        events: registry.list_events().to_vec(),
        missing: acquisition.missing,
        close_prices,
        returns,
        cumulative_returns: cumulative,
        price_change: change,
        statistics,
        histogram,
    })
}
