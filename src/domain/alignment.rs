//! Selection and date alignment of per-instrument close prices.

use crate::domain::error::DashboardError;
use crate::domain::price_series::PriceSeries;
use crate::domain::table::DateTable;
use chrono::NaiveDate;
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Resolves the instruments to display.
///
/// `None` selects every available instrument. Requested names without data
/// are dropped; an empty result is an [`DashboardError::EmptySelection`].
pub fn resolve_selection(
    available: &[String],
    requested: Option<&[String]>,
) -> Result<Vec<String>, DashboardError> {
    let selected: Vec<String> = match requested {
        None => available.to_vec(),
        Some(names) => {
            let mut selected = Vec::new();
            for name in names {
                if !available.contains(name) {
                    warn!(instrument = %name, "selected instrument has no data, ignoring");
                    continue;
                }
                if !selected.contains(name) {
                    selected.push(name.clone());
                }
            }
            selected
        }
    };

    if selected.is_empty() {
        return Err(DashboardError::EmptySelection);
    }
    Ok(selected)
}

/// Outer-joins the selected series on date.
///
/// Columns follow `selected_names` order; dates are the union of all selected
/// series. Cells without a quote stay `None`.
pub fn align(
    series_by_name: &IndexMap<String, PriceSeries>,
    selected_names: &[String],
) -> Result<DateTable, DashboardError> {
    if selected_names.is_empty() {
        return Err(DashboardError::EmptySelection);
    }

    let mut selected = Vec::with_capacity(selected_names.len());
    for name in selected_names {
        match series_by_name.get(name) {
            Some(series) if !series.is_empty() => selected.push(series),
            _ => {
                return Err(DashboardError::NoDataForInstrument { name: name.clone() });
            }
        }
    }

    let timeline: BTreeSet<NaiveDate> = selected
        .iter()
        .flat_map(|series| series.points().iter().map(|(date, _)| *date))
        .collect();

    let lookups: Vec<HashMap<NaiveDate, f64>> = selected
        .iter()
        .map(|series| series.points().iter().copied().collect())
        .collect();

    let mut table = DateTable::new(selected_names.to_vec());
    for date in timeline {
        let cells = lookups.iter().map(|prices| prices.get(&date).copied()).collect();
        table.push_row(date, cells);
    }
    Ok(table)
}
