//! Configuration validation.
//!
//! Validates all config fields before a dashboard run. Every key is optional;
//! only values that are present are checked.

use crate::domain::error::DashboardError;
use crate::domain::metrics::RowPolicy;
use crate::domain::registry::Registry;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const KNOWN_SOURCES: [&str; 2] = ["csv", "yahoo"];

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    validate_dates(config)?;
    validate_row_policy(config)?;
    validate_positive_int(config, "dashboard", "histogram_bins")?;
    validate_positive_int(config, "report", "table_rows")?;
    validate_source(config)?;
    validate_selection(config)?;
    Ok(())
}

/// Parses a `YYYY-MM-DD` value, reporting the section and key on failure.
pub fn parse_date(value: &str, section: &str, key: &str) -> Result<NaiveDate, DashboardError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        DashboardError::config_invalid(
            section,
            key,
            format!("invalid {key} format, expected YYYY-MM-DD"),
        )
    })
}

/// Splits a comma-separated instrument list. Names keep their case.
pub fn parse_names(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let start = config
        .get_string("dashboard", "start_date")
        .map(|s| parse_date(&s, "dashboard", "start_date"))
        .transpose()?;
    let end = config
        .get_string("dashboard", "end_date")
        .map(|s| parse_date(&s, "dashboard", "end_date"))
        .transpose()?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(DashboardError::config_invalid(
                "dashboard",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

fn validate_row_policy(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    if let Some(value) = config.get_string("dashboard", "row_policy") {
        value
            .parse::<RowPolicy>()
            .map_err(|reason| DashboardError::config_invalid("dashboard", "row_policy", reason))?;
    }
    Ok(())
}

fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), DashboardError> {
    if config.get_string(section, key).is_some() && config.get_int(section, key, 0) <= 0 {
        return Err(DashboardError::config_invalid(
            section,
            key,
            format!("{key} must be a positive integer"),
        ));
    }
    Ok(())
}

fn validate_source(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();
    if !KNOWN_SOURCES.contains(&source.as_str()) {
        return Err(DashboardError::config_invalid(
            "data",
            "source",
            format!("unknown source '{source}' (expected csv or yahoo)"),
        ));
    }
    if source == "csv" {
        match config.get_string("data", "data_dir") {
            Some(dir) if !dir.trim().is_empty() => {}
            Some(_) => {
                return Err(DashboardError::config_invalid(
                    "data",
                    "data_dir",
                    "data_dir must not be empty",
                ));
            }
            None => {}
        }
    }
    Ok(())
}

fn validate_selection(config: &dyn ConfigPort) -> Result<(), DashboardError> {
    let Some(selected) = config.get_string("dashboard", "selected") else {
        return Ok(());
    };
    let registry = Registry::from_config(config)?;
    for name in parse_names(&selected) {
        if registry.find(&name).is_none() {
            return Err(DashboardError::config_invalid(
                "dashboard",
                "selected",
                format!("unknown instrument '{name}'"),
            ));
        }
    }
    Ok(())
}
