//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for equitydash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no instruments selected")]
    EmptySelection,

    #[error("no data for instrument {name}")]
    NoDataForInstrument { name: String },

    #[error("invalid price series for {name}: {reason}")]
    InvalidSeries { name: String, reason: String },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("data source error for {symbol}: {reason}")]
    DataSource { symbol: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        DashboardError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigInvalid { .. }
            | DashboardError::InvalidDateRange { .. } => 2,
            DashboardError::DataSource { .. } | DashboardError::InvalidSeries { .. } => 3,
            DashboardError::EmptySelection | DashboardError::NoDataForInstrument { .. } => 4,
            DashboardError::Report { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
