//! Yahoo Finance chart API data adapter (`yahoo` feature).

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; equitydash/0.1)";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

pub struct YahooAdapter {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, DashboardError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, DashboardError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(StdDuration::from_secs(30))
            .build()
            .map_err(|e| DashboardError::DataSource {
                symbol: "*".to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Converts a chart API body into daily bars. Rows with a null close are
/// skipped; an `error` object or missing result is an empty result.
fn parse_chart(symbol: &str, body: &str) -> Result<Vec<OhlcvBar>, DashboardError> {
    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| DashboardError::DataSource {
            symbol: symbol.to_string(),
            reason: format!("failed to decode chart response: {e}"),
        })?;

    if let Some(err) = response.chart.error {
        debug!(symbol, code = %err.code, "chart API returned an error: {}", err.description);
        return Ok(Vec::new());
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let offset = Duration::seconds(result.meta.gmtoffset);

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let Some(utc) = DateTime::from_timestamp(*ts, 0) else {
            continue;
        };
        let date = (utc + offset).date_naive();
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten().unwrap_or(close);

        bars.push(OhlcvBar {
            symbol: symbol.to_string(),
            date,
            open: field(&quote.open),
            high: field(&quote.high),
            low: field(&quote.low),
            close,
            volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
        });
    }

    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    Ok(bars)
}

impl DataPort for YahooAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, DashboardError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let period1 = unix_seconds(start_date).to_string();
        let period2 = unix_seconds(end_date + Duration::days(1)).to_string();

        debug!(symbol, %url, "requesting chart data");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "history"),
            ])
            .send()
            .map_err(|e| DashboardError::DataSource {
                symbol: symbol.to_string(),
                reason: format!("request failed: {e}"),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| DashboardError::DataSource {
            symbol: symbol.to_string(),
            reason: format!("failed to read response body: {e}"),
        })?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(DashboardError::DataSource {
                symbol: symbol.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let bars = parse_chart(symbol, &body)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }
}
