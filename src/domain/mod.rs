//! Core domain types and logic.

pub mod acquisition;
pub mod alignment;
pub mod annotation;
pub mod config_validation;
pub mod dashboard;
pub mod error;
pub mod histogram;
pub mod metrics;
pub mod ohlcv;
pub mod price_series;
pub mod registry;
pub mod table;
