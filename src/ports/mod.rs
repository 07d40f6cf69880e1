//! Port traits: the capabilities the domain needs from the outside world.

pub mod chart_port;
pub mod config_port;
pub mod data_port;
pub mod report_port;
