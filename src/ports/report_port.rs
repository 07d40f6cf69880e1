//! Report generation port trait.

use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;

/// Port for rendering a dashboard run.
pub trait ReportPort {
    fn write(&self, dashboard: &Dashboard, output_path: &str) -> Result<(), DashboardError>;
}
