//! Chart capability used by the event annotation layer.

use chrono::NaiveDate;

/// A text label placed at a date on the x axis and at a vertical position in
/// paper coordinates (0.0 = bottom of the plot area, 1.0 = top).
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub date: NaiveDate,
    pub y_paper: f64,
    pub text: String,
}

pub trait ChartPort {
    /// Draw a dashed vertical marker spanning the plot at `date`.
    fn add_vline(&mut self, date: NaiveDate);

    fn add_annotation(&mut self, annotation: Annotation);
}
