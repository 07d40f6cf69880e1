//! Event overlay for time-series charts.

use crate::domain::registry::EventMarker;
use crate::ports::chart_port::{Annotation, ChartPort};

/// Paper-y of the first label, just above the plot area.
pub const LABEL_BASE_Y: f64 = 1.05;
/// Vertical step between successive labels.
pub const LABEL_STEP: f64 = 0.05;

/// Paper-y for the label of the `index`-th event.
pub fn label_y(index: usize) -> f64 {
    LABEL_BASE_Y + LABEL_STEP * index as f64
}

/// Draws a marker and a label for each event, in the given order. Labels stack
/// upward so events on the same or nearby dates stay readable.
pub fn annotate(chart: &mut dyn ChartPort, events: &[EventMarker]) {
    for (i, event) in events.iter().enumerate() {
        chart.add_vline(event.date);
        chart.add_annotation(Annotation {
            date: event.date,
            y_paper: label_y(i),
            text: event.label.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct RecordingChart {
        vlines: Vec<NaiveDate>,
        annotations: Vec<Annotation>,
    }

    impl ChartPort for RecordingChart {
        fn add_vline(&mut self, date: NaiveDate) {
            self.vlines.push(date);
        }

        fn add_annotation(&mut self, annotation: Annotation) {
            self.annotations.push(annotation);
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn labels_stack_in_registry_order() {
        let events = vec![
            EventMarker::new("late", date(2025, 4, 2)),
            EventMarker::new("early", date(2025, 2, 9)),
            EventMarker::new("middle", date(2025, 3, 12)),
        ];
        let mut chart = RecordingChart::default();
        annotate(&mut chart, &events);

        assert_eq!(
            chart.vlines,
            vec![date(2025, 4, 2), date(2025, 2, 9), date(2025, 3, 12)]
        );
        let texts: Vec<&str> = chart.annotations.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts, vec!["late", "early", "middle"]);
        assert_abs_diff_eq!(chart.annotations[0].y_paper, 1.05, epsilon = 1e-12);
        assert_abs_diff_eq!(chart.annotations[1].y_paper, 1.10, epsilon = 1e-12);
        assert_abs_diff_eq!(chart.annotations[2].y_paper, 1.15, epsilon = 1e-12);
    }

    #[test]
    fn same_date_events_get_distinct_offsets() {
        let same = date(2025, 3, 12);
        let events = vec![EventMarker::new("first", same), EventMarker::new("second", same)];
        let mut chart = RecordingChart::default();
        annotate(&mut chart, &events);

        assert_eq!(chart.vlines, vec![same, same]);
        let offsets: Vec<f64> = chart
            .annotations
            .iter()
            .map(|a| a.y_paper - LABEL_BASE_Y)
            .collect();
        assert_abs_diff_eq!(offsets[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(offsets[1], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn offsets_restart_on_every_call() {
        let events = vec![EventMarker::new("only", date(2025, 1, 1))];
        let mut first = RecordingChart::default();
        let mut second = RecordingChart::default();
        annotate(&mut first, &events);
        annotate(&mut second, &events);
        assert_eq!(first.annotations, second.annotations);
    }

    #[test]
    fn no_events_draws_nothing() {
        let mut chart = RecordingChart::default();
        annotate(&mut chart, &[]);
        assert!(chart.vlines.is_empty());
        assert!(chart.annotations.is_empty());
    }
}
