//! Inline SVG charts for the HTML report.
//!
//! `SvgChart` is the `ChartPort` implementation: the annotation layer adds
//! event markers to it, then one of the render methods draws the series and
//! the overlay on a date x-axis.

use super::escape_html;
use crate::domain::annotation::annotate;
use crate::domain::histogram::ReturnHistogram;
use crate::domain::registry::EventMarker;
use crate::domain::table::DateTable;
use crate::ports::chart_port::{Annotation, ChartPort};
use chrono::NaiveDate;
use std::fmt::Write;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 420.0;
const LEFT: f64 = 70.0;
const RIGHT: f64 = 30.0;
/// Room above the plot area for stacked event labels.
const PLOT_TOP: f64 = 90.0;
const PLOT_BOTTOM: f64 = 350.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

/// Plotly's default qualitative palette.
pub const PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub fn series_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

pub fn format_number(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn plot_width() -> f64 {
    WIDTH - LEFT - RIGHT
}

fn plot_height() -> f64 {
    PLOT_BOTTOM - PLOT_TOP
}

fn svg_header() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="100%"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#444}}</style>"#
    )
}

fn wrap_plot(title: &str, body: &str) -> String {
    format!(
        r#"<div class="plot"><div class="plot-title">{}</div>{}</div>"#,
        escape_html(title),
        body
    )
}

/// Placeholder block for a chart with nothing to draw.
pub fn empty_chart(title: &str) -> String {
    wrap_plot(title, r#"<p class="empty">No data available.</p>"#)
}

/// Finite min/max of `values`, widened when flat.
fn extent<I: IntoIterator<Item = f64>>(values: I, include_zero: bool) -> Option<(f64, f64)> {
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.into_iter().filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if include_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if min == max {
        let adjust = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
        min -= adjust;
        max += adjust;
    }
    Some((min, max))
}

fn scale_y(value: f64, (min, max): (f64, f64)) -> f64 {
    PLOT_BOTTOM - (value - min) / (max - min) * plot_height()
}

fn paper_y(y_paper: f64) -> f64 {
    (PLOT_BOTTOM - y_paper * plot_height()).max(12.0)
}

fn draw_y_axis(svg: &mut String, range: (f64, f64), format: fn(f64) -> String) {
    let (min, max) = range;
    for i in 0..=Y_TICKS {
        let value = min + (max - min) * i as f64 / Y_TICKS as f64;
        let y = scale_y(value, range);
        let _ = write!(
            svg,
            r##"<line x1="{LEFT:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#e5e5e5" stroke-width="0.5" /><text x="{tx:.2}" y="{ty:.2}" text-anchor="end">{label}</text>"##,
            x2 = WIDTH - RIGHT,
            tx = LEFT - 6.0,
            ty = y + 3.0,
            label = format(value),
        );
    }
    let _ = write!(
        svg,
        r##"<line x1="{LEFT:.2}" y1="{PLOT_BOTTOM:.2}" x2="{x2:.2}" y2="{PLOT_BOTTOM:.2}" stroke="#000" stroke-width="1" />"##,
        x2 = WIDTH - RIGHT,
    );
}

fn draw_zero_line(svg: &mut String, range: (f64, f64)) {
    if range.0 < 0.0 && range.1 > 0.0 {
        let y = scale_y(0.0, range);
        let _ = write!(
            svg,
            r##"<line x1="{LEFT:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#999" stroke-width="1" />"##,
            x2 = WIDTH - RIGHT,
        );
    }
}

fn draw_legend(svg: &mut String, names: &[String]) {
    let y = HEIGHT - 18.0;
    let mut x = LEFT;
    for (i, name) in names.iter().enumerate() {
        let _ = write!(
            svg,
            r##"<rect x="{x:.2}" y="{ry:.2}" width="14" height="8" fill="{color}" /><text x="{tx:.2}" y="{y:.2}" text-anchor="start">{label}</text>"##,
            ry = y - 8.0,
            color = series_color(i),
            tx = x + 18.0,
            label = escape_html(name),
        );
        x += 30.0 + name.chars().count() as f64 * 6.0;
    }
}

/// A date-axis chart that collects event overlays before rendering.
pub struct SvgChart {
    title: String,
    start: NaiveDate,
    end: NaiveDate,
    vlines: Vec<NaiveDate>,
    annotations: Vec<Annotation>,
}

impl ChartPort for SvgChart {
    fn add_vline(&mut self, date: NaiveDate) {
        self.vlines.push(date);
    }

    fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }
}

impl SvgChart {
    pub fn new(title: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            start,
            end,
            vlines: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Chart spanning the table's dates with `events` already annotated.
    /// `None` for an empty table.
    pub fn for_table(title: &str, table: &DateTable, events: &[EventMarker]) -> Option<Self> {
        let start = *table.dates().first()?;
        let end = *table.dates().last()?;
        let mut chart = Self::new(title, start, end);
        annotate(&mut chart, events);
        Some(chart)
    }

    fn in_range(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    fn x_of(&self, date: NaiveDate) -> f64 {
        let span = (self.end - self.start).num_days();
        if span <= 0 {
            return LEFT + plot_width() / 2.0;
        }
        let offset = (date - self.start).num_days() as f64;
        LEFT + offset / span as f64 * plot_width()
    }

    fn draw_x_axis(&self, svg: &mut String) {
        let span = (self.end - self.start).num_days();
        let ticks = if span <= 0 { 0 } else { X_TICKS };
        for i in 0..=ticks {
            let date = self.start + chrono::Duration::days(span * i as i64 / X_TICKS as i64);
            let x = self.x_of(date);
            let _ = write!(
                svg,
                r##"<line x1="{x:.2}" y1="{PLOT_BOTTOM:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#ccc" stroke-width="1" /><text x="{x:.2}" y="{ty:.2}" text-anchor="middle">{label}</text>"##,
                y2 = PLOT_BOTTOM + 4.0,
                ty = PLOT_BOTTOM + 16.0,
                label = date.format("%Y-%m-%d"),
            );
        }
    }

    /// Event markers and labels inside the x-range.
    fn draw_overlay(&self, svg: &mut String) {
        for date in self.vlines.iter().filter(|d| self.in_range(**d)) {
            let x = self.x_of(*date);
            let _ = write!(
                svg,
                r##"<line class="event" x1="{x:.2}" y1="{PLOT_TOP:.2}" x2="{x:.2}" y2="{PLOT_BOTTOM:.2}" stroke="#555" stroke-width="1" stroke-dasharray="4 3" />"##
            );
        }
        for annotation in self.annotations.iter().filter(|a| self.in_range(a.date)) {
            let _ = write!(
                svg,
                r##"<text class="event-label" x="{x:.2}" y="{y:.2}" text-anchor="middle" fill="#222">{text}</text>"##,
                x = self.x_of(annotation.date),
                y = paper_y(annotation.y_paper),
                text = escape_html(&annotation.text),
            );
        }
    }

    /// One line per column. Missing cells break the line; isolated points
    /// are drawn as dots.
    pub fn render_lines(&self, table: &DateTable, format: fn(f64) -> String) -> String {
        let values = table.rows().flat_map(|(_, cells)| cells.iter().flatten().copied());
        let Some(range) = extent(values, false) else {
            return empty_chart(&self.title);
        };

        let mut svg = svg_header();
        draw_y_axis(&mut svg, range, format);
        draw_zero_line(&mut svg, range);
        self.draw_x_axis(&mut svg);

        for (col, _) in table.columns().iter().enumerate() {
            let color = series_color(col);
            let mut segment: Vec<(f64, f64)> = Vec::new();
            for (date, cells) in table.rows() {
                match cells[col].filter(|v| v.is_finite()) {
                    Some(v) => segment.push((self.x_of(date), scale_y(v, range))),
                    None => flush_segment(&mut svg, &mut segment, color),
                }
            }
            flush_segment(&mut svg, &mut segment, color);
        }

        self.draw_overlay(&mut svg);
        draw_legend(&mut svg, table.columns());
        svg.push_str("</svg>");
        wrap_plot(&self.title, &svg)
    }

    /// Bars grouped by date, one bar per column.
    pub fn render_grouped_bars(&self, table: &DateTable, format: fn(f64) -> String) -> String {
        let values = table.rows().flat_map(|(_, cells)| cells.iter().flatten().copied());
        let Some(range) = extent(values, true) else {
            return empty_chart(&self.title);
        };

        let mut svg = svg_header();
        draw_y_axis(&mut svg, range, format);
        self.draw_x_axis(&mut svg);

        let columns = table.columns().len().max(1);
        let group_width = (plot_width() / table.len().max(1) as f64 * 0.8).max(1.0);
        let bar_width = group_width / columns as f64;
        let zero = scale_y(0.0, range);

        for (date, cells) in table.rows() {
            let group_left = self.x_of(date) - group_width / 2.0;
            for (col, cell) in cells.iter().enumerate() {
                let Some(v) = cell.filter(|v| v.is_finite()) else {
                    continue;
                };
                let y = scale_y(v, range);
                let (top, bottom) = if y < zero { (y, zero) } else { (zero, y) };
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.2}" y="{top:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" />"#,
                    x = group_left + bar_width * col as f64,
                    w = bar_width,
                    h = bottom - top,
                    color = series_color(col),
                );
            }
        }

        draw_zero_line(&mut svg, range);
        self.draw_overlay(&mut svg);
        draw_legend(&mut svg, table.columns());
        svg.push_str("</svg>");
        wrap_plot(&self.title, &svg)
    }
}

fn flush_segment(svg: &mut String, segment: &mut Vec<(f64, f64)>, color: &str) {
    match segment.len() {
        0 => {}
        1 => {
            let (x, y) = segment[0];
            let _ = write!(
                svg,
                r#"<circle cx="{x:.2}" cy="{y:.2}" r="2" fill="{color}" />"#
            );
        }
        _ => {
            let coords: Vec<String> = segment
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect();
            let _ = write!(
                svg,
                r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{}" />"#,
                coords.join(" ")
            );
        }
    }
    segment.clear();
}

/// Overlaid per-instrument histograms sharing the same bins.
pub fn render_histogram(title: &str, histogram: Option<&ReturnHistogram>) -> String {
    let Some(histogram) = histogram.filter(|h| h.bins() > 0 && h.max_count() > 0) else {
        return empty_chart(title);
    };
    let edges = &histogram.edges;
    let (lo, hi) = (edges[0], edges[edges.len() - 1]);
    let y_range = (0.0, histogram.max_count() as f64);
    let x_of = |v: f64| LEFT + (v - lo) / (hi - lo) * plot_width();

    let mut svg = svg_header();
    draw_y_axis(&mut svg, y_range, |v| format!("{v:.0}"));

    for i in 0..=X_TICKS {
        let value = lo + (hi - lo) * i as f64 / X_TICKS as f64;
        let _ = write!(
            svg,
            r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
            x = x_of(value),
            y = PLOT_BOTTOM + 16.0,
            label = format_percent(value),
        );
    }

    for (series, counts) in histogram.counts.values().enumerate() {
        for (bin, count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
            let left = x_of(edges[bin]);
            let top = scale_y(*count as f64, y_range);
            let _ = write!(
                svg,
                r#"<rect x="{left:.2}" y="{top:.2}" width="{w:.2}" height="{h:.2}" fill="{color}" fill-opacity="0.5" />"#,
                w = (x_of(edges[bin + 1]) - left).max(0.5),
                h = PLOT_BOTTOM - top,
                color = series_color(series),
            );
        }
    }

    let names: Vec<String> = histogram.counts.keys().cloned().collect();
    draw_legend(&mut svg, &names);
    svg.push_str("</svg>");
    wrap_plot(title, &svg)
}
