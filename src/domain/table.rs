//! Date-indexed table of per-instrument values.
//!
//! Rows are ascending trading dates, columns are instrument names in selection
//! order. A cell is `None` when the instrument has no value for that date;
//! missing is never represented as zero.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct DateTable {
    columns: Vec<String>,
    dates: Vec<NaiveDate>,
    rows: Vec<Vec<Option<f64>>>,
}

impl DateTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            dates: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Callers push in ascending date order with one cell per
    /// column.
    pub fn push_row(&mut self, date: NaiveDate, cells: Vec<Option<f64>>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        debug_assert!(self.dates.last().is_none_or(|last| *last < date));
        self.dates.push(date);
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn row(&self, index: usize) -> &[Option<f64>] {
        &self.rows[index]
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &[Option<f64>])> {
        self.dates
            .iter()
            .copied()
            .zip(self.rows.iter().map(|r| r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, date: NaiveDate, column: &str) -> Option<f64> {
        let col = self.column_index(column)?;
        let row = self.dates.binary_search(&date).ok()?;
        self.rows[row][col]
    }

    /// The non-missing `(date, value)` pairs of one column, in date order.
    pub fn column_values(&self, name: &str) -> Vec<(NaiveDate, f64)> {
        let Some(col) = self.column_index(name) else {
            return Vec::new();
        };
        self.rows()
            .filter_map(|(date, cells)| cells[col].map(|v| (date, v)))
            .collect()
    }

    pub fn last_value(&self, name: &str) -> Option<(NaiveDate, f64)> {
        self.column_values(name).last().copied()
    }

    /// The last `n` rows, used for the table previews.
    pub fn tail(&self, n: usize) -> DateTable {
        let start = self.len().saturating_sub(n);
        DateTable {
            columns: self.columns.clone(),
            dates: self.dates[start..].to_vec(),
            rows: self.rows[start..].to_vec(),
        }
    }
}
