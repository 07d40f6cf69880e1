//! Distribution of daily returns for the overlaid histogram chart.

use super::table::DateTable;
use indexmap::IndexMap;

pub const MIN_BINS: usize = 5;
pub const MAX_BINS: usize = 100;

/// Bin counts per instrument over edges shared by every instrument, so the
/// series can be overlaid on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnHistogram {
    pub edges: Vec<f64>,
    pub counts: IndexMap<String, Vec<usize>>,
}

impl ReturnHistogram {
    pub fn build(returns: &DateTable, bins: usize) -> Option<Self> {
        let bins = bins.clamp(MIN_BINS, MAX_BINS);

        let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
        for (_, cells) in returns.rows() {
            for v in cells.iter().flatten().filter(|v| v.is_finite()) {
                min = min.min(*v);
                max = max.max(*v);
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        if min == max {
            min -= 0.005;
            max += 0.005;
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let counts = returns
            .columns()
            .iter()
            .map(|name| {
                let mut counts = vec![0usize; bins];
                for (_, v) in returns.column_values(name) {
                    if !v.is_finite() {
                        continue;
                    }
                    let idx = (((v - min) / width).floor() as usize).min(bins - 1);
                    counts[idx] += 1;
                }
                (name.clone(), counts)
            })
            .collect();

        Some(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn max_count(&self) -> usize {
        self.counts
            .values()
            .flat_map(|c| c.iter().copied())
            .max()
            .unwrap_or(0)
    }
}
