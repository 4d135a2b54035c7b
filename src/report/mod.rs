//! Reporting: per-series statistics and formatted terminal output.

mod format;

pub use format::*;

use crate::curves::DerivedDataset;
use crate::domain::{BiasMode, Series, ToggleSet, XRange};

/// Statistics for one dataset column.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub series: Series,
    pub defined: usize,
    pub range: Option<(f64, f64)>,
    pub roots: Vec<f64>,
}

/// Everything `pcurves generate` prints.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub bias_mode: BiasMode,
    pub effective_b1: f64,
    pub effective_b2: f64,
    pub x_range: XRange,
    pub points: usize,
    pub rows: Vec<SeriesSummary>,
}

/// Summarize the visible series of `dataset`. `roots` supplies the zero
/// crossings for a series (usually through the memo cache).
pub fn summarize_series<F>(
    dataset: &DerivedDataset,
    toggles: &ToggleSet,
    mut roots: F,
) -> Vec<SeriesSummary>
where
    F: FnMut(Series) -> Vec<f64>,
{
    Series::ALL
        .into_iter()
        .filter(|s| toggles.is_on(s.toggle()))
        .map(|series| SeriesSummary {
            series,
            defined: dataset.defined_count(series),
            range: dataset.value_range(series),
            roots: roots(series),
        })
        .collect()
}
