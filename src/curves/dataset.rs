//! The derived dataset: one row per grid point, one column per [`Series`].

use crate::domain::Series;
use crate::error::AppError;
use crate::math::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedDataset {
    x: Vec<f64>,
    /// Indexed by [`Series::index`]; every column has `x.len()` cells.
    columns: Vec<Vec<Value>>,
}

impl DerivedDataset {
    pub(crate) fn new(x: Vec<f64>, columns: Vec<Vec<Value>>) -> Self {
        debug_assert_eq!(columns.len(), Series::ALL.len());
        debug_assert!(columns.iter().all(|c| c.len() == x.len()));
        Self { x, columns }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn column(&self, series: Series) -> &[Value] {
        &self.columns[series.index()]
    }

    /// Look a column up by its string name.
    pub fn column_by_name(&self, name: &str) -> Result<&[Value], AppError> {
        let series: Series = name.parse().map_err(|_| AppError::unknown_series(name))?;
        Ok(self.column(series))
    }

    /// `(x, value)` pairs for one series.
    pub fn points(&self, series: Series) -> impl Iterator<Item = (f64, Value)> + '_ {
        self.x.iter().copied().zip(self.column(series).iter().copied())
    }

    /// Number of defined cells in a column.
    pub fn defined_count(&self, series: Series) -> usize {
        self.column(series).iter().filter(|v| v.is_some()).count()
    }

    /// Min and max over the defined cells, if any.
    pub fn value_range(&self, series: Series) -> Option<(f64, f64)> {
        self.column(series).iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> DerivedDataset {
        let x = vec![1.0, 2.0, 3.0];
        let mut columns = vec![vec![None; 3]; Series::ALL.len()];
        columns[Series::NetDelta1.index()] = vec![Some(4.0), None, Some(-2.0)];
        DerivedDataset::new(x, columns)
    }

    #[test]
    fn column_lookup_by_name() {
        let d = tiny();
        assert_eq!(d.column_by_name("net_delta1").unwrap(), &[Some(4.0), None, Some(-2.0)]);
        let err = d.column_by_name("net_delta3").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_UNKNOWN_SERIES);
    }

    #[test]
    fn stats_skip_undefined_cells() {
        let d = tiny();
        assert_eq!(d.defined_count(Series::NetDelta1), 2);
        assert_eq!(d.value_range(Series::NetDelta1), Some((-2.0, 4.0)));
        assert_eq!(d.value_range(Series::LongPl), None);
    }
}
