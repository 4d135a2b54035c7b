//! Session state shared by every front-end.
//!
//! A `Session` owns the parameter store, the visibility toggles and the
//! memo cache. Derived data is always computed from the current values, so
//! mutating through [`Session::store_mut`] can never leave a stale table
//! behind: the next [`Session::dataset`] call sees a different key.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::curves::{CurveMemo, DerivedDataset, GenerationInput, MemoStats};
use crate::domain::{DEFAULT_GRID_POINTS, MAX_GRID_POINTS, Series, Toggle, ToggleSet};
use crate::error::{AppError, EXIT_INVALID_INPUT};
use crate::io::{ConfigSnapshot, import_into};
use crate::store::{ParameterStore, RolloverOutcome};

#[derive(Debug)]
pub struct Session {
    store: ParameterStore,
    toggles: ToggleSet,
    grid_points: usize,
    memo: CurveMemo,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Default parameters on the default grid.
    pub fn new() -> Self {
        Self {
            store: ParameterStore::new(),
            toggles: ToggleSet::default(),
            grid_points: DEFAULT_GRID_POINTS,
            memo: CurveMemo::new(),
        }
    }

    /// Use a different number of grid points (2 to `MAX_GRID_POINTS`).
    pub fn with_grid_points(mut self, points: usize) -> Result<Self, AppError> {
        if !(2..=MAX_GRID_POINTS).contains(&points) {
            return Err(AppError::new(
                EXIT_INVALID_INPUT,
                format!("Grid needs 2..={MAX_GRID_POINTS} points, got {points}."),
            ));
        }
        self.grid_points = points;
        Ok(self)
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParameterStore {
        &mut self.store
    }

    pub fn toggles(&self) -> &ToggleSet {
        &self.toggles
    }

    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) {
        self.toggles.set(toggle, on);
    }

    pub fn grid_points(&self) -> usize {
        self.grid_points
    }

    /// `(b1, b2)` as used by generation under the current bias mode.
    pub fn effective_biases(&self) -> (f64, f64) {
        self.store.params().effective_biases()
    }

    pub fn generation_input(&self) -> GenerationInput {
        GenerationInput::from_state(self.store.params(), &self.toggles, self.grid_points)
    }

    /// The dataset for the current state, reused while nothing changed.
    pub fn dataset(&mut self) -> Result<Arc<DerivedDataset>, AppError> {
        let input = self.generation_input();
        self.memo.dataset(&input)
    }

    /// Roots of one series in the current dataset.
    pub fn roots(&mut self, series: Series) -> Result<Arc<[f64]>, AppError> {
        let input = self.generation_input();
        self.memo.roots(&input, series)
    }

    pub fn roots_by_name(&mut self, name: &str) -> Result<Arc<[f64]>, AppError> {
        let series: Series = name.parse().map_err(|_| AppError::unknown_series(name))?;
        self.roots(series)
    }

    /// Validate and apply a raw config document. On error nothing changes.
    pub fn import(&mut self, raw: &Value) -> Result<[RolloverOutcome; 2], AppError> {
        let outcomes = import_into(&mut self.store, &mut self.toggles, raw)?;
        debug!(?outcomes, "config imported");
        Ok(outcomes)
    }

    /// Snapshot of the current parameters and toggles.
    pub fn export(&self) -> ConfigSnapshot {
        ConfigSnapshot::capture(self.store.params(), &self.toggles)
    }

    pub fn memo_stats(&self) -> MemoStats {
        self.memo.stats()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::CurveId;

    #[test]
    fn repeated_reads_reuse_the_dataset() {
        let mut s = Session::new();
        let a = s.dataset().unwrap();
        let b = s.dataset().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(s.memo_stats().dataset_misses, 1);
    }

    #[test]
    fn store_edits_invalidate_by_value() {
        let mut s = Session::new();
        let a = s.dataset().unwrap();
        s.store_mut().set_constant(CurveId::One, 2000.0);
        let b = s.dataset().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        // Setting it back gives an equal (not necessarily shared) table.
        s.store_mut().set_constant(CurveId::One, 1500.0);
        assert_eq!(*s.dataset().unwrap(), *a);
    }

    #[test]
    fn failed_import_leaves_state_untouched() {
        let mut s = Session::new();
        let before = s.export();
        assert!(s.import(&json!([1, 2, 3])).is_err());
        let after = s.export();
        assert_eq!(before.x0_1, after.x0_1);
        assert_eq!(s.store().params(), &crate::domain::ParameterSet::default());
    }

    #[test]
    fn import_then_export_round_trips_values() {
        let mut s = Session::new();
        s.import(&json!({ "x0_1": 6.5, "callContracts": "3", "showY11": true }))
            .unwrap();
        let snap = s.export();
        assert_eq!(snap.x0_1, 6.5);
        assert_eq!(snap.call_contracts, 3);
        assert!(snap.show_y11);
    }

    #[test]
    fn unknown_series_name_is_an_error() {
        let mut s = Session::new();
        let err = s.roots_by_name("nope").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_UNKNOWN_SERIES);
        assert!(s.roots_by_name("net_delta1").is_ok());
    }

    #[test]
    fn grid_size_is_checked() {
        assert!(Session::new().with_grid_points(1).is_err());
        let mut s = Session::new().with_grid_points(11).unwrap();
        assert_eq!(s.dataset().unwrap().len(), 11);
    }

    #[test]
    fn oversized_grid_is_rejected_before_generation() {
        let err = Session::new().with_grid_points(usize::MAX).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INVALID_INPUT);
        assert!(Session::new().with_grid_points(MAX_GRID_POINTS + 1).is_err());
        assert!(Session::new().with_grid_points(MAX_GRID_POINTS).is_ok());
    }
}
