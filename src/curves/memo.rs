//! Memoization of generation and root finding.
//!
//! Keys are built from the bit patterns of every input value, never from
//! identity, so a patch that leaves all values unchanged reuses the cached
//! table and any real change (including `0.0` vs `-0.0`) rebuilds it.
//! The cache holds the most recent dataset only; roots are cached per series
//! for that dataset and dropped with it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::curves::{DerivedDataset, GenerationInput, generate_input, series_roots};
use crate::domain::{BiasMode, CurveId, Series, Toggle};
use crate::error::AppError;

/// Value key over a complete [`GenerationInput`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputKey(Vec<u64>);

impl InputKey {
    pub fn of(input: &GenerationInput) -> Self {
        let p = &input.params;
        let mut k = Vec::with_capacity(32);
        for id in CurveId::BOTH {
            let c = p.curve(id);
            k.extend([
                c.threshold.to_bits(),
                c.constant.to_bits(),
                c.bias.to_bits(),
                c.bias_base.to_bits(),
                u64::from(c.auto_rollover),
                c.bias_add_option.to_bits(),
            ]);
        }
        k.extend([
            p.benchmark.anchor.to_bits(),
            p.benchmark.ref_const.to_bits(),
            u64::from(p.call.contracts),
            p.call.premium.to_bits(),
            u64::from(p.put.contracts),
            p.put.premium.to_bits(),
            p.long.entry_price.to_bits(),
            p.long.shares,
            p.short.entry_price.to_bits(),
            p.short.shares,
            p.delta1.to_bits(),
            p.delta2.to_bits(),
            u64::from(p.include_premium),
            match p.bias_mode {
                BiasMode::Real => 0,
                BiasMode::AddOption => 1,
            },
            p.x_range.lo().to_bits(),
            p.x_range.hi().to_bits(),
        ]);
        let toggle_mask = Toggle::ALL
            .iter()
            .enumerate()
            .filter(|(_, t)| input.toggles.is_on(**t))
            .fold(0u64, |m, (i, _)| m | (1 << i));
        k.extend([
            toggle_mask,
            input.effective_b1.to_bits(),
            input.effective_b2.to_bits(),
            input.grid_points as u64,
        ]);
        Self(k)
    }
}

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub dataset_hits: u64,
    pub dataset_misses: u64,
    pub root_hits: u64,
    pub root_misses: u64,
}

#[derive(Debug, Default)]
pub struct CurveMemo {
    current: Option<(InputKey, Arc<DerivedDataset>)>,
    roots: HashMap<Series, Arc<[f64]>>,
    stats: MemoStats,
}

impl CurveMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the dataset for `input`, generating it only if the key changed.
    pub fn dataset(&mut self, input: &GenerationInput) -> Result<Arc<DerivedDataset>, AppError> {
        let key = InputKey::of(input);
        if let Some((cached_key, dataset)) = &self.current {
            if *cached_key == key {
                self.stats.dataset_hits += 1;
                debug!("curve dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
        }

        self.stats.dataset_misses += 1;
        debug!("curve dataset cache miss; regenerating");
        let dataset = Arc::new(generate_input(input)?);
        self.roots.clear();
        self.current = Some((key, Arc::clone(&dataset)));
        Ok(dataset)
    }

    /// Roots of `series` in the dataset for `input`.
    pub fn roots(&mut self, input: &GenerationInput, series: Series) -> Result<Arc<[f64]>, AppError> {
        let dataset = self.dataset(input)?;
        if let Some(roots) = self.roots.get(&series) {
            self.stats.root_hits += 1;
            return Ok(Arc::clone(roots));
        }
        self.stats.root_misses += 1;
        let roots: Arc<[f64]> = series_roots(&dataset, series).into();
        self.roots.insert(series, Arc::clone(&roots));
        Ok(roots)
    }

    /// Drop everything cached.
    pub fn invalidate(&mut self) {
        self.current = None;
        self.roots.clear();
    }

    pub fn stats(&self) -> MemoStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterSet, ToggleSet};

    fn input() -> GenerationInput {
        GenerationInput::from_state(&ParameterSet::default(), &ToggleSet::default(), 101)
    }

    #[test]
    fn equal_values_hit_the_cache() {
        let mut memo = CurveMemo::new();
        let a = memo.dataset(&input()).unwrap();
        // A fresh but value-identical input must reuse the table.
        let b = memo.dataset(&input().clone()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(memo.stats().dataset_hits, 1);
        assert_eq!(memo.stats().dataset_misses, 1);
    }

    #[test]
    fn any_value_change_regenerates() {
        let mut memo = CurveMemo::new();
        let base = input();
        let a = memo.dataset(&base).unwrap();

        let mut changed = base.clone();
        changed.params.delta2 = 0.51;
        let b = memo.dataset(&changed).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        let mut toggled = base.clone();
        toggled.toggles.set(Toggle::Long, false);
        assert_ne!(InputKey::of(&toggled), InputKey::of(&base));

        let mut signed_zero = base.clone();
        signed_zero.effective_b1 = -0.0;
        assert_ne!(InputKey::of(&signed_zero), InputKey::of(&base));
    }

    #[test]
    fn roots_are_cached_per_dataset() {
        let mut memo = CurveMemo::new();
        let base = input();
        let r1 = memo.roots(&base, Series::NetDelta1).unwrap();
        let r2 = memo.roots(&base, Series::NetDelta1).unwrap();
        assert!(Arc::ptr_eq(&r1, &r2));
        assert_eq!(memo.stats().root_hits, 1);

        let mut changed = base.clone();
        changed.params.delta1 = 1.7;
        memo.roots(&changed, Series::NetDelta1).unwrap();
        assert_eq!(memo.stats().root_misses, 2);
    }

    #[test]
    fn invalidate_forces_regeneration() {
        let mut memo = CurveMemo::new();
        memo.dataset(&input()).unwrap();
        memo.invalidate();
        memo.dataset(&input()).unwrap();
        assert_eq!(memo.stats().dataset_misses, 2);
    }
}
