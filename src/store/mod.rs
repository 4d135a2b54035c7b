//! The canonical parameter state and its setters.
//!
//! Every setter clamps into the range table, applies the cross-field rules,
//! and re-runs the rollover synchronizer before returning when a driver
//! changed. Callers holding `&ParameterStore` therefore never see a bias that
//! lags behind its drivers.
//!
//! Cross-field rules:
//! - `x0_1` drags the long entry price along; `x0_2` drags the short one.
//! - A manual bias edit with auto-rollover off also redefines the baseline.
//! - Enabling auto-rollover captures the current bias as the baseline.

pub mod rollover;

use tracing::{debug, warn};

use crate::domain::{
    BiasMode, CurveId, LegKind, ParamRange, ParameterSet, Side, XRange, ranges,
};

pub use rollover::{RolloverOutcome, rollover_bias, synchronize};

/// Owner of the validated parameter state.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    params: ParameterSet,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::from_params(ParameterSet::default())
    }

    /// Build a store from an already range-checked state.
    pub fn from_params(params: ParameterSet) -> Self {
        debug_assert!(params.is_within_ranges());
        let mut store = Self { params };
        store.resync();
        store
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Swap in a complete new state in one step, then synchronize.
    pub(crate) fn replace(&mut self, next: ParameterSet) -> [RolloverOutcome; 2] {
        debug_assert!(next.is_within_ranges());
        self.params = next;
        self.resync()
    }

    /// Re-run the rollover synchronizer.
    pub fn resync(&mut self) -> [RolloverOutcome; 2] {
        synchronize(&mut self.params)
    }

    // --- curves -------------------------------------------------------------

    /// Set `x0_1` / `x0_2`. The matching position's entry price follows.
    pub fn set_threshold(&mut self, id: CurveId, v: f64) {
        let Some(v) = accept("threshold", v, ranges::THRESHOLD) else {
            return;
        };
        self.params.curve_mut(id).threshold = v;
        let side = match id {
            CurveId::One => Side::Long,
            CurveId::Two => Side::Short,
        };
        self.params.position_mut(side).entry_price = ranges::ENTRY_PRICE.clamp(v);
        self.resync();
    }

    pub fn set_constant(&mut self, id: CurveId, v: f64) {
        let Some(v) = accept("constant", v, ranges::CONSTANT) else {
            return;
        };
        self.params.curve_mut(id).constant = v;
        self.resync();
    }

    /// Set the `real` bias. With auto-rollover off this is a manual edit and
    /// also becomes the new baseline.
    ///
    /// With auto-rollover on the value is stored as-is but is only transient:
    /// the next change to a rollover driver recomputes it from the baseline.
    pub fn set_bias(&mut self, id: CurveId, v: f64) {
        let Some(v) = accept("bias", v, ranges::BIAS) else {
            return;
        };
        let curve = self.params.curve_mut(id);
        curve.bias = v;
        if curve.auto_rollover {
            debug!(
                curve = ?id,
                bias = v,
                "manual bias on a rollover curve; next resync replaces it"
            );
        } else {
            curve.bias_base = v;
        }
    }

    pub fn set_bias_base(&mut self, id: CurveId, v: f64) {
        let Some(v) = accept("bias_base", v, ranges::BIAS) else {
            return;
        };
        self.params.curve_mut(id).bias_base = v;
        self.resync();
    }

    /// Enabling captures the current bias as the baseline first; disabling
    /// leaves the bias where the last rollover put it.
    pub fn set_auto_rollover(&mut self, id: CurveId, on: bool) {
        let curve = self.params.curve_mut(id);
        if on && !curve.auto_rollover {
            curve.bias_base = curve.bias;
        }
        curve.auto_rollover = on;
        self.resync();
    }

    pub fn set_bias_add_option(&mut self, id: CurveId, v: f64) {
        if let Some(v) = accept("bias_add_option", v, ranges::BIAS) {
            self.params.curve_mut(id).bias_add_option = v;
        }
    }

    // --- benchmark ----------------------------------------------------------

    pub fn set_anchor(&mut self, v: f64) {
        if let Some(v) = accept("anchor", v, ranges::ANCHOR) {
            self.params.benchmark.anchor = v;
        }
    }

    pub fn set_ref_const(&mut self, v: f64) {
        let Some(v) = accept("ref_const", v, ranges::CONSTANT) else {
            return;
        };
        self.params.benchmark.ref_const = v;
        self.resync();
    }

    // --- option legs and positions ------------------------------------------

    /// Contract counts are rounded to the nearest integer before clamping.
    pub fn set_contracts(&mut self, leg: LegKind, v: f64) {
        if let Some(v) = accept("contracts", v.round(), ranges::CONTRACTS) {
            self.params.leg_mut(leg).contracts = v as u32;
        }
    }

    pub fn set_premium(&mut self, leg: LegKind, v: f64) {
        if let Some(v) = accept("premium", v, ranges::PREMIUM) {
            self.params.leg_mut(leg).premium = v;
        }
    }

    pub fn set_entry_price(&mut self, side: Side, v: f64) {
        if let Some(v) = accept("entry_price", v, ranges::ENTRY_PRICE) {
            self.params.position_mut(side).entry_price = v;
        }
    }

    /// Share counts are rounded to the nearest integer before clamping.
    pub fn set_shares(&mut self, side: Side, v: f64) {
        if let Some(v) = accept("shares", v.round(), ranges::SHARES) {
            self.params.position_mut(side).shares = v as u64;
        }
    }

    // --- global -------------------------------------------------------------

    pub fn set_delta1(&mut self, v: f64) {
        if let Some(v) = accept("delta1", v, ranges::DELTA) {
            self.params.delta1 = v;
        }
    }

    pub fn set_delta2(&mut self, v: f64) {
        if let Some(v) = accept("delta2", v, ranges::DELTA) {
            self.params.delta2 = v;
        }
    }

    pub fn set_include_premium(&mut self, on: bool) {
        self.params.include_premium = on;
    }

    pub fn set_bias_mode(&mut self, mode: BiasMode) {
        self.params.bias_mode = mode;
    }

    /// Set the chart x-range. Endpoints are clamped, reordered, and widened to
    /// the minimum span.
    pub fn set_x_range(&mut self, a: f64, b: f64) {
        if !(a.is_finite() && b.is_finite()) {
            warn!(lo = a, hi = b, "ignoring non-finite x-range");
            return;
        }
        self.params.x_range = XRange::normalized(a, b);
    }
}

/// Clamp a finite setter input; non-finite input is dropped with a warning.
fn accept(field: &str, v: f64, range: ParamRange) -> Option<f64> {
    if !v.is_finite() {
        warn!(field, value = v, "ignoring non-finite input");
        return None;
    }
    Some(range.clamp(v))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn setters_clamp_out_of_range_input() {
        let mut s = ParameterStore::new();
        s.set_threshold(CurveId::One, 120.0);
        s.set_constant(CurveId::Two, 5.0);
        s.set_delta1(9.0);
        s.set_premium(LegKind::Put, -4.0);
        s.set_shares(Side::Short, 2e9);
        let p = s.params();
        assert_eq!(p.curve1.threshold, 50.0);
        assert_eq!(p.curve2.constant, 100.0);
        assert_eq!(p.delta1, 2.0);
        assert_eq!(p.put.premium, 0.0);
        assert_eq!(p.short.shares, 10_000_000);
        assert!(p.is_within_ranges());
    }

    #[test]
    fn non_finite_input_keeps_current_value() {
        let mut s = ParameterStore::new();
        let before = s.params().clone();
        s.set_threshold(CurveId::One, f64::NAN);
        s.set_bias(CurveId::Two, f64::INFINITY);
        s.set_x_range(f64::NAN, 3.0);
        assert_eq!(s.params(), &before);
    }

    #[test]
    fn integer_fields_are_rounded() {
        let mut s = ParameterStore::new();
        s.set_contracts(LegKind::Call, 2.6);
        s.set_shares(Side::Long, 99.4);
        assert_eq!(s.params().call.contracts, 3);
        assert_eq!(s.params().long.shares, 99);
    }

    #[test]
    fn thresholds_drag_entry_prices() {
        let mut s = ParameterStore::new();
        s.set_threshold(CurveId::One, 12.5);
        s.set_threshold(CurveId::Two, 3.25);
        assert_eq!(s.params().long.entry_price, 12.5);
        assert_eq!(s.params().short.entry_price, 3.25);

        // Entry prices can still be moved on their own.
        s.set_entry_price(Side::Long, 11.0);
        assert_eq!(s.params().long.entry_price, 11.0);
        assert_eq!(s.params().curve1.threshold, 12.5);
    }

    #[test]
    fn manual_bias_redefines_baseline_only_when_rollover_off() {
        let mut s = ParameterStore::new();
        s.set_bias(CurveId::One, 250.0);
        assert_eq!(s.params().curve1.bias_base, 250.0);

        s.set_auto_rollover(CurveId::One, true);
        s.set_bias(CurveId::One, -40.0);
        assert_eq!(s.params().curve1.bias, -40.0);
        assert_eq!(s.params().curve1.bias_base, 250.0);
    }

    #[test]
    fn manual_bias_on_rollover_curve_is_replaced_by_next_resync() {
        let mut s = ParameterStore::new();
        s.set_auto_rollover(CurveId::One, true);
        s.set_bias(CurveId::One, 99.0);
        assert_eq!(s.params().curve1.bias, 99.0);

        // Any driver change recomputes from the untouched baseline.
        s.set_constant(CurveId::One, 1_000.0);
        assert_relative_eq!(s.params().curve1.bias, 500.0 * (10.0f64 / 7.0).ln(), epsilon = 1e-9);
        assert_eq!(s.params().curve1.bias_base, 0.0);
    }

    #[test]
    fn enabling_rollover_captures_bias_then_recomputes() {
        let mut s = ParameterStore::new();
        s.set_constant(CurveId::One, 1_000.0);
        s.set_bias(CurveId::One, 30.0);
        s.set_auto_rollover(CurveId::One, true);

        let p = s.params();
        assert_eq!(p.curve1.bias_base, 30.0);
        assert_relative_eq!(p.curve1.bias, 30.0 + 500.0 * (10.0f64 / 7.0).ln(), epsilon = 1e-9);
    }

    #[test]
    fn disabling_rollover_leaves_bias() {
        let mut s = ParameterStore::new();
        s.set_constant(CurveId::One, 1_000.0);
        s.set_auto_rollover(CurveId::One, true);
        let rolled = s.params().curve1.bias;
        s.set_auto_rollover(CurveId::One, false);
        assert_eq!(s.params().curve1.bias, rolled);

        // Further driver changes no longer move it.
        s.set_constant(CurveId::One, 4_000.0);
        assert_eq!(s.params().curve1.bias, rolled);
    }

    #[test]
    fn every_driver_triggers_resync() {
        let mut s = ParameterStore::new();
        s.set_auto_rollover(CurveId::One, true);
        s.set_auto_rollover(CurveId::Two, true);

        let check = |s: &ParameterStore| {
            for id in CurveId::BOTH {
                let expected = rollover_bias(s.params(), id).map(|b| ranges::BIAS.clamp(b));
                assert_eq!(Some(s.params().curve(id).bias), expected);
            }
        };

        s.set_threshold(CurveId::One, 4.0);
        check(&s);
        s.set_threshold(CurveId::Two, 13.0);
        check(&s);
        s.set_constant(CurveId::One, 900.0);
        check(&s);
        s.set_constant(CurveId::Two, 2_200.0);
        check(&s);
        s.set_ref_const(1_800.0);
        check(&s);
        s.set_bias_base(CurveId::Two, -75.0);
        check(&s);
    }

    #[test]
    fn x_range_setter_normalizes() {
        let mut s = ParameterStore::new();
        s.set_x_range(30.0, 2.0);
        assert_eq!(s.params().x_range.as_pair(), [2.0, 30.0]);
        s.set_x_range(60.0, 60.0);
        let r = s.params().x_range;
        assert!(r.lo() < r.hi() && r.hi() <= 50.0);
    }
}
