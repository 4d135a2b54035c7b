//! Shared domain types.
//!
//! These types are plain data so they can be:
//!
//! - owned and mutated by the parameter store
//! - fed to the pure curve generator and root finder
//! - exported to / imported from config snapshots

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::clamp;

/// Default number of grid points over the x-range.
pub const DEFAULT_GRID_POINTS: usize = 101;

/// Largest accepted number of grid points.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Minimum width of the chart x-range.
pub const MIN_X_SPAN: f64 = 0.1;

/// A closed numeric range `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub lo: f64,
    pub hi: f64,
}

impl ParamRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn clamp(self, v: f64) -> f64 {
        clamp(v, self.lo, self.hi)
    }

    pub fn contains(self, v: f64) -> bool {
        v.is_finite() && v >= self.lo && v <= self.hi
    }
}

/// Range table for every stored scalar.
pub mod ranges {
    use super::ParamRange;

    pub const THRESHOLD: ParamRange = ParamRange::new(0.1, 50.0);
    pub const CONSTANT: ParamRange = ParamRange::new(100.0, 10_000.0);
    pub const BIAS: ParamRange = ParamRange::new(-5_000.0, 5_000.0);
    pub const ANCHOR: ParamRange = ParamRange::new(0.1, 50.0);
    pub const CONTRACTS: ParamRange = ParamRange::new(0.0, 10_000.0);
    pub const PREMIUM: ParamRange = ParamRange::new(0.0, 1_000.0);
    pub const ENTRY_PRICE: ParamRange = ParamRange::new(0.0, 50.0);
    pub const SHARES: ParamRange = ParamRange::new(0.0, 10_000_000.0);
    pub const DELTA: ParamRange = ParamRange::new(0.01, 2.0);
    pub const X_AXIS: ParamRange = ParamRange::new(0.1, 50.0);
}

/// Which bias feeds the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BiasMode {
    /// The manual / auto-rollover bias (`b1`, `b2`).
    #[default]
    Real,
    /// The independent "add option" bias (`b1_add_option`, `b2_add_option`).
    #[value(name = "add_option")]
    AddOption,
}

impl BiasMode {
    pub fn as_str(self) -> &'static str {
        match self {
            BiasMode::Real => "real",
            BiasMode::AddOption => "add_option",
        }
    }

    /// Exact-match parse; anything else is rejected.
    pub fn parse_exact(s: &str) -> Option<Self> {
        match s {
            "real" => Some(BiasMode::Real),
            "add_option" => Some(BiasMode::AddOption),
            _ => None,
        }
    }
}

/// Selects one of the two logarithmic curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveId {
    One,
    Two,
}

impl CurveId {
    pub const BOTH: [CurveId; 2] = [CurveId::One, CurveId::Two];

    pub fn other(self) -> CurveId {
        match self {
            CurveId::One => CurveId::Two,
            CurveId::Two => CurveId::One,
        }
    }
}

/// Selects one of the two option legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegKind {
    Call,
    Put,
}

/// Selects one of the two directional positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Long,
    Short,
}

/// Parameters of one logarithmic payoff curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    /// `x0`: the curve's threshold.
    pub threshold: f64,
    pub constant: f64,
    /// Bias used in `real` mode (manual or auto-rollover).
    pub bias: f64,
    /// Baseline the rollover formula starts from.
    pub bias_base: f64,
    pub auto_rollover: bool,
    /// Bias used in `add_option` mode.
    pub bias_add_option: f64,
}

impl CurveParams {
    fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            constant: 1_500.0,
            bias: 0.0,
            bias_base: 0.0,
            auto_rollover: false,
            bias_add_option: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkParams {
    pub anchor: f64,
    pub ref_const: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptionLeg {
    pub contracts: u32,
    /// Premium per contract.
    pub premium: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub entry_price: f64,
    pub shares: u64,
}

/// Chart x-range. Always satisfies `lo + MIN_X_SPAN <= hi` within the axis range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XRange {
    lo: f64,
    hi: f64,
}

impl XRange {
    /// Clamp both endpoints into the axis range, reorder, and enforce the
    /// minimum span.
    ///
    /// If `lo` sits so close to the axis maximum that `lo + MIN_X_SPAN` would
    /// leave the range, `lo` is pulled down instead of pushing `hi` out.
    pub fn normalized(a: f64, b: f64) -> Self {
        let a = ranges::X_AXIS.clamp(a);
        let b = ranges::X_AXIS.clamp(b);
        let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
        if hi < lo + MIN_X_SPAN {
            hi = lo + MIN_X_SPAN;
            if hi > ranges::X_AXIS.hi {
                hi = ranges::X_AXIS.hi;
                lo = hi - MIN_X_SPAN;
            }
        }
        Self { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn as_pair(&self) -> [f64; 2] {
        [self.lo, self.hi]
    }
}

/// The full validated parameter state.
///
/// Fields are public for reading; all writes go through
/// [`crate::store::ParameterStore`] or the config validator, which keep the
/// range table and cross-field rules intact.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub curve1: CurveParams,
    pub curve2: CurveParams,
    pub benchmark: BenchmarkParams,
    pub call: OptionLeg,
    pub put: OptionLeg,
    pub long: Position,
    pub short: Position,
    pub delta1: f64,
    pub delta2: f64,
    pub include_premium: bool,
    pub bias_mode: BiasMode,
    pub x_range: XRange,
}

impl Default for ParameterSet {
    fn default() -> Self {
        let curve1 = CurveParams::with_threshold(7.0);
        let curve2 = CurveParams::with_threshold(10.0);
        Self {
            curve1,
            curve2,
            benchmark: BenchmarkParams {
                anchor: 8.5,
                ref_const: 1_500.0,
            },
            call: OptionLeg::default(),
            put: OptionLeg::default(),
            long: Position {
                entry_price: curve1.threshold,
                shares: 0,
            },
            short: Position {
                entry_price: curve2.threshold,
                shares: 0,
            },
            delta1: 1.0,
            delta2: 0.5,
            include_premium: true,
            bias_mode: BiasMode::Real,
            x_range: XRange::normalized(1.0, 20.0),
        }
    }
}

impl ParameterSet {
    pub fn curve(&self, id: CurveId) -> &CurveParams {
        match id {
            CurveId::One => &self.curve1,
            CurveId::Two => &self.curve2,
        }
    }

    pub fn curve_mut(&mut self, id: CurveId) -> &mut CurveParams {
        match id {
            CurveId::One => &mut self.curve1,
            CurveId::Two => &mut self.curve2,
        }
    }

    pub fn leg(&self, kind: LegKind) -> &OptionLeg {
        match kind {
            LegKind::Call => &self.call,
            LegKind::Put => &self.put,
        }
    }

    pub fn leg_mut(&mut self, kind: LegKind) -> &mut OptionLeg {
        match kind {
            LegKind::Call => &mut self.call,
            LegKind::Put => &mut self.put,
        }
    }

    pub fn position(&self, side: Side) -> &Position {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    pub fn position_mut(&mut self, side: Side) -> &mut Position {
        match side {
            Side::Long => &mut self.long,
            Side::Short => &mut self.short,
        }
    }

    /// Bias actually used by the generator for `id`, selected by `bias_mode`.
    pub fn effective_bias(&self, id: CurveId) -> f64 {
        let c = self.curve(id);
        match self.bias_mode {
            BiasMode::Real => c.bias,
            BiasMode::AddOption => c.bias_add_option,
        }
    }

    /// `(effective_b1, effective_b2)`.
    pub fn effective_biases(&self) -> (f64, f64) {
        (
            self.effective_bias(CurveId::One),
            self.effective_bias(CurveId::Two),
        )
    }

    /// Check the range table and x-range ordering.
    pub fn is_within_ranges(&self) -> bool {
        let curves_ok = CurveId::BOTH.iter().all(|&id| {
            let c = self.curve(id);
            ranges::THRESHOLD.contains(c.threshold)
                && ranges::CONSTANT.contains(c.constant)
                && ranges::BIAS.contains(c.bias)
                && ranges::BIAS.contains(c.bias_base)
                && ranges::BIAS.contains(c.bias_add_option)
        });
        let legs_ok = [&self.call, &self.put].iter().all(|leg| {
            ranges::CONTRACTS.contains(leg.contracts as f64)
                && ranges::PREMIUM.contains(leg.premium)
        });
        let positions_ok = [&self.long, &self.short].iter().all(|p| {
            ranges::ENTRY_PRICE.contains(p.entry_price) && ranges::SHARES.contains(p.shares as f64)
        });
        curves_ok
            && legs_ok
            && positions_ok
            && ranges::ANCHOR.contains(self.benchmark.anchor)
            && ranges::CONSTANT.contains(self.benchmark.ref_const)
            && ranges::DELTA.contains(self.delta1)
            && ranges::DELTA.contains(self.delta2)
            && ranges::X_AXIS.contains(self.x_range.lo)
            && ranges::X_AXIS.contains(self.x_range.hi)
            && self.x_range.lo < self.x_range.hi
    }
}

/// One of the eleven display/aggregation switches (`showY1`..`showY11`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    Curve1,
    Curve2,
    Benchmark,
    PiecewiseFromCurve2,
    PiecewiseFromCurve1,
    Call,
    Put,
    Long,
    Short,
    Net,
    Overlay,
}

impl Toggle {
    pub const ALL: [Toggle; 11] = [
        Toggle::Curve1,
        Toggle::Curve2,
        Toggle::Benchmark,
        Toggle::PiecewiseFromCurve2,
        Toggle::PiecewiseFromCurve1,
        Toggle::Call,
        Toggle::Put,
        Toggle::Long,
        Toggle::Short,
        Toggle::Net,
        Toggle::Overlay,
    ];

    /// Config key (`showY1`..`showY11`).
    pub fn key(self) -> &'static str {
        match self {
            Toggle::Curve1 => "showY1",
            Toggle::Curve2 => "showY2",
            Toggle::Benchmark => "showY3",
            Toggle::PiecewiseFromCurve2 => "showY4",
            Toggle::PiecewiseFromCurve1 => "showY5",
            Toggle::Call => "showY6",
            Toggle::Put => "showY7",
            Toggle::Long => "showY8",
            Toggle::Short => "showY9",
            Toggle::Net => "showY10",
            Toggle::Overlay => "showY11",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleSet {
    flags: [bool; 11],
}

impl Default for ToggleSet {
    fn default() -> Self {
        let mut set = Self::all_on();
        set.set(Toggle::Benchmark, false);
        set.set(Toggle::Overlay, false);
        set
    }
}

impl ToggleSet {
    pub fn all_on() -> Self {
        Self { flags: [true; 11] }
    }

    pub fn all_off() -> Self {
        Self { flags: [false; 11] }
    }

    pub fn is_on(&self, t: Toggle) -> bool {
        self.flags[t.index()]
    }

    pub fn set(&mut self, t: Toggle, on: bool) {
        self.flags[t.index()] = on;
    }

    pub fn with(mut self, t: Toggle, on: bool) -> Self {
        self.set(t, on);
        self
    }
}

/// Number of dataset columns.
pub const SERIES_COUNT: usize = 17;

/// Every column of the derived dataset, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Series {
    Curve1Delta1,
    Curve1Delta2,
    Curve2Delta1,
    Curve2Delta2,
    PiecewiseFromCurve2,
    PiecewiseFromCurve1,
    Benchmark1Delta1,
    Benchmark1Delta2,
    Benchmark2Delta1,
    Benchmark2Delta2,
    CallIntrinsic,
    PutIntrinsic,
    LongPl,
    ShortPl,
    NetDelta1,
    NetDelta2,
    OverlayDelta2,
}

impl Series {
    pub const ALL: [Series; SERIES_COUNT] = [
        Series::Curve1Delta1,
        Series::Curve1Delta2,
        Series::Curve2Delta1,
        Series::Curve2Delta2,
        Series::PiecewiseFromCurve2,
        Series::PiecewiseFromCurve1,
        Series::Benchmark1Delta1,
        Series::Benchmark1Delta2,
        Series::Benchmark2Delta1,
        Series::Benchmark2Delta2,
        Series::CallIntrinsic,
        Series::PutIntrinsic,
        Series::LongPl,
        Series::ShortPl,
        Series::NetDelta1,
        Series::NetDelta2,
        Series::OverlayDelta2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Series::Curve1Delta1 => "curve1_delta1",
            Series::Curve1Delta2 => "curve1_delta2",
            Series::Curve2Delta1 => "curve2_delta1",
            Series::Curve2Delta2 => "curve2_delta2",
            Series::PiecewiseFromCurve2 => "piecewise_from_curve2",
            Series::PiecewiseFromCurve1 => "piecewise_from_curve1",
            Series::Benchmark1Delta1 => "benchmark1_delta1",
            Series::Benchmark1Delta2 => "benchmark1_delta2",
            Series::Benchmark2Delta1 => "benchmark2_delta1",
            Series::Benchmark2Delta2 => "benchmark2_delta2",
            Series::CallIntrinsic => "call_intrinsic",
            Series::PutIntrinsic => "put_intrinsic",
            Series::LongPl => "long_pl",
            Series::ShortPl => "short_pl",
            Series::NetDelta1 => "net_delta1",
            Series::NetDelta2 => "net_delta2",
            Series::OverlayDelta2 => "overlay_delta2",
        }
    }

    /// Column position in the dataset.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The switch that controls this series' visibility.
    pub fn toggle(self) -> Toggle {
        match self {
            Series::Curve1Delta1 | Series::Curve1Delta2 => Toggle::Curve1,
            Series::Curve2Delta1 | Series::Curve2Delta2 => Toggle::Curve2,
            Series::PiecewiseFromCurve2 => Toggle::PiecewiseFromCurve2,
            Series::PiecewiseFromCurve1 => Toggle::PiecewiseFromCurve1,
            Series::Benchmark1Delta1
            | Series::Benchmark1Delta2
            | Series::Benchmark2Delta1
            | Series::Benchmark2Delta2 => Toggle::Benchmark,
            Series::CallIntrinsic => Toggle::Call,
            Series::PutIntrinsic => Toggle::Put,
            Series::LongPl => Toggle::Long,
            Series::ShortPl => Toggle::Short,
            Series::NetDelta1 | Series::NetDelta2 => Toggle::Net,
            Series::OverlayDelta2 => Toggle::Overlay,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Series {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Series::ALL
            .iter()
            .copied()
            .find(|series| series.name() == s)
            .ok_or_else(|| format!("unknown series '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_within_ranges() {
        let p = ParameterSet::default();
        assert!(p.is_within_ranges());
        assert_eq!(p.long.entry_price, p.curve1.threshold);
        assert_eq!(p.short.entry_price, p.curve2.threshold);
    }

    #[test]
    fn x_range_normalizes_order_and_span() {
        let r = XRange::normalized(12.0, 3.0);
        assert_eq!(r.as_pair(), [3.0, 12.0]);

        let r = XRange::normalized(5.0, 5.0);
        assert_eq!(r.lo(), 5.0);
        assert!((r.hi() - 5.1).abs() < 1e-12);

        let r = XRange::normalized(-10.0, 500.0);
        assert_eq!(r.as_pair(), [0.1, 50.0]);

        let r = XRange::normalized(80.0, 90.0);
        assert_eq!(r.hi(), 50.0);
        assert!(r.lo() < r.hi());
        assert!(ranges::X_AXIS.contains(r.lo()));
    }

    #[test]
    fn bias_mode_parse_is_exact() {
        assert_eq!(BiasMode::parse_exact("real"), Some(BiasMode::Real));
        assert_eq!(BiasMode::parse_exact("add_option"), Some(BiasMode::AddOption));
        assert_eq!(BiasMode::parse_exact("Real"), None);
        assert_eq!(BiasMode::parse_exact(" real"), None);
    }

    #[test]
    fn effective_bias_follows_mode() {
        let mut p = ParameterSet::default();
        p.curve1.bias = 12.0;
        p.curve1.bias_add_option = -3.0;
        p.curve2.bias = 4.0;
        p.curve2.bias_add_option = 9.0;
        assert_eq!(p.effective_biases(), (12.0, 4.0));
        p.bias_mode = BiasMode::AddOption;
        assert_eq!(p.effective_biases(), (-3.0, 9.0));
    }

    #[test]
    fn series_names_round_trip() {
        for s in Series::ALL {
            assert_eq!(s.name().parse::<Series>(), Ok(s));
            assert_eq!(Series::ALL[s.index()], s);
        }
        assert!("curve3".parse::<Series>().is_err());
    }

    #[test]
    fn toggle_keys_are_sequential() {
        for (i, t) in Toggle::ALL.iter().enumerate() {
            assert_eq!(t.key(), format!("showY{}", i + 1));
        }
    }
}
