//! Curve generation over the x-axis grid.
//!
//! For each grid point `x` the generator evaluates:
//!
//! ```text
//! raw1    = ln(x / x0_1)       * constant1
//! raw2    = ln(2 - x / x0_2)   * constant2
//! rawRef1 = ln(x / anchor)     * refConst
//! rawRef2 = ln(2 - x / anchor) * refConst
//! ```
//!
//! and builds the slope-scaled, piecewise, benchmark, option, position, net
//! and overlay series from them. A log of a non-positive argument is
//! undefined, and undefined propagates through every later step.
//!
//! The function is pure: the same inputs always give a bit-identical table.

use tracing::debug;

use crate::curves::DerivedDataset;
use crate::domain::{DEFAULT_GRID_POINTS, ParameterSet, SERIES_COUNT, Toggle, ToggleSet};
use crate::error::AppError;
use crate::math::{
    Value, defined, lifted_add, lifted_scale, lifted_sub, lifted_sum, lin_space, safe_log,
};

/// Everything generation depends on. Two equal inputs produce equal tables.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInput {
    pub params: ParameterSet,
    pub toggles: ToggleSet,
    pub effective_b1: f64,
    pub effective_b2: f64,
    pub grid_points: usize,
}

impl GenerationInput {
    /// Build the input from a store snapshot, selecting the effective biases
    /// by `bias_mode`.
    pub fn from_state(params: &ParameterSet, toggles: &ToggleSet, grid_points: usize) -> Self {
        let (effective_b1, effective_b2) = params.effective_biases();
        Self {
            params: params.clone(),
            toggles: *toggles,
            effective_b1,
            effective_b2,
            grid_points,
        }
    }
}

/// Generate the dataset on the default 101-point grid.
pub fn generate(
    params: &ParameterSet,
    toggles: &ToggleSet,
    effective_b1: f64,
    effective_b2: f64,
) -> Result<DerivedDataset, AppError> {
    generate_input(&GenerationInput {
        params: params.clone(),
        toggles: *toggles,
        effective_b1,
        effective_b2,
        grid_points: DEFAULT_GRID_POINTS,
    })
}

pub fn generate_input(input: &GenerationInput) -> Result<DerivedDataset, AppError> {
    let p = &input.params;
    let xs = lin_space(p.x_range.lo(), p.x_range.hi(), input.grid_points)?;
    debug!(
        points = xs.len(),
        lo = p.x_range.lo(),
        hi = p.x_range.hi(),
        "generating curve dataset"
    );

    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(xs.len()); SERIES_COUNT];
    for &x in &xs {
        let row = evaluate_point(x, input);
        for (col, v) in columns.iter_mut().zip(row) {
            col.push(v);
        }
    }

    Ok(DerivedDataset::new(xs, columns))
}

/// All series at one grid point, in `Series::ALL` order.
fn evaluate_point(x: f64, input: &GenerationInput) -> [Value; SERIES_COUNT] {
    let p = &input.params;
    let (b1, b2) = (input.effective_b1, input.effective_b2);
    let (d1, d2) = (p.delta1, p.delta2);
    let x0_1 = p.curve1.threshold;
    let x0_2 = p.curve2.threshold;
    let anchor = p.benchmark.anchor;

    let raw1 = lifted_scale(safe_log(x / x0_1), p.curve1.constant);
    let raw2 = lifted_scale(safe_log(2.0 - x / x0_2), p.curve2.constant);
    let raw_ref1 = lifted_scale(safe_log(x / anchor), p.benchmark.ref_const);
    let raw_ref2 = lifted_scale(safe_log(2.0 - x / anchor), p.benchmark.ref_const);

    let curve1_d1 = add_bias(lifted_scale(raw1, d1), b1);
    let curve1_d2 = add_bias(lifted_scale(raw1, d2), b1);
    let curve2_d1 = add_bias(lifted_scale(raw2, d1), b2);
    let curve2_d2 = add_bias(lifted_scale(raw2, d2), b2);

    let piecewise2 = add_bias(lifted_scale(raw2, if x >= x0_2 { d1 } else { d2 }), b2);
    let piecewise1 = add_bias(lifted_scale(raw1, if x >= x0_1 { d2 } else { d1 }), b1);

    let bench1_d1 = lifted_scale(raw_ref1, d1);
    let bench1_d2 = lifted_scale(raw_ref1, d2);
    let bench2_d1 = lifted_scale(raw_ref2, d1);
    let bench2_d2 = lifted_scale(raw_ref2, d2);

    let call_n = p.call.contracts as f64;
    let put_n = p.put.contracts as f64;
    let call_cost = if p.include_premium { call_n * p.call.premium } else { 0.0 };
    let put_cost = if p.include_premium { put_n * p.put.premium } else { 0.0 };
    let call = defined((x - x0_1).max(0.0) * call_n - call_cost);
    let put = defined((x0_2 - x).max(0.0) * put_n - put_cost);

    let long = defined((x - p.long.entry_price) * p.long.shares as f64);
    let short = defined((p.short.entry_price - x) * p.short.shares as f64);

    let toggles = &input.toggles;
    let net = |curve1: Value, curve2: Value| {
        lifted_sum(
            [
                (Toggle::Curve1, curve1),
                (Toggle::Curve2, curve2),
                (Toggle::PiecewiseFromCurve2, piecewise2),
                (Toggle::PiecewiseFromCurve1, piecewise1),
                (Toggle::Call, call),
                (Toggle::Put, put),
                (Toggle::Long, long),
                (Toggle::Short, short),
            ]
            .into_iter()
            .filter(|(t, _)| toggles.is_on(*t))
            .map(|(_, v)| v),
        )
    };
    let net_d1 = net(curve1_d1, curve2_d1);
    let net_d2 = net(curve1_d2, curve2_d2);
    let overlay = lifted_sub(net_d2, bench1_d2);

    [
        curve1_d1, curve1_d2, curve2_d1, curve2_d2, piecewise2, piecewise1, bench1_d1, bench1_d2,
        bench2_d1, bench2_d2, call, put, long, short, net_d1, net_d2, overlay,
    ]
}

/// `v + bias`; undefined stays undefined.
fn add_bias(v: Value, bias: f64) -> Value {
    lifted_add(v, Some(bias))
}
