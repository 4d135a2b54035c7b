//! Auto-rollover bias synchronization.
//!
//! When a curve has auto-rollover enabled, its `real` bias is derived from
//! the baseline and the relative position of the two thresholds:
//!
//! ```text
//! b1 = b1Base + (refConst - constant1) * ln(x0_2 / x0_1)
//! b2 = b2Base + (refConst - constant2) * ln(x0_1 / x0_2)
//! ```
//!
//! An undefined result (non-positive log argument, non-finite value) keeps
//! the previous bias. The recomputed value is clamped into the bias range so
//! the stored state never leaves the range table.

use tracing::{debug, warn};

use crate::domain::{CurveId, ParameterSet, ranges};
use crate::math::{defined, safe_log};

/// What happened to one curve's bias during a synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RolloverOutcome {
    /// Auto-rollover is off for this curve.
    Disabled,
    /// The formula was evaluated and stored (possibly the same value).
    Applied(f64),
    /// The formula was undefined; the previous bias was kept.
    Kept,
}

/// Evaluate the rollover formula for `id` without mutating anything.
pub fn rollover_bias(params: &ParameterSet, id: CurveId) -> Option<f64> {
    let own = params.curve(id);
    let other = params.curve(id.other());
    if !(own.threshold > 0.0 && other.threshold > 0.0) {
        return None;
    }
    let ln = safe_log(other.threshold / own.threshold)?;
    defined(own.bias_base + (params.benchmark.ref_const - own.constant) * ln)
}

/// Recompute every auto-rollover bias in place.
///
/// Idempotent: calling it twice with unchanged inputs yields the same state.
pub fn synchronize(params: &mut ParameterSet) -> [RolloverOutcome; 2] {
    CurveId::BOTH.map(|id| {
        if !params.curve(id).auto_rollover {
            return RolloverOutcome::Disabled;
        }
        match rollover_bias(params, id) {
            Some(b) => {
                let b = ranges::BIAS.clamp(b);
                debug!(curve = ?id, bias = b, "rollover bias recomputed");
                params.curve_mut(id).bias = b;
                RolloverOutcome::Applied(b)
            }
            None => {
                warn!(
                    curve = ?id,
                    kept = params.curve(id).bias,
                    "rollover formula undefined; keeping previous bias"
                );
                RolloverOutcome::Kept
            }
        }
    })
}
