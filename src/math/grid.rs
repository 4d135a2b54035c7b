//! Range clamping and x-axis grid construction.

use crate::domain::MAX_GRID_POINTS;
use crate::error::{AppError, EXIT_INVALID_INPUT};

/// Clamp `v` into `[lo, hi]`.
///
/// Idempotent and monotonic for finite inputs. NaN maps to `lo`; callers that
/// must keep a previous value for non-finite input check `is_finite` first.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Generate `steps` equally spaced points between `lo` and `hi` (inclusive).
///
/// The last point is pinned to `hi` so the upper endpoint is exact.
pub fn lin_space(lo: f64, hi: f64, steps: usize) -> Result<Vec<f64>, AppError> {
    if !(lo.is_finite() && hi.is_finite() && hi > lo) {
        return Err(AppError::new(
            EXIT_INVALID_INPUT,
            format!("Invalid grid range: lo={lo}, hi={hi} (must be finite and hi>lo)."),
        ));
    }
    if !(2..=MAX_GRID_POINTS).contains(&steps) {
        return Err(AppError::new(
            EXIT_INVALID_INPUT,
            format!("Grid must have 2..={MAX_GRID_POINTS} points, got {steps}."),
        ));
    }

    let step = (hi - lo) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(lo + step * i as f64);
    }
    out.push(hi);
    Ok(out)
}
