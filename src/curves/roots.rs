//! Zero-crossing extraction by linear interpolation.
//!
//! Single pass over adjacent grid pairs `(i-1, i)`:
//!
//! - skip the pair if either value is undefined or non-finite
//! - earlier value exactly zero: emit its x
//! - else later value exactly zero: emit its x
//! - else strictly opposite signs: emit the interpolated root
//!
//! A grid point that is exactly zero is reported once even though it belongs
//! to two pairs. Output is in grid order.

use crate::curves::DerivedDataset;
use crate::domain::Series;
use crate::error::AppError;
use crate::math::Value;

/// Roots of `ys` sampled at `xs`. Extra trailing entries in the longer slice
/// are ignored.
pub fn find_zero_crossings(xs: &[f64], ys: &[Value]) -> Vec<f64> {
    let n = xs.len().min(ys.len());
    let mut roots = Vec::new();

    for i in 1..n {
        let (Some(y0), Some(y1)) = (ys[i - 1], ys[i]) else {
            continue;
        };
        if !(y0.is_finite() && y1.is_finite()) {
            continue;
        }
        let (x0, x1) = (xs[i - 1], xs[i]);

        if y0 == 0.0 {
            emit(x0, &mut roots);
        } else if y1 == 0.0 {
            emit(x1, &mut roots);
        } else if (y0 < 0.0) != (y1 < 0.0) {
            let root = x0 + (0.0 - y0) * (x1 - x0) / (y1 - y0);
            if root.is_finite() {
                emit(root, &mut roots);
            }
        }
    }
    roots
}

fn emit(x: f64, roots: &mut Vec<f64>) {
    if roots.last() != Some(&x) {
        roots.push(x);
    }
}

/// Roots of one dataset column.
pub fn series_roots(dataset: &DerivedDataset, series: Series) -> Vec<f64> {
    find_zero_crossings(dataset.x(), dataset.column(series))
}

/// Roots of a column looked up by name.
pub fn roots_by_name(dataset: &DerivedDataset, name: &str) -> Result<Vec<f64>, AppError> {
    Ok(find_zero_crossings(dataset.x(), dataset.column_by_name(name)?))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn some(ys: &[f64]) -> Vec<Value> {
        ys.iter().copied().map(Some).collect()
    }

    #[test]
    fn interpolates_a_linear_crossing() {
        let roots = find_zero_crossings(&[4.0, 5.0, 6.0, 7.0], &some(&[5.0, 2.0, -1.0, -4.0]));
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 5.0 + (0.0 - 2.0) * (6.0 - 5.0) / (-1.0 - 2.0));
        assert!((roots[0] - 5.667).abs() < 1e-3);
    }

    #[test]
    fn same_sign_pairs_emit_nothing() {
        assert!(find_zero_crossings(&[1.0, 2.0, 3.0], &some(&[1.0, 2.0, 0.5])).is_empty());
        assert!(find_zero_crossings(&[1.0, 2.0], &some(&[-1.0, -2.0])).is_empty());
    }

    #[test]
    fn exact_zero_is_emitted_once() {
        let roots = find_zero_crossings(&[1.0, 2.0, 3.0], &some(&[1.0, 0.0, -1.0]));
        assert_eq!(roots, vec![2.0]);

        let roots = find_zero_crossings(&[1.0, 2.0, 3.0], &some(&[0.0, 3.0, 4.0]));
        assert_eq!(roots, vec![1.0]);

        // Touching zero without crossing still counts once.
        let roots = find_zero_crossings(&[1.0, 2.0, 3.0], &some(&[2.0, 0.0, 2.0]));
        assert_eq!(roots, vec![2.0]);
    }

    #[test]
    fn undefined_cells_break_the_scan() {
        let ys = vec![Some(1.0), None, Some(-1.0), Some(-2.0)];
        assert!(find_zero_crossings(&[1.0, 2.0, 3.0, 4.0], &ys).is_empty());

        let ys = vec![Some(1.0), Some(-1.0), None, Some(3.0), Some(-3.0)];
        let roots = find_zero_crossings(&[0.0, 1.0, 2.0, 3.0, 4.0], &ys);
        assert_eq!(roots, vec![0.5, 3.5]);
    }

    #[test]
    fn output_is_in_grid_order() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let roots = find_zero_crossings(&xs, &some(&[-1.0, 1.0, -1.0, 1.0, -1.0]));
        assert_eq!(roots, vec![0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn short_inputs_have_no_roots() {
        assert!(find_zero_crossings(&[], &[]).is_empty());
        assert!(find_zero_crossings(&[1.0], &[Some(0.0)]).is_empty());
    }
}
