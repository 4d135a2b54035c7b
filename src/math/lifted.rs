//! Null-propagating arithmetic.
//!
//! A cell in the derived dataset is a [`Value`]: `Some(finite)` or `None`
//! ("undefined at this point"). Every operation below short-circuits on
//! `None` and also maps any non-finite intermediate result to `None`, so a
//! NaN or infinity can never leak into a table.

/// A numeric value that may be undefined.
pub type Value = Option<f64>;

/// Wrap a raw float, mapping NaN/inf to undefined.
#[inline]
pub fn defined(v: f64) -> Value {
    v.is_finite().then_some(v)
}

/// Natural log for strictly positive arguments, undefined otherwise.
#[inline]
pub fn safe_log(v: f64) -> Value {
    if v > 0.0 { defined(v.ln()) } else { None }
}

#[inline]
pub fn lifted_add(a: Value, b: Value) -> Value {
    defined(a? + b?)
}

#[inline]
pub fn lifted_sub(a: Value, b: Value) -> Value {
    defined(a? - b?)
}

/// Scale by a plain coefficient.
#[inline]
pub fn lifted_scale(a: Value, k: f64) -> Value {
    defined(a? * k)
}

/// Sum of all terms; undefined if any term is undefined.
///
/// An empty iterator sums to `Some(0.0)`.
pub fn lifted_sum<I>(terms: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    let mut acc = 0.0;
    for t in terms {
        acc += t?;
    }
    defined(acc)
}
