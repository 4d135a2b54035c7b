//! Curve evaluation.
//!
//! Responsibilities:
//!
//! - build the multi-series dataset over the x grid (`generator`)
//! - hold the result table (`dataset`)
//! - extract zero crossings of one column (`roots`)
//! - memoize both by input value (`memo`)

pub mod dataset;
pub mod generator;
pub mod memo;
pub mod roots;

pub use dataset::*;
pub use generator::*;
pub use memo::*;
pub use roots::*;
