//! Mathematical utilities: null-propagating arithmetic and grid helpers.

pub mod grid;
pub mod lifted;

pub use grid::*;
pub use lifted::*;
