//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - the range table and the validated parameter state (`ParameterSet`)
//! - display/aggregation switches (`Toggle`, `ToggleSet`)
//! - the dataset column catalogue (`Series`)

pub mod types;

pub use types::*;
