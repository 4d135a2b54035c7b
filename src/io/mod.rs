//! Input/output helpers.
//!
//! - raw config validation and import (`validate`)
//! - config snapshot read/write (`snapshot`)
//! - dataset CSV export (`export`)

pub mod export;
pub mod snapshot;
pub mod validate;

pub use export::*;
pub use snapshot::*;
pub use validate::*;
