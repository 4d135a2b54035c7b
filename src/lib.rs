//! `payoff-curves` library crate.
//!
//! The binary (`pcurves`) is a thin wrapper around this library so that:
//!
//! - the curve math is testable without spawning processes
//! - other front-ends can drive the same session and store
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod curves;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod store;
