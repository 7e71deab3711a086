//! `millbook-costing` — weighted-average costing engine.
//!
//! Pure arithmetic only. No validation, no I/O: callers are responsible for
//! rejecting negative inputs before rolling them into an average.

pub mod average;

pub use average::{unit_cost, weighted_average, CostRoll};
