//! Monetary and quantity value helpers.
//!
//! Amounts and quantities are `f64` throughout. Comparisons against "paid in
//! full" must go through [`is_settled`], never exact equality.

use crate::error::{DomainError, DomainResult};

/// Rounding slack for "paid in full" checks on monetary balances.
pub const SETTLEMENT_EPSILON: f64 = 0.01;

/// True when an outstanding balance is small enough to count as settled.
pub fn is_settled(due: f64) -> bool {
    due <= SETTLEMENT_EPSILON
}

/// Validate that a quantity or amount is strictly positive.
///
/// Rejects NaN as well (a NaN is neither positive nor non-negative).
pub fn ensure_positive(label: &str, value: f64) -> DomainResult<()> {
    if !(value > 0.0) {
        return Err(DomainError::validation(format!("{label} must be positive")));
    }
    Ok(())
}

/// Validate that a quantity or amount is zero or greater.
pub fn ensure_non_negative(label: &str, value: f64) -> DomainResult<()> {
    if !(value >= 0.0) {
        return Err(DomainError::validation(format!(
            "{label} cannot be negative"
        )));
    }
    Ok(())
}
