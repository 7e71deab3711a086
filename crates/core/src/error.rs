//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// invariants, shortages). Infrastructure concerns (conflicts, retries,
/// storage faults) belong to the layers that own them.
///
/// Variants that describe a quantity problem carry the offending entity name
/// and the required vs. available amounts, so callers can build a user-facing
/// message without parsing free text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. non-positive quantity, empty name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced document does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A deduction would exceed the available quantity.
    #[error("insufficient {name}: required {required}, available {available}")]
    InsufficientStock {
        name: String,
        required: f64,
        available: f64,
    },

    /// A payment would exceed the receivable's outstanding balance.
    #[error("payment {amount} exceeds due amount {due}")]
    PaymentExceedsDue { amount: f64, due: f64 },

    /// Committing would leave a quantity or cost negative.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A document belongs to a different organization.
    #[error("organization mismatch")]
    TenantMismatch,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn insufficient_stock(name: impl Into<String>, required: f64, available: f64) -> Self {
        Self::InsufficientStock {
            name: name.into(),
            required,
            available,
        }
    }

    pub fn payment_exceeds_due(amount: f64, due: f64) -> Self {
        Self::PaymentExceedsDue { amount, due }
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
