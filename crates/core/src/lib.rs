//! `millbook-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::{ensure_same_org, TenantScoped};
pub use error::{DomainError, DomainResult};
pub use id::{EntityId, TenantId};
pub use money::{ensure_non_negative, ensure_positive, is_settled, SETTLEMENT_EPSILON};
