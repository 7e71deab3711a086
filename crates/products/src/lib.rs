//! `millbook-products` — product catalog and production-order records.
//!
//! Business rules for products, their bills of materials, and completed
//! production runs. Deterministic domain logic only (no IO, no storage).

pub mod product;

pub use product::{
    BomLine, MaterialRequirement, Product, ProductId, ProductionOrder, ProductionStatus,
};
