//! `millbook-materials` — raw-material ledger domain.

pub mod material;

pub use material::{
    MaterialId, MaterialLog, MaterialLogKind, PurchaseApplied, RawMaterial, Unit,
};
