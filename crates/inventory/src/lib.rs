//! `millbook-inventory` — finished-goods ledger domain.
//!
//! Business rules for finished-goods stock, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;

pub use item::{InventoryItem, InventoryLog, InventoryLogKind};
