//! `millbook-sales` — sales-order lifecycle domain.
//!
//! Business rules for sales orders, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod order;

pub use order::{OrderId, OrderLine, OrderStatus, SalesOrder};
