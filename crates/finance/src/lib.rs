//! Finance domain module.
//!
//! Cash movement records and operating expenses. Pure domain logic (no IO,
//! no storage).

pub mod cashflow;
pub mod expense;

pub use cashflow::{CashflowCategory, CashflowEntry, CashflowKind};
pub use expense::Expense;
