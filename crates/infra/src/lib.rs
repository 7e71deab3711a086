//! Infrastructure layer: ledger store, transactions, operations, queries.

pub mod audit;
pub mod coordinator;
pub mod ledger_store;
pub mod operations;
pub mod queries;
pub mod txn;

#[cfg(test)]
mod integration_tests;
