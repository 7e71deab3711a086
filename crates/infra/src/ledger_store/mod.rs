//! Versioned, tenant-scoped document store boundary.
//!
//! This module defines an infrastructure-facing abstraction for reading and
//! atomically committing ledger documents without making any storage
//! assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{
    Collection, CommitOutcome, DocKey, LedgerStore, StoreError, StoredEntry, Version,
    VersionGuard, Write,
};
