use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use millbook_core::{EntityId, TenantId};
use std::sync::Arc;

/// Ledger collection (one per document type).
///
/// Every document lives in exactly one collection; the collection plus the
/// document id plus the tenant form the full address of a document. Entity
/// collections hold mutable current state, log collections are append-only.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    RawMaterials,
    Products,
    InventoryItems,
    SalesOrders,
    ProductionOrders,
    Receivables,
    Collections,
    MaterialLogs,
    InventoryLogs,
    CashflowEntries,
    Expenses,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::RawMaterials => "raw_materials",
            Collection::Products => "products",
            Collection::InventoryItems => "inventory_items",
            Collection::SalesOrders => "sales_orders",
            Collection::ProductionOrders => "production_orders",
            Collection::Receivables => "receivables",
            Collection::Collections => "collections",
            Collection::MaterialLogs => "raw_material_logs",
            Collection::InventoryLogs => "inventory_logs",
            Collection::CashflowEntries => "cashflow_entries",
            Collection::Expenses => "expenses",
        }
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a document within a tenant: collection + document id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocKey {
    pub collection: Collection,
    pub id: EntityId,
}

impl DocKey {
    pub fn new(collection: Collection, id: EntityId) -> Self {
        Self { collection, id }
    }
}

impl core::fmt::Display for DocKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Document version counter used for optimistic concurrency.
///
/// An absent document has version 0; the first committed write stores
/// version 1 and every subsequent committed write increments by one.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    pub const ABSENT: Version = Version(0);

    pub fn next(&self) -> Version {
        Version(self.0 + 1)
    }
}

impl core::fmt::Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A version observed during the read phase, re-checked at commit.
///
/// `VersionGuard` is how a transaction proves its reads are still current.
/// Guarding version 0 asserts the document is still absent at commit time,
/// so "create if missing" races are detected like any other conflict.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VersionGuard {
    pub key: DocKey,
    pub version: Version,
}

impl VersionGuard {
    pub fn new(key: DocKey, version: Version) -> Self {
        Self { key, version }
    }
}

/// A staged document write, not yet committed.
///
/// ## Write Lifecycle
///
/// Writes go through this lifecycle:
///
/// 1. **Domain value**: Produced by a pure entity transition
/// 2. **Staged `Write`**: Serialized to JSON and buffered inside a transaction
/// 3. **Committed**: The store validates guards and applies the whole batch
/// 4. **`StoredEntry`**: Persisted with an assigned version and commit timestamp
///
/// ## Variants
///
/// - `Put`: Replace the document at the key. A `Put` against an existing
///   document must be covered by a `VersionGuard` from the same transaction,
///   otherwise the commit is rejected (blind overwrites are never allowed).
/// - `Insert`: Create a fresh document. The id is assigned when the write is
///   staged (not at commit), so receipts can reference it before the commit
///   lands. Used for append-only records: logs, production orders,
///   collections, cashflow entries, expenses.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Put { key: DocKey, doc: JsonValue },
    Insert { key: DocKey, doc: JsonValue },
}

impl Write {
    pub fn key(&self) -> &DocKey {
        match self {
            Write::Put { key, .. } => key,
            Write::Insert { key, .. } => key,
        }
    }

    pub fn doc(&self) -> &JsonValue {
        match self {
            Write::Put { doc, .. } => doc,
            Write::Insert { doc, .. } => doc,
        }
    }
}

/// A stored document returned by `list()`.
///
/// `recorded_at` is the store-assigned commit timestamp of the write that
/// last touched the document. All writes in one commit share one timestamp,
/// which is what makes audit logs sortable into commit order.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub id: EntityId,
    pub doc: JsonValue,
    pub version: Version,
    pub recorded_at: DateTime<Utc>,
}

/// Result of a successful commit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub committed_at: DateTime<Utc>,
}

/// Ledger store operation error.
///
/// This enum represents errors that can occur when interacting with the
/// ledger store. These are **infrastructure errors** (concurrency, isolation,
/// storage) as opposed to domain errors (validation, shortages).
///
/// ## Error Categories
///
/// - **Conflict**: Optimistic concurrency check failed (version moved between
///   read and commit). The only transient error; callers retry these.
/// - **TenantIsolation**: A staged document does not belong to the committing
///   tenant (security violation).
/// - **UnguardedWrite**: A `Put` targeted an existing document without a
///   covering version guard (protocol violation in the caller).
/// - **Internal**: Storage-level fault (e.g. poisoned lock).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed on {collection}/{id}: expected version {expected}, found {found}")]
    Conflict {
        collection: Collection,
        id: EntityId,
        expected: Version,
        found: Version,
    },

    #[error("tenant isolation violation: {0}")]
    TenantIsolation(String),

    #[error("write to existing document without a version guard: {collection}/{id}")]
    UnguardedWrite { collection: Collection, id: EntityId },

    #[error("store internal error: {0}")]
    Internal(String),
}

/// Versioned, tenant-scoped ledger document store.
///
/// The `LedgerStore` is the **persistence layer** for ledger documents. It
/// provides point reads, whole-collection reads, and an atomic multi-document
/// commit guarded by optimistic concurrency.
///
/// ## Design Principles
///
/// - **No storage assumptions**: Works with the in-memory implementation
///   (tests/dev) and future document-database backends (production)
/// - **Tenant isolation**: Documents are addressed per tenant, and commit
///   re-validates the `org_id` of every staged document (defense in depth)
/// - **Optimistic locking**: Via `VersionGuard` (no pessimistic locks; the
///   store never blocks readers on writers)
/// - **Atomic batches**: A commit applies all of its writes or none of them
///
/// ## Commit Semantics
///
/// `commit()`:
/// - Validates every guard against the document's current version
/// - Rejects `Put`s on existing documents with no covering guard
/// - Validates that every staged document carries the committing tenant's
///   `org_id`
/// - Applies the batch atomically: each write bumps the document version and
///   stamps the shared commit timestamp
///
/// The first failed validation aborts the whole commit; partial application
/// is never observable.
///
/// ## Read Semantics
///
/// `get()` returns the document (if present) and its current version; an
/// absent document reads as `(None, Version(0))`. `list()` returns all of a
/// tenant's documents in one collection, ordered by commit timestamp (ties
/// broken by id, which is time-ordered).
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - Enforce tenant isolation (a tenant can never observe another's documents)
/// - Enforce guard validation before any write is applied
/// - Assign versions monotonically per document (no gaps, no reuse)
/// - Stamp all writes of one commit with one timestamp
/// - Handle concurrent commits correctly (optimistic locking)
pub trait LedgerStore: Send + Sync {
    /// Point-read a document with its current version.
    fn get(
        &self,
        tenant_id: TenantId,
        key: &DocKey,
    ) -> Result<(Option<JsonValue>, Version), StoreError>;

    /// Atomically apply a batch of writes, re-validating the given guards.
    ///
    /// Implementations must:
    /// - reject the whole batch on the first stale guard
    /// - reject unguarded `Put`s against existing documents
    /// - reject documents whose `org_id` is not the committing tenant's
    fn commit(
        &self,
        tenant_id: TenantId,
        guards: &[VersionGuard],
        writes: Vec<Write>,
    ) -> Result<CommitOutcome, StoreError>;

    /// Load all documents in a collection for one tenant, in commit order.
    fn list(
        &self,
        tenant_id: TenantId,
        collection: Collection,
    ) -> Result<Vec<StoredEntry>, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn get(
        &self,
        tenant_id: TenantId,
        key: &DocKey,
    ) -> Result<(Option<JsonValue>, Version), StoreError> {
        (**self).get(tenant_id, key)
    }

    fn commit(
        &self,
        tenant_id: TenantId,
        guards: &[VersionGuard],
        writes: Vec<Write>,
    ) -> Result<CommitOutcome, StoreError> {
        (**self).commit(tenant_id, guards, writes)
    }

    fn list(
        &self,
        tenant_id: TenantId,
        collection: Collection,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        (**self).list(tenant_id, collection)
    }
}
