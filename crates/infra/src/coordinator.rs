//! Operation execution pipeline (application-level orchestration).
//!
//! This module implements the **optimistic transaction pattern** for ledger
//! operations. It orchestrates the full lifecycle: running the operation's
//! read/validate/stage phases against a fresh transaction, committing the
//! staged batch, and retrying on commit conflicts.
//!
//! ## Operation Execution Flow
//!
//! The `Coordinator` implements this pipeline:
//!
//! ```text
//! Operation
//!   ↓
//! 1. Open a transaction (empty guard set, empty write buffer)
//!   ↓
//! 2. Apply the operation (reads push version guards, writes are staged)
//!   ↓
//! 3. Commit the batch (store re-validates every guard atomically)
//!   ↓
//! 4. On conflict: back off and re-run from step 1 (bounded attempts)
//! ```
//!
//! ## Why This Orchestration?
//!
//! This module exists to:
//!
//! - **Encapsulate complexity**: The read/validate/stage/commit/retry pattern
//!   is identical across all ledger operations, so it is centralized here
//!   rather than duplicated in every handler
//!
//! - **Enforce invariants**: Bounded retries, jittered backoff, and the rule
//!   that deterministic domain failures are never retried are enforced here,
//!   preventing bugs in operation code
//!
//! - **Compose infrastructure**: The coordinator composes the `LedgerStore`
//!   trait, making it testable with the in-memory store and swappable with
//!   real backends
//!
//! ## Error Semantics
//!
//! - **Domain errors**: Surface immediately as `EngineError::Domain`; the
//!   same inputs would fail again, so no retry is attempted
//! - **Commit conflicts**: Retried with exponential backoff and jitter up to
//!   the attempt budget, then surfaced as `EngineError::RetriesExhausted`
//! - **Other store errors**: Surface immediately as `EngineError::Store`
//!
//! This module contains no IO itself; it composes the store trait.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use millbook_core::{DomainError, EntityId, TenantId};

use crate::ledger_store::{Collection, LedgerStore, StoreError};
use crate::operations::Operation;
use crate::txn::LedgerTxn;

/// Engine-level operation error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Deterministic domain failure (never retried).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Store failure. Conflicts are consumed by the coordinator's retry loop
    /// and only surface here if encountered outside it.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Protocol violation: an operation tried to read after staging writes.
    #[error("read of {collection}/{id} after writes were staged")]
    ReadAfterWrite { collection: Collection, id: EntityId },

    /// Document (de)serialization failure.
    #[error("document codec failure: {0}")]
    Codec(String),

    /// Commit conflicts persisted through every allowed attempt.
    #[error("operation '{operation}' exhausted {attempts} commit attempts")]
    RetriesExhausted {
        operation: &'static str,
        attempts: u32,
    },
}

impl EngineError {
    /// Whether retrying the same operation could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Store(StoreError::Conflict { .. }))
    }
}

/// Retry policy for commit conflicts.
///
/// Delays grow exponentially from `base_delay` up to `max_delay`, each
/// multiplied by a jitter factor in `[0.5, 1.5)` so colliding writers
/// desynchronize instead of retrying in lockstep.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(160),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let exponential = self.base_delay.saturating_mul(1u32 << shift);
        let capped = exponential.min(self.max_delay);
        capped.mul_f64(rand::thread_rng().gen_range(0.5..1.5))
    }
}

/// A committed operation's receipt plus commit metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed<R> {
    pub receipt: R,
    pub committed_at: DateTime<Utc>,
    pub attempts: u32,
}

/// Reusable execution engine for ledger operations.
///
/// The coordinator sits between callers (handlers, tests, benches) and the
/// store. It provides a **consistent execution model** for all operations
/// while keeping domain code pure and operation code free of retry logic.
///
/// ## Execution Guarantees
///
/// - **Atomicity**: The staged batch commits entirely or not at all (the
///   store's responsibility)
/// - **Isolation**: Every read is re-validated at commit, so a committed
///   operation observed a consistent snapshot
/// - **Bounded retries**: A conflicting operation is re-run from scratch at
///   most `max_attempts` times, never partially
///
/// ## Generic Parameters
///
/// - `S`: Ledger store implementation (must implement `LedgerStore`)
///
/// Wrapping the store in an `Arc` and cloning it per thread is the intended
/// sharing model; `Arc<S>` implements `LedgerStore` itself.
pub struct Coordinator<S> {
    store: S,
    policy: RetryPolicy,
}

impl<S> Coordinator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(store: S, policy: RetryPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: LedgerStore> Coordinator<S> {
    /// Execute one operation to a committed outcome.
    ///
    /// Each attempt opens a fresh transaction and re-runs the operation's
    /// `apply` from scratch, so stale state read before a conflict can never
    /// leak into the committed batch. Deterministic failures from `apply`
    /// are returned as-is on the first attempt; only commit conflicts burn
    /// retry budget.
    pub fn execute<O: Operation>(
        &self,
        tenant_id: TenantId,
        operation: &O,
    ) -> Result<Committed<O::Receipt>, EngineError> {
        let mut attempt = 1u32;
        loop {
            let mut txn = LedgerTxn::new(&self.store, tenant_id);
            let receipt = operation.apply(&mut txn)?;
            let (guards, writes) = txn.into_parts();

            match self.store.commit(tenant_id, &guards, writes) {
                Ok(outcome) => {
                    tracing::debug!(
                        operation = operation.name(),
                        attempts = attempt,
                        "ledger operation committed"
                    );
                    return Ok(Committed {
                        receipt,
                        committed_at: outcome.committed_at,
                        attempts: attempt,
                    });
                }
                Err(StoreError::Conflict { collection, id, .. })
                    if attempt < self.policy.max_attempts =>
                {
                    tracing::warn!(
                        operation = operation.name(),
                        attempt,
                        collection = %collection,
                        id = %id,
                        "commit conflict, retrying"
                    );
                    std::thread::sleep(self.policy.backoff(attempt));
                    attempt += 1;
                }
                Err(StoreError::Conflict { .. }) => {
                    return Err(EngineError::RetriesExhausted {
                        operation: operation.name(),
                        attempts: attempt,
                    });
                }
                Err(other) => return Err(other.into()),
            }
        }
    }
}
