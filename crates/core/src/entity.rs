//! Tenant scoping for ledger documents.

use crate::error::{DomainError, DomainResult};
use crate::id::TenantId;

/// A document owned by exactly one organization.
///
/// Every ledger document carries its owning tenant so isolation can be
/// revalidated inside the engine even when the store is already scoped.
pub trait TenantScoped {
    fn org_id(&self) -> TenantId;
}

/// Check that a loaded document belongs to the expected organization.
///
/// Store queries are tenant-scoped already; this catches a buggy backend or a
/// mis-keyed document before any write is staged.
pub fn ensure_same_org<T: TenantScoped>(tenant_id: TenantId, doc: &T) -> DomainResult<()> {
    if doc.org_id() != tenant_id {
        return Err(DomainError::TenantMismatch);
    }
    Ok(())
}
