//! Audit staging and reconciliation.
//!
//! Every quantity mutation commits together with exactly one log record; the
//! pairing functions here are the only way operations write mutated stock
//! back. Reconciliation replays a trail and checks it still explains the
//! current quantity.

use millbook_core::{DomainError, TenantId};
use millbook_inventory::{InventoryItem, InventoryLog};
use millbook_materials::{MaterialId, MaterialLog, RawMaterial};
use millbook_products::ProductId;

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, DocKey, LedgerStore};
use crate::queries::{inventory_history, material_history};
use crate::txn::LedgerTxn;

/// Tolerance for comparing a quantity against a sum of logged changes.
const BALANCE_EPSILON: f64 = 1e-6;

/// Stage a material mutation with its paired audit record.
///
/// The pair is checked for agreement before staging; a log that does not
/// describe the staged entity is an engine bug and must not commit.
pub fn stage_material_update<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    material: &RawMaterial,
    log: &MaterialLog,
) -> Result<(), EngineError> {
    if log.material_id != material.id {
        return Err(
            DomainError::integrity("audit log does not reference the staged material").into(),
        );
    }
    if (log.new_quantity - material.quantity).abs() > BALANCE_EPSILON {
        return Err(DomainError::integrity("audit log does not match the staged material").into());
    }

    txn.put(Collection::RawMaterials, material.id.0, material)?;
    txn.insert(Collection::MaterialLogs, log)?;
    Ok(())
}

/// Stage a finished-goods mutation with its paired audit record.
pub fn stage_inventory_update<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    item: &InventoryItem,
    log: &InventoryLog,
) -> Result<(), EngineError> {
    if log.product_id != item.product_id {
        return Err(DomainError::integrity(
            "audit log does not reference the staged inventory item",
        )
        .into());
    }
    if (log.new_quantity - item.quantity).abs() > BALANCE_EPSILON {
        return Err(
            DomainError::integrity("audit log does not match the staged inventory item").into(),
        );
    }

    txn.put(Collection::InventoryItems, item.doc_id(), item)?;
    txn.insert(Collection::InventoryLogs, log)?;
    Ok(())
}

/// Result of replaying an item's audit trail against its current quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuditCheck {
    pub logged_total: f64,
    pub current_quantity: f64,
}

impl AuditCheck {
    pub fn is_balanced(&self) -> bool {
        (self.logged_total - self.current_quantity).abs() <= BALANCE_EPSILON
    }
}

/// Verify that the summed quantity changes logged for a material equal its
/// current quantity.
pub fn reconcile_material<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
    material_id: MaterialId,
) -> Result<AuditCheck, EngineError> {
    let key = DocKey::new(Collection::RawMaterials, material_id.0);
    let (doc, _) = store.get(tenant_id, &key)?;
    let material: RawMaterial = match doc {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| EngineError::Codec(format!("decoding {key}: {e}")))?,
        None => return Err(DomainError::not_found("raw material", material_id).into()),
    };

    let logged_total = material_history(store, tenant_id, material_id)?
        .iter()
        .map(|entry| entry.doc.quantity_change)
        .sum();

    Ok(AuditCheck {
        logged_total,
        current_quantity: material.quantity,
    })
}

/// Verify that the summed quantity changes logged for a finished-goods item
/// equal its current quantity.
pub fn reconcile_inventory<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
    product_id: ProductId,
) -> Result<AuditCheck, EngineError> {
    let key = DocKey::new(Collection::InventoryItems, product_id.0);
    let (doc, _) = store.get(tenant_id, &key)?;
    let item: InventoryItem = match doc {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| EngineError::Codec(format!("decoding {key}: {e}")))?,
        None => return Err(DomainError::not_found("inventory item", product_id).into()),
    };

    let logged_total = inventory_history(store, tenant_id, product_id)?
        .iter()
        .map(|entry| entry.doc.quantity_change)
        .sum();

    Ok(AuditCheck {
        logged_total,
        current_quantity: item.quantity,
    })
}
