use millbook_core::DomainError;
use millbook_inventory::InventoryLog;
use millbook_materials::{MaterialId, MaterialLog};
use millbook_products::ProductId;

use crate::audit::{stage_inventory_update, stage_material_update};
use crate::coordinator::EngineError;
use crate::ledger_store::LedgerStore;
use crate::operations::{read_inventory, read_material, Operation};
use crate::txn::LedgerTxn;

/// What a committed manual correction changed.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentReceipt {
    pub delta: f64,
    pub new_quantity: f64,
}

fn validated_reason(reason: &str) -> Result<&str, EngineError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(DomainError::validation("adjustment reason cannot be empty").into());
    }
    Ok(reason)
}

/// Manually correct a raw material's on-hand quantity.
///
/// The only operation with a caller-supplied sign; it exists for physical
/// count corrections, so a reason is mandatory.
#[derive(Debug, Clone)]
pub struct AdjustMaterialStock {
    pub material_id: MaterialId,
    pub delta: f64,
    pub reason: String,
}

impl Operation for AdjustMaterialStock {
    type Receipt = AdjustmentReceipt;

    fn name(&self) -> &'static str {
        "adjust_material_stock"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<AdjustmentReceipt, EngineError> {
        let reason = validated_reason(&self.reason)?;
        let material = read_material(txn, self.material_id)?;
        let adjusted = material.adjust(self.delta)?;

        let log = MaterialLog::manual_adjustment(&adjusted, self.delta, reason);
        stage_material_update(txn, &adjusted, &log)?;

        Ok(AdjustmentReceipt {
            delta: self.delta,
            new_quantity: adjusted.quantity,
        })
    }
}

/// Manually correct a finished-goods quantity.
#[derive(Debug, Clone)]
pub struct AdjustInventoryStock {
    pub product_id: ProductId,
    pub delta: f64,
    pub reason: String,
}

impl Operation for AdjustInventoryStock {
    type Receipt = AdjustmentReceipt;

    fn name(&self) -> &'static str {
        "adjust_inventory_stock"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<AdjustmentReceipt, EngineError> {
        let reason = validated_reason(&self.reason)?;
        let item = read_inventory(txn, self.product_id)?.ok_or_else(|| {
            DomainError::not_found("inventory item", self.product_id)
        })?;
        let adjusted = item.adjust(self.delta)?;

        let log = InventoryLog::manual_adjustment(&adjusted, self.delta, reason);
        stage_inventory_update(txn, &adjusted, &log)?;

        Ok(AdjustmentReceipt {
            delta: self.delta,
            new_quantity: adjusted.quantity,
        })
    }
}
