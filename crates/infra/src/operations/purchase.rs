use millbook_finance::CashflowEntry;
use millbook_materials::{MaterialId, MaterialLog};

use crate::audit::stage_material_update;
use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::operations::{read_material, Operation};
use crate::txn::LedgerTxn;

/// Roll a purchased batch into a raw material's stock and running average.
#[derive(Debug, Clone)]
pub struct ReceivePurchase {
    pub material_id: MaterialId,
    pub quantity: f64,
    pub total_cost: f64,
}

/// What a committed purchase changed.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub material_id: MaterialId,
    pub quantity: f64,
    pub unit_cost: f64,
    pub new_quantity: f64,
    pub new_average_cost: f64,
}

impl Operation for ReceivePurchase {
    type Receipt = PurchaseReceipt;

    fn name(&self) -> &'static str {
        "receive_purchase"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<PurchaseReceipt, EngineError> {
        let material = read_material(txn, self.material_id)?;
        let applied = material.receive_purchase(self.quantity, self.total_cost)?;

        let log = MaterialLog::purchase(
            &applied.material,
            self.quantity,
            self.total_cost,
            applied.unit_cost,
        );
        stage_material_update(txn, &applied.material, &log)?;

        let outflow = CashflowEntry::purchase(
            txn.tenant_id(),
            self.total_cost,
            &applied.material.name,
            self.quantity,
            applied.material.unit.as_str(),
        );
        txn.insert(Collection::CashflowEntries, &outflow)?;

        Ok(PurchaseReceipt {
            material_id: self.material_id,
            quantity: self.quantity,
            unit_cost: applied.unit_cost,
            new_quantity: applied.material.quantity,
            new_average_cost: applied.material.average_cost,
        })
    }
}
