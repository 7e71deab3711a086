use chrono::Utc;

use millbook_core::{ensure_same_org, DomainError, EntityId};
use millbook_costing::unit_cost;
use millbook_inventory::{InventoryItem, InventoryLog};
use millbook_materials::{MaterialId, MaterialLog, RawMaterial};
use millbook_products::{ProductId, ProductionOrder};

use crate::audit::{stage_inventory_update, stage_material_update};
use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::operations::{read_inventory, read_product, Operation};
use crate::txn::LedgerTxn;

/// Convert raw materials into finished goods through a product's bill of
/// materials.
///
/// Every required material is consumed at its current average cost; the
/// batch lands in finished-goods inventory at the summed cost. Either every
/// requirement is satisfiable or nothing moves.
#[derive(Debug, Clone)]
pub struct RunProduction {
    pub product_id: ProductId,
    pub quantity: f64,
}

/// One material drawn down by a production run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedLine {
    pub material_id: MaterialId,
    pub material_name: String,
    pub consumed: f64,
    pub unit_cost: f64,
    pub line_cost: f64,
}

/// What a committed production run changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionReceipt {
    pub production_order_id: EntityId,
    pub product_id: ProductId,
    pub quantity: f64,
    pub total_cost: f64,
    pub unit_cost: f64,
    pub consumed: Vec<ConsumedLine>,
    pub new_stock: f64,
    pub new_average_cost: f64,
}

impl Operation for RunProduction {
    type Receipt = ProductionReceipt;

    fn name(&self) -> &'static str {
        "run_production"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<ProductionReceipt, EngineError> {
        let product = read_product(txn, self.product_id)?;
        let requirements = product.requirements(self.quantity)?;

        // Read phase: every required material, then the finished-goods item.
        let mut materials = Vec::with_capacity(requirements.len());
        for requirement in &requirements {
            let material: RawMaterial = txn
                .read(Collection::RawMaterials, requirement.material_id.0)?
                .ok_or_else(|| {
                    DomainError::not_found("raw material", &requirement.material_name)
                })?;
            ensure_same_org(txn.tenant_id(), &material)?;
            materials.push(material);
        }
        let existing_item = read_inventory(txn, self.product_id)?;

        // Consume each requirement at the material's current average cost.
        let mut total_cost = 0.0;
        let mut consumed = Vec::with_capacity(requirements.len());
        let mut updated_materials = Vec::with_capacity(requirements.len());
        for (requirement, material) in requirements.iter().zip(&materials) {
            let material_unit_cost = material.average_cost;
            let updated = material.consume(requirement.required)?;
            let line_cost = requirement.required * material_unit_cost;
            total_cost += line_cost;
            consumed.push(ConsumedLine {
                material_id: material.id,
                material_name: material.name.clone(),
                consumed: requirement.required,
                unit_cost: material_unit_cost,
                line_cost,
            });
            updated_materials.push(updated);
        }
        let batch_unit_cost = unit_cost(total_cost, self.quantity);

        let item = match &existing_item {
            Some(item) => item.receive_batch(self.quantity, total_cost)?,
            None => InventoryItem::first_batch(&product, self.quantity, total_cost, Utc::now())?,
        };

        // Write phase: material pairs, the finished-goods pair, the run record.
        for (updated, line) in updated_materials.iter().zip(&consumed) {
            let log = MaterialLog::production_use(updated, line.consumed, &product.name);
            stage_material_update(txn, updated, &log)?;
        }
        let item_log = InventoryLog::production(&item, self.quantity, total_cost);
        stage_inventory_update(txn, &item, &item_log)?;

        let run = ProductionOrder::completed(&product, self.quantity, total_cost, batch_unit_cost);
        let production_order_id = txn.insert(Collection::ProductionOrders, &run)?;

        Ok(ProductionReceipt {
            production_order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            total_cost,
            unit_cost: batch_unit_cost,
            consumed,
            new_stock: item.quantity,
            new_average_cost: item.average_cost,
        })
    }
}
