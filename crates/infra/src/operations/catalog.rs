use chrono::Utc;

use millbook_materials::{MaterialId, RawMaterial, Unit};
use millbook_products::{BomLine, Product, ProductId};
use millbook_sales::{OrderId, OrderLine, SalesOrder};

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::operations::{read_order, Operation};
use crate::txn::LedgerTxn;

/// Catalog a new raw material at zero stock.
#[derive(Debug, Clone)]
pub struct CreateMaterial {
    pub name: String,
    pub unit: Unit,
    pub min_stock: f64,
}

impl Operation for CreateMaterial {
    type Receipt = MaterialId;

    fn name(&self) -> &'static str {
        "create_material"
    }

    fn apply<S: LedgerStore>(&self, txn: &mut LedgerTxn<'_, S>) -> Result<MaterialId, EngineError> {
        let material = RawMaterial::create(
            txn.tenant_id(),
            &self.name,
            self.unit,
            self.min_stock,
            Utc::now(),
        )?;
        txn.put(Collection::RawMaterials, material.id.0, &material)?;
        Ok(material.id)
    }
}

/// Catalog a new product with its bill of materials.
///
/// BOM lines are taken as given; a dangling material reference surfaces as
/// `NotFound` at production time, not here.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub unit_price: f64,
    pub bom: Vec<BomLine>,
}

impl Operation for CreateProduct {
    type Receipt = ProductId;

    fn name(&self) -> &'static str {
        "create_product"
    }

    fn apply<S: LedgerStore>(&self, txn: &mut LedgerTxn<'_, S>) -> Result<ProductId, EngineError> {
        let product = Product::create(
            txn.tenant_id(),
            &self.name,
            self.unit_price,
            self.bom.clone(),
            Utc::now(),
        )?;
        txn.put(Collection::Products, product.id.0, &product)?;
        Ok(product.id)
    }
}

/// Open a pending sales order.
#[derive(Debug, Clone)]
pub struct CreateSalesOrder {
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
}

/// What a committed order creation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total_amount: f64,
}

impl Operation for CreateSalesOrder {
    type Receipt = OrderReceipt;

    fn name(&self) -> &'static str {
        "create_sales_order"
    }

    fn apply<S: LedgerStore>(&self, txn: &mut LedgerTxn<'_, S>) -> Result<OrderReceipt, EngineError> {
        let order = SalesOrder::create(
            txn.tenant_id(),
            &self.customer_name,
            self.lines.clone(),
            Utc::now(),
        )?;
        txn.put(Collection::SalesOrders, order.id.0, &order)?;
        Ok(OrderReceipt {
            order_id: order.id,
            total_amount: order.total_amount,
        })
    }
}

/// Cancel a pending sales order. Nothing has moved yet, so no stock or
/// receivable is touched.
#[derive(Debug, Clone)]
pub struct CancelOrder {
    pub order_id: OrderId,
}

impl Operation for CancelOrder {
    type Receipt = ();

    fn name(&self) -> &'static str {
        "cancel_order"
    }

    fn apply<S: LedgerStore>(&self, txn: &mut LedgerTxn<'_, S>) -> Result<(), EngineError> {
        let order = read_order(txn, self.order_id)?;
        let cancelled = order.cancel()?;
        txn.put(Collection::SalesOrders, cancelled.id.0, &cancelled)?;
        Ok(())
    }
}
