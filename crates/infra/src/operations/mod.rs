//! Ledger operations (the write path).
//!
//! One module per business operation. Every operation follows the same
//! three-phase protocol against its transaction: read everything it depends
//! on, validate and compute through pure domain transitions, then stage the
//! full write set. The coordinator owns commit and retry; operation code
//! never sees a conflict.

pub mod adjustment;
pub mod catalog;
pub mod collection;
pub mod delivery;
pub mod expense;
pub mod production;
pub mod purchase;

pub use adjustment::{AdjustInventoryStock, AdjustMaterialStock, AdjustmentReceipt};
pub use catalog::{CancelOrder, CreateMaterial, CreateProduct, CreateSalesOrder, OrderReceipt};
pub use collection::{CollectPayment, CollectionReceipt};
pub use delivery::{DeliverOrder, DeliveredLine, DeliveryReceipt};
pub use expense::{ExpenseReceipt, RecordExpense};
pub use production::{ConsumedLine, ProductionReceipt, RunProduction};
pub use purchase::{PurchaseReceipt, ReceivePurchase};

use millbook_core::{ensure_same_org, DomainError};
use millbook_inventory::InventoryItem;
use millbook_materials::{MaterialId, RawMaterial};
use millbook_products::{Product, ProductId};
use millbook_receivables::{Receivable, ReceivableId};
use millbook_sales::{OrderId, SalesOrder};

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::txn::LedgerTxn;

/// One ledger operation: what to read, how to validate, what to write.
///
/// Implementations must be deterministic given the transaction's reads, and
/// must stay re-runnable: the coordinator calls `apply` once per commit
/// attempt against a fresh transaction.
pub trait Operation {
    type Receipt;

    /// Stable operation name for logs and retry-exhaustion errors.
    fn name(&self) -> &'static str;

    fn apply<S: LedgerStore>(&self, txn: &mut LedgerTxn<'_, S>)
        -> Result<Self::Receipt, EngineError>;
}

pub(crate) fn read_material<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    material_id: MaterialId,
) -> Result<RawMaterial, EngineError> {
    let material: RawMaterial = txn
        .read(Collection::RawMaterials, material_id.0)?
        .ok_or_else(|| DomainError::not_found("raw material", material_id))?;
    ensure_same_org(txn.tenant_id(), &material)?;
    Ok(material)
}

pub(crate) fn read_product<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    product_id: ProductId,
) -> Result<Product, EngineError> {
    let product: Product = txn
        .read(Collection::Products, product_id.0)?
        .ok_or_else(|| DomainError::not_found("product", product_id))?;
    ensure_same_org(txn.tenant_id(), &product)?;
    Ok(product)
}

pub(crate) fn read_inventory<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    product_id: ProductId,
) -> Result<Option<InventoryItem>, EngineError> {
    let item: Option<InventoryItem> = txn.read(Collection::InventoryItems, product_id.0)?;
    if let Some(item) = &item {
        ensure_same_org(txn.tenant_id(), item)?;
    }
    Ok(item)
}

pub(crate) fn read_order<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    order_id: OrderId,
) -> Result<SalesOrder, EngineError> {
    let order: SalesOrder = txn
        .read(Collection::SalesOrders, order_id.0)?
        .ok_or_else(|| DomainError::not_found("sales order", order_id))?;
    ensure_same_org(txn.tenant_id(), &order)?;
    Ok(order)
}

pub(crate) fn read_receivable<S: LedgerStore>(
    txn: &mut LedgerTxn<'_, S>,
    receivable_id: ReceivableId,
) -> Result<Receivable, EngineError> {
    let receivable: Receivable = txn
        .read(Collection::Receivables, receivable_id.0)?
        .ok_or_else(|| DomainError::not_found("receivable", receivable_id))?;
    ensure_same_org(txn.tenant_id(), &receivable)?;
    Ok(receivable)
}
