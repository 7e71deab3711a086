//! Tenant-scoped query read path.
//!
//! Request/response reads over the store: typed collection listings, audit
//! histories, low-stock and aging views, and the finance rollup. Queries
//! never mutate and never cross tenants; they read whatever the store holds
//! at call time without guards.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use millbook_core::{EntityId, TenantId};
use millbook_finance::{CashflowEntry, Expense};
use millbook_inventory::{InventoryItem, InventoryLog};
use millbook_materials::{MaterialId, MaterialLog, RawMaterial};
use millbook_products::{Product, ProductId, ProductionOrder};
use millbook_receivables::{aging_report, AgingReport, CollectionRecord, Receivable};
use millbook_sales::{OrderStatus, SalesOrder};

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore, StoredEntry};

/// A decoded document with its store metadata.
///
/// `recorded_at` is the commit timestamp of the write that produced the
/// document, which for append-only records is their creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<T> {
    pub id: EntityId,
    pub recorded_at: DateTime<Utc>,
    pub doc: T,
}

fn decode_entry<T: DeserializeOwned>(
    collection: Collection,
    entry: StoredEntry,
) -> Result<Recorded<T>, EngineError> {
    let doc = serde_json::from_value(entry.doc)
        .map_err(|e| EngineError::Codec(format!("decoding {collection}/{}: {e}", entry.id)))?;
    Ok(Recorded {
        id: entry.id,
        recorded_at: entry.recorded_at,
        doc,
    })
}

fn list_decoded<S: LedgerStore, T: DeserializeOwned>(
    store: &S,
    tenant_id: TenantId,
    collection: Collection,
) -> Result<Vec<Recorded<T>>, EngineError> {
    store
        .list(tenant_id, collection)?
        .into_iter()
        .map(|entry| decode_entry(collection, entry))
        .collect()
}

pub fn list_materials<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<RawMaterial>>, EngineError> {
    list_decoded(store, tenant_id, Collection::RawMaterials)
}

pub fn list_products<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<Product>>, EngineError> {
    list_decoded(store, tenant_id, Collection::Products)
}

pub fn list_inventory<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<InventoryItem>>, EngineError> {
    list_decoded(store, tenant_id, Collection::InventoryItems)
}

pub fn list_orders<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<SalesOrder>>, EngineError> {
    list_decoded(store, tenant_id, Collection::SalesOrders)
}

pub fn list_production_orders<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<ProductionOrder>>, EngineError> {
    list_decoded(store, tenant_id, Collection::ProductionOrders)
}

pub fn list_receivables<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<Receivable>>, EngineError> {
    list_decoded(store, tenant_id, Collection::Receivables)
}

pub fn list_collections<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<CollectionRecord>>, EngineError> {
    list_decoded(store, tenant_id, Collection::Collections)
}

pub fn list_cashflow<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<CashflowEntry>>, EngineError> {
    list_decoded(store, tenant_id, Collection::CashflowEntries)
}

pub fn list_expenses<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<Expense>>, EngineError> {
    list_decoded(store, tenant_id, Collection::Expenses)
}

/// One material's audit trail, in commit order.
pub fn material_history<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
    material_id: MaterialId,
) -> Result<Vec<Recorded<MaterialLog>>, EngineError> {
    Ok(
        list_decoded::<S, MaterialLog>(store, tenant_id, Collection::MaterialLogs)?
            .into_iter()
            .filter(|entry| entry.doc.material_id == material_id)
            .collect(),
    )
}

/// One finished-goods item's audit trail, in commit order.
pub fn inventory_history<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
    product_id: ProductId,
) -> Result<Vec<Recorded<InventoryLog>>, EngineError> {
    Ok(
        list_decoded::<S, InventoryLog>(store, tenant_id, Collection::InventoryLogs)?
            .into_iter()
            .filter(|entry| entry.doc.product_id == product_id)
            .collect(),
    )
}

/// Materials at or below their reorder threshold.
pub fn low_stock_materials<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<Vec<Recorded<RawMaterial>>, EngineError> {
    Ok(list_materials(store, tenant_id)?
        .into_iter()
        .filter(|entry| entry.doc.is_low_stock())
        .collect())
}

/// Outstanding receivables bucketed by days past due.
pub fn receivable_aging<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
    as_of: DateTime<Utc>,
) -> Result<AgingReport, EngineError> {
    let receivables: Vec<Receivable> = list_receivables(store, tenant_id)?
        .into_iter()
        .map(|entry| entry.doc)
        .collect();
    Ok(aging_report(&receivables, as_of))
}

/// Point-in-time financial rollup across one tenant's ledger.
///
/// Revenue and COGS come from delivered orders only; pending and cancelled
/// orders have recognized nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub revenue: f64,
    pub cogs: f64,
    pub gross_profit: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub material_value: f64,
    pub finished_goods_value: f64,
    pub outstanding_receivables: f64,
    pub working_capital: f64,
}

pub fn finance_summary<S: LedgerStore>(
    store: &S,
    tenant_id: TenantId,
) -> Result<FinanceSummary, EngineError> {
    let mut revenue = 0.0;
    let mut cogs = 0.0;
    for order in list_orders(store, tenant_id)? {
        if order.doc.status == OrderStatus::Delivered {
            revenue += order.doc.total_amount;
            cogs += order.doc.total_cost.unwrap_or(0.0);
        }
    }

    let total_expenses: f64 = list_expenses(store, tenant_id)?
        .iter()
        .map(|entry| entry.doc.amount)
        .sum();
    let material_value: f64 = list_materials(store, tenant_id)?
        .iter()
        .map(|entry| entry.doc.quantity * entry.doc.average_cost)
        .sum();
    let finished_goods_value: f64 = list_inventory(store, tenant_id)?
        .iter()
        .map(|entry| entry.doc.quantity * entry.doc.average_cost)
        .sum();
    let outstanding_receivables: f64 = list_receivables(store, tenant_id)?
        .iter()
        .filter(|entry| entry.doc.is_outstanding())
        .map(|entry| entry.doc.due_amount)
        .sum();

    let gross_profit = revenue - cogs;
    Ok(FinanceSummary {
        revenue,
        cogs,
        gross_profit,
        total_expenses,
        net_profit: gross_profit - total_expenses,
        material_value,
        finished_goods_value,
        outstanding_receivables,
        working_capital: material_value + finished_goods_value + outstanding_receivables,
    })
}
