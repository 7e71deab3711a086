use serde::{Deserialize, Serialize};

use millbook_core::{EntityId, TenantId, TenantScoped};

use crate::expense::Expense;

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashflowKind {
    Inflow,
    Outflow,
}

/// What the cash moved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashflowCategory {
    Purchase,
    Collection,
    Expense,
}

/// Ledger record: one cash movement, appended in the same commit as the
/// operation that moved the cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowEntry {
    pub org_id: TenantId,
    pub kind: CashflowKind,
    pub category: CashflowCategory,
    pub amount: f64,
    pub description: String,
}

impl CashflowEntry {
    /// Outflow for a material purchase.
    pub fn purchase(
        org_id: TenantId,
        amount: f64,
        material_name: &str,
        quantity: f64,
        unit: &str,
    ) -> Self {
        Self {
            org_id,
            kind: CashflowKind::Outflow,
            category: CashflowCategory::Purchase,
            amount,
            description: format!("Purchase: {material_name} ({quantity} {unit})"),
        }
    }

    /// Inflow for a payment collected against a receivable.
    pub fn collection(
        org_id: TenantId,
        amount: f64,
        customer_name: &str,
        order_id: EntityId,
    ) -> Self {
        Self {
            org_id,
            kind: CashflowKind::Inflow,
            category: CashflowCategory::Collection,
            amount,
            description: format!("Collection from {customer_name} for Order {order_id}"),
        }
    }

    /// Outflow for an operating expense.
    pub fn expense(expense: &Expense) -> Self {
        Self {
            org_id: expense.org_id,
            kind: CashflowKind::Outflow,
            category: CashflowCategory::Expense,
            amount: expense.amount,
            description: format!("Expense: {} ({})", expense.description, expense.category),
        }
    }
}

impl TenantScoped for CashflowEntry {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}
