use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millbook_core::{
    ensure_positive, DomainError, DomainResult, EntityId, TenantId, TenantScoped,
};
use millbook_costing::{unit_cost, weighted_average};
use millbook_products::{Product, ProductId};

/// Ledger entity: finished-goods stock for one product.
///
/// There is exactly one item per product; the document is keyed by the
/// product id and created by the first production run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: ProductId,
    pub org_id: TenantId,
    pub product_name: String,
    pub quantity: f64,
    pub average_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Store document key: finished goods are keyed by product.
    pub fn doc_id(&self) -> EntityId {
        self.product_id.0
    }

    /// First batch for a product with no stock on hand yet.
    pub fn first_batch(
        product: &Product,
        quantity: f64,
        total_cost: f64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_positive("batch quantity", quantity)?;

        Ok(Self {
            product_id: product.id,
            org_id: product.org_id,
            product_name: product.name.clone(),
            quantity,
            average_cost: unit_cost(total_cost, quantity),
            created_at,
        })
    }

    /// Roll a produced batch into the running average.
    pub fn receive_batch(&self, quantity: f64, total_cost: f64) -> DomainResult<Self> {
        ensure_positive("batch quantity", quantity)?;

        let roll = weighted_average(
            self.quantity,
            self.average_cost,
            quantity,
            unit_cost(total_cost, quantity),
        );

        let mut item = self.clone();
        item.quantity = roll.quantity;
        item.average_cost = roll.average_cost;
        Ok(item)
    }

    /// Deduct a delivered quantity. Cost is captured by the caller from the
    /// average at delivery time; delivery itself never changes the average.
    pub fn deliver(&self, quantity: f64) -> DomainResult<Self> {
        ensure_positive("delivery quantity", quantity)?;
        if self.quantity < quantity {
            return Err(DomainError::insufficient_stock(
                self.product_name.clone(),
                quantity,
                self.quantity,
            ));
        }

        let mut item = self.clone();
        item.quantity -= quantity;
        Ok(item)
    }

    /// Apply a signed manual correction.
    pub fn adjust(&self, delta: f64) -> DomainResult<Self> {
        if !delta.is_finite() {
            return Err(DomainError::validation("adjustment must be finite"));
        }
        if delta == 0.0 {
            return Err(DomainError::validation("adjustment cannot be zero"));
        }

        let new_quantity = self.quantity + delta;
        if new_quantity < 0.0 {
            return Err(DomainError::insufficient_stock(
                self.product_name.clone(),
                -delta,
                self.quantity,
            ));
        }

        let mut item = self.clone();
        item.quantity = new_quantity;
        Ok(item)
    }
}

impl TenantScoped for InventoryItem {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}

/// Movement type recorded against a finished-goods item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryLogKind {
    Production,
    SaleDelivery,
    ManualAdd,
    ManualDeduct,
}

/// Audit record: one per finished-goods mutation, appended in the same
/// commit. Identity and timestamp are store-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLog {
    pub org_id: TenantId,
    pub product_id: ProductId,
    pub product_name: String,
    pub kind: InventoryLogKind,
    pub quantity_change: f64,
    pub total_cost: Option<f64>,
    pub related_order_id: Option<EntityId>,
    pub reason: Option<String>,
    pub new_quantity: f64,
    pub new_average_cost: f64,
}

impl InventoryLog {
    /// Produced batch rolled in (`+quantity`, at `total_cost`).
    pub fn production(item: &InventoryItem, quantity: f64, total_cost: f64) -> Self {
        Self {
            org_id: item.org_id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            kind: InventoryLogKind::Production,
            quantity_change: quantity,
            total_cost: Some(total_cost),
            related_order_id: None,
            reason: None,
            new_quantity: item.quantity,
            new_average_cost: item.average_cost,
        }
    }

    /// Delivery deduction (`-quantity`) with the cost recognized for the line
    /// and a reference back to the sales order.
    pub fn sale_delivery(
        item: &InventoryItem,
        quantity: f64,
        cogs: f64,
        order_id: EntityId,
    ) -> Self {
        Self {
            org_id: item.org_id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            kind: InventoryLogKind::SaleDelivery,
            quantity_change: -quantity,
            total_cost: Some(cogs),
            related_order_id: Some(order_id),
            reason: None,
            new_quantity: item.quantity,
            new_average_cost: item.average_cost,
        }
    }

    /// Manual correction; the kind follows the sign of `delta`.
    pub fn manual_adjustment(item: &InventoryItem, delta: f64, reason: &str) -> Self {
        let kind = if delta >= 0.0 {
            InventoryLogKind::ManualAdd
        } else {
            InventoryLogKind::ManualDeduct
        };
        Self {
            org_id: item.org_id,
            product_id: item.product_id,
            product_name: item.product_name.clone(),
            kind,
            quantity_change: delta,
            total_cost: None,
            related_order_id: None,
            reason: Some(reason.to_string()),
            new_quantity: item.quantity,
            new_average_cost: item.average_cost,
        }
    }
}

impl TenantScoped for InventoryLog {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}
