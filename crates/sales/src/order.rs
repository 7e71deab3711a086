use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millbook_core::{
    ensure_non_negative, ensure_positive, DomainError, DomainResult, EntityId, TenantId,
    TenantScoped,
};
use millbook_products::ProductId;

/// Sales order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub EntityId);

impl OrderId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Sales order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

/// Order line: product, quantity, unit price agreed at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Ledger entity: sales order.
///
/// `total_cost` is the aggregate COGS, set exactly once when the order is
/// delivered; the sale price is fixed at creation, the cost at delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: OrderId,
    pub org_id: TenantId,
    pub customer_name: String,
    pub lines: Vec<OrderLine>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub total_cost: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl SalesOrder {
    /// Create a pending order; `total_amount` is derived from the lines.
    pub fn create(
        org_id: TenantId,
        customer_name: impl Into<String>,
        lines: Vec<OrderLine>,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let customer_name = customer_name.into().trim().to_string();
        if customer_name.is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }
        if lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }
        for line in &lines {
            ensure_positive("line quantity", line.quantity)?;
            ensure_non_negative("unit price", line.unit_price)?;
            if line.product_name.trim().is_empty() {
                return Err(DomainError::validation("product name cannot be empty"));
            }
        }
        // Two lines for the same product would collapse into one inventory
        // write at delivery time, losing the first deduction.
        for (idx, line) in lines.iter().enumerate() {
            if lines[..idx].iter().any(|l| l.product_id == line.product_id) {
                return Err(DomainError::validation(format!(
                    "duplicate product in order lines: {}",
                    line.product_name
                )));
            }
        }

        let total_amount = lines.iter().map(OrderLine::amount).sum();

        Ok(Self {
            id: OrderId::new(EntityId::new()),
            org_id,
            customer_name,
            lines,
            total_amount,
            status: OrderStatus::Pending,
            total_cost: None,
            created_at,
            delivered_at: None,
        })
    }

    fn ensure_pending(&self) -> DomainResult<()> {
        if self.status != OrderStatus::Pending {
            return Err(DomainError::validation(format!(
                "order is not pending (status: {:?})",
                self.status
            )));
        }
        Ok(())
    }

    /// Transition to delivered, recording the aggregate COGS.
    pub fn mark_delivered(&self, total_cost: f64, delivered_at: DateTime<Utc>) -> DomainResult<Self> {
        self.ensure_pending()?;
        ensure_non_negative("total cost", total_cost)?;

        let mut order = self.clone();
        order.status = OrderStatus::Delivered;
        order.total_cost = Some(total_cost);
        order.delivered_at = Some(delivered_at);
        Ok(order)
    }

    /// Transition to cancelled. Only pending orders can be cancelled; nothing
    /// has moved yet, so no stock or receivable is touched.
    pub fn cancel(&self) -> DomainResult<Self> {
        self.ensure_pending()?;

        let mut order = self.clone();
        order.status = OrderStatus::Cancelled;
        Ok(order)
    }
}

impl TenantScoped for SalesOrder {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn test_tenant_id() -> TenantId {
        TenantId::new()
    }

    fn line(name: &str, quantity: f64, unit_price: f64) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(EntityId::new()),
            product_name: name.to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn create_computes_total_amount() {
        let order = SalesOrder::create(
            test_tenant_id(),
            "Acme Retail",
            vec![line("Widget", 5.0, 200.0), line("Gadget", 2.0, 50.0)],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(order.total_amount, 1100.0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_cost, None);
    }

    #[test]
    fn create_validates_customer_lines_and_duplicates() {
        let tenant_id = test_tenant_id();
        assert!(SalesOrder::create(tenant_id, " ", vec![line("W", 1.0, 1.0)], Utc::now()).is_err());
        assert!(SalesOrder::create(tenant_id, "Acme", vec![], Utc::now()).is_err());
        assert!(
            SalesOrder::create(tenant_id, "Acme", vec![line("W", 0.0, 1.0)], Utc::now()).is_err()
        );
        assert!(
            SalesOrder::create(tenant_id, "Acme", vec![line("W", 1.0, -1.0)], Utc::now()).is_err()
        );

        let shared = line("Widget", 1.0, 10.0);
        let mut dup = shared.clone();
        dup.quantity = 2.0;
        assert!(SalesOrder::create(tenant_id, "Acme", vec![shared, dup], Utc::now()).is_err());
    }

    #[test]
    fn deliver_sets_cost_exactly_once() {
        let order = SalesOrder::create(
            test_tenant_id(),
            "Acme Retail",
            vec![line("Widget", 5.0, 200.0)],
            Utc::now(),
        )
        .unwrap();

        let delivered = order.mark_delivered(533.33, Utc::now()).unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        assert_eq!(delivered.total_cost, Some(533.33));
        assert!(delivered.delivered_at.is_some());

        // A delivered order cannot be delivered or cancelled again.
        assert!(delivered.mark_delivered(1.0, Utc::now()).is_err());
        assert!(delivered.cancel().is_err());
    }

    #[test]
    fn cancel_only_from_pending() {
        let order = SalesOrder::create(
            test_tenant_id(),
            "Acme Retail",
            vec![line("Widget", 5.0, 200.0)],
            Utc::now(),
        )
        .unwrap();

        let cancelled = order.cancel().unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(cancelled.mark_delivered(1.0, Utc::now()).is_err());
    }
}
