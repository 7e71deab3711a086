use chrono::{DateTime, Utc};

use millbook_core::DomainError;
use millbook_inventory::InventoryLog;
use millbook_products::ProductId;
use millbook_receivables::{Receivable, ReceivableId};
use millbook_sales::{OrderId, OrderStatus};

use crate::audit::stage_inventory_update;
use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::operations::{read_inventory, read_order, Operation};
use crate::txn::LedgerTxn;

/// Deliver a pending sales order: deduct finished goods, capture COGS at the
/// moment of delivery, raise the receivable.
///
/// Delivery is all-or-nothing across the order's lines; one short line fails
/// the whole order and nothing moves.
#[derive(Debug, Clone)]
pub struct DeliverOrder {
    pub order_id: OrderId,
}

/// One order line's stock deduction.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveredLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: f64,
    pub line_cogs: f64,
}

/// What a committed delivery changed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReceipt {
    pub order_id: OrderId,
    pub receivable_id: ReceivableId,
    pub total_cogs: f64,
    pub due_date: DateTime<Utc>,
    pub lines: Vec<DeliveredLine>,
}

impl Operation for DeliverOrder {
    type Receipt = DeliveryReceipt;

    fn name(&self) -> &'static str {
        "deliver_order"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<DeliveryReceipt, EngineError> {
        let order = read_order(txn, self.order_id)?;
        if order.status != OrderStatus::Pending {
            return Err(DomainError::validation(format!(
                "order is not pending (status: {:?})",
                order.status
            ))
            .into());
        }

        // Read and deduct each line's finished-goods item; the cost charged
        // per line is the average cost on hand right now.
        let mut total_cogs = 0.0;
        let mut lines = Vec::with_capacity(order.lines.len());
        let mut updated_items = Vec::with_capacity(order.lines.len());
        for line in &order.lines {
            let item = read_inventory(txn, line.product_id)?.ok_or_else(|| {
                DomainError::insufficient_stock(line.product_name.clone(), line.quantity, 0.0)
            })?;
            let updated = item.deliver(line.quantity)?;
            let line_cogs = item.average_cost * line.quantity;
            total_cogs += line_cogs;
            lines.push(DeliveredLine {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                line_cogs,
            });
            updated_items.push(updated);
        }

        let now = Utc::now();
        let delivered = order.mark_delivered(total_cogs, now)?;
        let receivable = Receivable::for_order(&delivered, now)?;

        txn.put(Collection::SalesOrders, delivered.id.0, &delivered)?;
        txn.put(Collection::Receivables, receivable.id.0, &receivable)?;
        for (updated, line) in updated_items.iter().zip(&lines) {
            let log =
                InventoryLog::sale_delivery(updated, line.quantity, line.line_cogs, delivered.id.0);
            stage_inventory_update(txn, updated, &log)?;
        }

        Ok(DeliveryReceipt {
            order_id: self.order_id,
            receivable_id: receivable.id,
            total_cogs,
            due_date: receivable.due_date,
            lines,
        })
    }
}
