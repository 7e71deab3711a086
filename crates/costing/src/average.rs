//! Weighted-average cost computation.

use serde::{Deserialize, Serialize};

/// Quantity and running average cost after rolling an inbound batch in.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRoll {
    pub quantity: f64,
    pub average_cost: f64,
}

impl CostRoll {
    /// Total value carried at this quantity and average cost.
    pub fn total_value(&self) -> f64 {
        self.quantity * self.average_cost
    }
}

/// Roll an inbound batch into a running weighted average.
///
/// ```text
/// new_total_value = current_qty * current_avg_cost + incoming_qty * incoming_unit_cost
/// new_qty         = current_qty + incoming_qty
/// new_avg_cost    = new_qty > 0 ? new_total_value / new_qty : 0
/// ```
///
/// A zero resulting quantity yields a zero average cost by definition, not an
/// error. Applies identically to raw-material purchases and finished-goods
/// production batches.
pub fn weighted_average(
    current_qty: f64,
    current_avg_cost: f64,
    incoming_qty: f64,
    incoming_unit_cost: f64,
) -> CostRoll {
    let new_total_value = current_qty * current_avg_cost + incoming_qty * incoming_unit_cost;
    let new_qty = current_qty + incoming_qty;
    let average_cost = if new_qty > 0.0 {
        new_total_value / new_qty
    } else {
        0.0
    };

    CostRoll {
        quantity: new_qty,
        average_cost,
    }
}

/// Per-unit cost of a batch: `total / qty`, or 0 when the quantity is not
/// positive.
pub fn unit_cost(total_cost: f64, quantity: f64) -> f64 {
    if quantity > 0.0 {
        total_cost / quantity
    } else {
        0.0
    }
}
