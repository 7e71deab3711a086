use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millbook_core::{
    ensure_positive, is_settled, DomainError, DomainResult, EntityId, TenantId, TenantScoped,
};
use millbook_sales::{OrderId, OrderStatus, SalesOrder};

/// Receivable identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceivableId(pub EntityId);

impl ReceivableId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ReceivableId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Receivable status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceivableStatus {
    Unpaid,
    Partial,
    Paid,
}

/// Standard payment term applied when a receivable is raised at delivery.
pub const PAYMENT_TERM_DAYS: i64 = 30;

/// Ledger entity: accounts receivable.
///
/// Invariant: `paid_amount + due_amount == total_amount` (within float
/// tolerance); `due_amount` never goes negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receivable {
    pub id: ReceivableId,
    pub org_id: TenantId,
    pub order_id: OrderId,
    pub customer_name: String,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub due_amount: f64,
    pub status: ReceivableStatus,
    pub issue_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

/// Result of applying a payment: the updated receivable plus whether the
/// payment settled it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentApplied {
    pub receivable: Receivable,
    pub settled: bool,
}

impl Receivable {
    /// Raise a receivable for a delivered order, due in [`PAYMENT_TERM_DAYS`].
    pub fn for_order(order: &SalesOrder, issued_at: DateTime<Utc>) -> DomainResult<Self> {
        if order.status != OrderStatus::Delivered {
            return Err(DomainError::validation(
                "receivable can only be raised for a delivered order",
            ));
        }

        Ok(Self {
            id: ReceivableId::new(EntityId::new()),
            org_id: order.org_id,
            order_id: order.id,
            customer_name: order.customer_name.clone(),
            total_amount: order.total_amount,
            paid_amount: 0.0,
            due_amount: order.total_amount,
            status: ReceivableStatus::Unpaid,
            issue_date: issued_at,
            due_date: issued_at + chrono::Duration::days(PAYMENT_TERM_DAYS),
        })
    }

    /// Apply a payment against the outstanding balance.
    ///
    /// Rejects amounts exceeding `due_amount`; balances within the settlement
    /// epsilon after payment flip the status to `Paid`.
    pub fn apply_payment(&self, amount: f64) -> DomainResult<PaymentApplied> {
        ensure_positive("payment amount", amount)?;
        if amount > self.due_amount {
            return Err(DomainError::payment_exceeds_due(amount, self.due_amount));
        }

        let mut receivable = self.clone();
        receivable.paid_amount = self.paid_amount + amount;
        receivable.due_amount = self.total_amount - receivable.paid_amount;
        let settled = is_settled(receivable.due_amount);
        receivable.status = if settled {
            ReceivableStatus::Paid
        } else {
            ReceivableStatus::Partial
        };

        Ok(PaymentApplied { receivable, settled })
    }

    pub fn is_outstanding(&self) -> bool {
        self.status != ReceivableStatus::Paid
    }
}

impl TenantScoped for Receivable {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}

/// Ledger record: one collection (payment received) against a receivable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionRecord {
    pub org_id: TenantId,
    pub receivable_id: ReceivableId,
    pub order_id: OrderId,
    pub customer_name: String,
    pub amount: f64,
}

impl CollectionRecord {
    pub fn payment(receivable: &Receivable, amount: f64) -> Self {
        Self {
            org_id: receivable.org_id,
            receivable_id: receivable.id,
            order_id: receivable.order_id,
            customer_name: receivable.customer_name.clone(),
            amount,
        }
    }
}

impl TenantScoped for CollectionRecord {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}

/// Aging bucket by days past due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    Current,
    Days1To30,
    Days31To60,
    Days61To90,
    Over90,
}

impl AgingBucket {
    /// Classify a due date relative to `as_of`. Whole days only; a receivable
    /// less than a full day past due still counts as current.
    pub fn classify(due_date: DateTime<Utc>, as_of: DateTime<Utc>) -> Self {
        let days_past_due = as_of.signed_duration_since(due_date).num_days();
        match days_past_due {
            i64::MIN..=0 => AgingBucket::Current,
            1..=30 => AgingBucket::Days1To30,
            31..=60 => AgingBucket::Days31To60,
            61..=90 => AgingBucket::Days61To90,
            _ => AgingBucket::Over90,
        }
    }
}

/// One aging bucket's totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AgingSlice {
    pub count: usize,
    pub outstanding: f64,
}

/// Aging report over outstanding receivables as of a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingReport {
    pub as_of: DateTime<Utc>,
    pub current: AgingSlice,
    pub days_1_to_30: AgingSlice,
    pub days_31_to_60: AgingSlice,
    pub days_61_to_90: AgingSlice,
    pub over_90: AgingSlice,
    pub total_outstanding: f64,
}

impl AgingReport {
    fn slice_mut(&mut self, bucket: AgingBucket) -> &mut AgingSlice {
        match bucket {
            AgingBucket::Current => &mut self.current,
            AgingBucket::Days1To30 => &mut self.days_1_to_30,
            AgingBucket::Days31To60 => &mut self.days_31_to_60,
            AgingBucket::Days61To90 => &mut self.days_61_to_90,
            AgingBucket::Over90 => &mut self.over_90,
        }
    }
}

/// Bucket every outstanding (unpaid or partial) receivable by days past due.
pub fn aging_report(receivables: &[Receivable], as_of: DateTime<Utc>) -> AgingReport {
    let mut report = AgingReport {
        as_of,
        current: AgingSlice::default(),
        days_1_to_30: AgingSlice::default(),
        days_31_to_60: AgingSlice::default(),
        days_61_to_90: AgingSlice::default(),
        over_90: AgingSlice::default(),
        total_outstanding: 0.0,
    };

    for receivable in receivables {
        if !receivable.is_outstanding() {
            continue;
        }
        let slice = report.slice_mut(AgingBucket::classify(receivable.due_date, as_of));
        slice.count += 1;
        slice.outstanding += receivable.due_amount;
        report.total_outstanding += receivable.due_amount;
    }

    report
}
