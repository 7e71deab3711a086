//! Receivables domain module.
//!
//! Accounts receivable raised at delivery, payment application with the
//! settlement epsilon, and the aging report. Pure domain logic (no IO,
//! no storage).

pub mod receivable;

pub use receivable::{
    aging_report, AgingBucket, AgingReport, AgingSlice, CollectionRecord, PaymentApplied,
    Receivable, ReceivableId, ReceivableStatus, PAYMENT_TERM_DAYS,
};
