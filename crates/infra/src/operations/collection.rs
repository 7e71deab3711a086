use millbook_finance::CashflowEntry;
use millbook_receivables::{CollectionRecord, ReceivableId, ReceivableStatus};

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::operations::{read_receivable, Operation};
use crate::txn::LedgerTxn;

/// Record a customer payment against a receivable.
#[derive(Debug, Clone)]
pub struct CollectPayment {
    pub receivable_id: ReceivableId,
    pub amount: f64,
}

/// What a committed collection changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionReceipt {
    pub receivable_id: ReceivableId,
    pub paid_amount: f64,
    pub due_amount: f64,
    pub status: ReceivableStatus,
    pub settled: bool,
}

impl Operation for CollectPayment {
    type Receipt = CollectionReceipt;

    fn name(&self) -> &'static str {
        "collect_payment"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<CollectionReceipt, EngineError> {
        let receivable = read_receivable(txn, self.receivable_id)?;
        let applied = receivable.apply_payment(self.amount)?;

        txn.put(
            Collection::Receivables,
            applied.receivable.id.0,
            &applied.receivable,
        )?;

        let record = CollectionRecord::payment(&applied.receivable, self.amount);
        txn.insert(Collection::Collections, &record)?;

        let inflow = CashflowEntry::collection(
            txn.tenant_id(),
            self.amount,
            &applied.receivable.customer_name,
            applied.receivable.order_id.0,
        );
        txn.insert(Collection::CashflowEntries, &inflow)?;

        Ok(CollectionReceipt {
            receivable_id: self.receivable_id,
            paid_amount: applied.receivable.paid_amount,
            due_amount: applied.receivable.due_amount,
            status: applied.receivable.status,
            settled: applied.settled,
        })
    }
}
