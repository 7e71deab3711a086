use chrono::{DateTime, Utc};

use millbook_core::EntityId;
use millbook_finance::{CashflowEntry, Expense};

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, LedgerStore};
use crate::operations::Operation;
use crate::txn::LedgerTxn;

/// Record an operating expense with its paired cash outflow.
#[derive(Debug, Clone)]
pub struct RecordExpense {
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub spent_on: DateTime<Utc>,
}

/// What a committed expense produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseReceipt {
    pub expense_id: EntityId,
    pub amount: f64,
}

impl Operation for RecordExpense {
    type Receipt = ExpenseReceipt;

    fn name(&self) -> &'static str {
        "record_expense"
    }

    fn apply<S: LedgerStore>(
        &self,
        txn: &mut LedgerTxn<'_, S>,
    ) -> Result<ExpenseReceipt, EngineError> {
        let expense = Expense::record(
            txn.tenant_id(),
            &self.category,
            &self.description,
            self.amount,
            self.spent_on,
        )?;
        let expense_id = txn.insert(Collection::Expenses, &expense)?;

        let outflow = CashflowEntry::expense(&expense);
        txn.insert(Collection::CashflowEntries, &outflow)?;

        Ok(ExpenseReceipt {
            expense_id,
            amount: expense.amount,
        })
    }
}
