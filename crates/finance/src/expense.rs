use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millbook_core::{ensure_positive, DomainError, DomainResult, TenantId, TenantScoped};

/// Ledger record: one operating expense.
///
/// `spent_on` is the user-supplied expense date; the store assigns the commit
/// timestamp separately, so back-dated expenses keep their reporting date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub org_id: TenantId,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub spent_on: DateTime<Utc>,
}

impl Expense {
    pub fn record(
        org_id: TenantId,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        spent_on: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(DomainError::validation("expense category cannot be empty"));
        }
        let description = description.into().trim().to_string();
        if description.is_empty() {
            return Err(DomainError::validation(
                "expense description cannot be empty",
            ));
        }
        ensure_positive("expense amount", amount)?;

        Ok(Self {
            org_id,
            category,
            description,
            amount,
            spent_on,
        })
    }
}

impl TenantScoped for Expense {
    fn org_id(&self) -> TenantId {
        self.org_id
    }
}
