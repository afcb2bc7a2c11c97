//! Recurring template management and on-demand materialization.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::core::errors::{FinanceError, Result};
use crate::core::recurrence::{self, RecurrencePolicy};
use crate::core::services::{require_positive, require_text, require_user};
use crate::domain::recurring::{MAX_DAY_OF_MONTH, MIN_DAY_OF_MONTH};
use crate::domain::{Ledger, NewRecurringTransaction, RecordId, RecurringTransaction, Transaction};

pub struct RecurringService;

impl RecurringService {
    /// Stores a new template. It has never been materialized, so it becomes due
    /// on its day of month in the current month.
    pub fn create(
        ledger: &mut Ledger,
        user_id: &RecordId,
        input: NewRecurringTransaction,
    ) -> Result<RecurringTransaction> {
        require_user(ledger, user_id)?;
        require_positive("amount", input.amount)?;
        let description = require_text("description", &input.description)?;
        if !(MIN_DAY_OF_MONTH..=MAX_DAY_OF_MONTH).contains(&input.day_of_month) {
            return Err(FinanceError::Validation(format!(
                "day of month must be between {MIN_DAY_OF_MONTH} and {MAX_DAY_OF_MONTH}"
            )));
        }

        let template = RecurringTransaction::new(
            user_id.clone(),
            input.kind,
            input.category_id,
            input.amount,
            description,
            input.day_of_month,
        );
        ledger.recurring_transactions.push(template.clone());
        ledger.touch();
        info!(
            recurring_id = %template.id,
            day_of_month = template.day_of_month,
            "recurring transaction created"
        );
        Ok(template)
    }

    pub fn remove(
        ledger: &mut Ledger,
        user_id: &RecordId,
        id: &RecordId,
    ) -> Result<RecurringTransaction> {
        let position = ledger
            .recurring_transactions
            .iter()
            .position(|rt| &rt.id == id && &rt.user_id == user_id)
            .ok_or_else(|| FinanceError::RecurringNotFound(id.clone()))?;
        let removed = ledger.recurring_transactions.remove(position);
        ledger.touch();
        Ok(removed)
    }

    pub fn list(ledger: &Ledger, user_id: &RecordId) -> Vec<RecurringTransaction> {
        ledger.recurring_for(user_id).cloned().collect()
    }

    /// Runs the recurrence engine for one user.
    pub fn process(
        ledger: &mut Ledger,
        user_id: &RecordId,
        as_of: DateTime<Utc>,
        policy: RecurrencePolicy,
    ) -> Vec<Transaction> {
        recurrence::materialize_due(ledger, user_id, as_of, policy)
    }
}
