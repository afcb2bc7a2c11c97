//! Monthly templates that the recurrence engine turns into transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryKind, Identifiable, OwnedByUser, RecordId};
use crate::domain::transaction::Transaction;

pub const MIN_DAY_OF_MONTH: u32 = 1;
pub const MAX_DAY_OF_MONTH: u32 = 31;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: RecordId,
    pub user_id: RecordId,
    pub amount: f64,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category_id: RecordId,
    pub day_of_month: u32,
    /// Timestamp of the last materialization; marks the calendar month already served.
    #[serde(default)]
    pub last_generated: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecurringTransaction {
    pub fn new(
        user_id: RecordId,
        kind: EntryKind,
        category_id: RecordId,
        amount: f64,
        description: impl Into<String>,
        day_of_month: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            user_id,
            amount,
            description: description.into(),
            kind,
            category_id,
            day_of_month,
            last_generated: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds the concrete transaction for an occurrence dated `at`.
    pub fn instantiate(&self, at: DateTime<Utc>) -> Transaction {
        let mut txn = Transaction::new(
            self.user_id.clone(),
            self.kind,
            self.category_id.clone(),
            self.amount,
            self.description.clone(),
            at,
        );
        txn.created_at = at;
        txn.updated_at = at;
        txn
    }

    /// Stamps the template as served for the month containing `at`.
    pub fn mark_generated(&mut self, at: DateTime<Utc>) {
        self.last_generated = Some(at);
        self.updated_at = at;
    }
}

impl Identifiable for RecurringTransaction {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl OwnedByUser for RecurringTransaction {
    fn user_id(&self) -> &RecordId {
        &self.user_id
    }
}

/// Fields accepted when creating a recurring template.
#[derive(Debug, Clone)]
pub struct NewRecurringTransaction {
    pub amount: f64,
    pub description: String,
    pub kind: EntryKind,
    pub category_id: RecordId,
    pub day_of_month: u32,
}
