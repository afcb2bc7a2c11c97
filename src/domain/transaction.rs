//! Recorded income and expense transactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{EntryKind, Identifiable, OwnedByUser, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: RecordId,
    pub user_id: RecordId,
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<RecordId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: RecordId,
        kind: EntryKind,
        category_id: RecordId,
        amount: f64,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            user_id,
            amount,
            description: description.into(),
            date,
            kind,
            category_id,
            wallet_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind.is_expense()
    }

    pub fn is_income(&self) -> bool {
        !self.kind.is_expense()
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl OwnedByUser for Transaction {
    fn user_id(&self) -> &RecordId {
        &self.user_id
    }
}

/// Fields accepted when recording a transaction.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub kind: EntryKind,
    pub category_id: RecordId,
    pub wallet_id: Option<RecordId>,
}

impl NewTransaction {
    pub fn into_transaction(self, user_id: RecordId) -> Transaction {
        let mut txn = Transaction::new(
            user_id,
            self.kind,
            self.category_id,
            self.amount,
            self.description,
            self.date,
        );
        txn.wallet_id = self.wallet_id;
        txn
    }
}

/// Partial update for a transaction. `wallet_id: Some(None)` detaches the wallet.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub kind: Option<EntryKind>,
    pub category_id: Option<RecordId>,
    pub wallet_id: Option<Option<RecordId>>,
}

impl TransactionPatch {
    pub fn apply(self, txn: &mut Transaction) {
        if let Some(amount) = self.amount {
            txn.amount = amount;
        }
        if let Some(description) = self.description {
            txn.description = description;
        }
        if let Some(date) = self.date {
            txn.date = date;
        }
        if let Some(kind) = self.kind {
            txn.kind = kind;
        }
        if let Some(category_id) = self.category_id {
            txn.category_id = category_id;
        }
        if let Some(wallet_id) = self.wallet_id {
            txn.wallet_id = wallet_id;
        }
        txn.updated_at = Utc::now();
    }
}

/// Loosely typed row produced by an importer (CSV, scanned bill, ...).
///
/// Missing pieces are resolved against the user's categories when imported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, rename = "type")]
    pub kind: Option<EntryKind>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
}
