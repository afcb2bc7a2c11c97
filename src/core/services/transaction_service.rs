//! Business logic helpers for recording and editing transactions.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::core::errors::{FinanceError, Result};
use crate::core::services::{
    require_positive, require_text, require_user, BudgetCheck, BudgetService,
};
use crate::domain::{
    EntryKind, ImportRow, Ledger, NewTransaction, RecordId, Transaction, TransactionPatch,
};

const IMPORTED_DESCRIPTION: &str = "Imported Transaction";

/// A stored transaction together with the budget check that followed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction: Transaction,
    pub budget: BudgetCheck,
}

/// Provides validated CRUD helpers for user transactions.
pub struct TransactionService;

impl TransactionService {
    /// Records a transaction, then evaluates the category budget for expenses.
    pub fn add(
        ledger: &mut Ledger,
        user_id: &RecordId,
        input: NewTransaction,
    ) -> Result<TransactionReceipt> {
        require_user(ledger, user_id)?;
        let input = Self::validate_new(input)?;
        let transaction = input.into_transaction(user_id.clone());
        ledger.transactions.push(transaction.clone());
        ledger.touch();
        info!(transaction_id = %transaction.id, kind = %transaction.kind, "transaction recorded");

        let budget = if transaction.is_expense() {
            BudgetService::evaluate(ledger, user_id, &transaction.category_id)
        } else {
            BudgetCheck::not_checked()
        };
        Ok(TransactionReceipt {
            transaction,
            budget,
        })
    }

    /// Records several transactions at once. Nothing is stored unless every
    /// entry validates.
    pub fn add_many(
        ledger: &mut Ledger,
        user_id: &RecordId,
        inputs: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>> {
        require_user(ledger, user_id)?;
        let created = inputs
            .into_iter()
            .enumerate()
            .map(|(idx, input)| {
                Self::validate_new(input)
                    .map(|valid| valid.into_transaction(user_id.clone()))
                    .map_err(|err| FinanceError::Validation(format!("entry {}: {err}", idx + 1)))
            })
            .collect::<Result<Vec<_>>>()?;
        ledger.transactions.extend(created.iter().cloned());
        ledger.touch();
        info!(count = created.len(), "transactions recorded in bulk");
        Ok(created)
    }

    /// Imports loosely typed rows, resolving categories by name.
    ///
    /// Unmatched category names fall back to the user's first category; a missing
    /// type is inferred from the amount's sign; a missing date becomes `now`.
    pub fn import(
        ledger: &mut Ledger,
        user_id: &RecordId,
        rows: Vec<ImportRow>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        require_user(ledger, user_id)?;
        if rows.is_empty() {
            return Err(FinanceError::Validation("nothing to import".into()));
        }
        let fallback = ledger
            .categories_for(user_id)
            .next()
            .map(|category| category.id.clone())
            .ok_or_else(|| {
                FinanceError::Validation("user has no categories to import into".into())
            })?;

        let inputs = rows
            .into_iter()
            .map(|row| {
                let category_id = row
                    .category
                    .as_deref()
                    .map(str::trim)
                    .and_then(|wanted| {
                        ledger
                            .categories_for(user_id)
                            .find(|category| category.name.eq_ignore_ascii_case(wanted))
                    })
                    .map(|category| category.id.clone())
                    .unwrap_or_else(|| fallback.clone());
                let kind = row.kind.unwrap_or(if row.amount < 0.0 {
                    EntryKind::Expense
                } else {
                    EntryKind::Income
                });
                let description = row
                    .description
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| IMPORTED_DESCRIPTION.to_string());
                NewTransaction {
                    amount: row.amount.abs(),
                    description,
                    date: row.date.unwrap_or(now),
                    kind,
                    category_id,
                    wallet_id: None,
                }
            })
            .collect();
        Self::add_many(ledger, user_id, inputs)
    }

    /// Applies `patch` to the transaction identified by `id`.
    pub fn update(
        ledger: &mut Ledger,
        user_id: &RecordId,
        id: &RecordId,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        if let Some(amount) = patch.amount {
            require_positive("amount", amount)?;
        }
        let patch = TransactionPatch {
            description: patch
                .description
                .as_deref()
                .map(|text| require_text("description", text))
                .transpose()?,
            ..patch
        };
        let txn = ledger
            .transaction_mut(user_id, id)
            .ok_or_else(|| FinanceError::TransactionNotFound(id.clone()))?;
        patch.apply(txn);
        let updated = txn.clone();
        ledger.touch();
        Ok(updated)
    }

    /// Removes the transaction identified by `id`, returning the removed instance.
    pub fn remove(ledger: &mut Ledger, user_id: &RecordId, id: &RecordId) -> Result<Transaction> {
        let position = ledger
            .transactions
            .iter()
            .position(|txn| &txn.id == id && &txn.user_id == user_id)
            .ok_or_else(|| FinanceError::TransactionNotFound(id.clone()))?;
        let removed = ledger.transactions.remove(position);
        ledger.touch();
        Ok(removed)
    }

    /// Returns a snapshot of the user's transactions in insertion order.
    pub fn list(ledger: &Ledger, user_id: &RecordId) -> Vec<Transaction> {
        ledger.transactions_for(user_id).cloned().collect()
    }

    fn validate_new(input: NewTransaction) -> Result<NewTransaction> {
        require_positive("amount", input.amount)?;
        let description = require_text("description", &input.description)?;
        Ok(NewTransaction {
            description,
            ..input
        })
    }
}
