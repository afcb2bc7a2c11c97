use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    category::Category,
    common::{Identifiable, OwnedByUser, RecordId},
    goal::Goal,
    recurring::RecurringTransaction,
    transaction::Transaction,
    user::User,
    wallet::Wallet,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Complete persisted state: every user together with the records they own.
///
/// Collections are append-only in order; removal never reorders survivors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub recurring_transactions: Vec<RecurringTransaction>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub wallets: Vec<Wallet>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            updated_at: Utc::now(),
            users: Vec::new(),
            transactions: Vec::new(),
            categories: Vec::new(),
            recurring_transactions: Vec::new(),
            goals: Vec::new(),
            wallets: Vec::new(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn user(&self, id: &RecordId) -> Option<&User> {
        self.users.iter().find(|user| &user.id == id)
    }

    pub fn user_mut(&mut self, id: &RecordId) -> Option<&mut User> {
        self.users.iter_mut().find(|user| &user.id == id)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        let needle = email.trim();
        self.users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(needle))
    }

    pub fn has_user(&self, id: &RecordId) -> bool {
        self.user(id).is_some()
    }

    pub fn transactions_for<'a>(
        &'a self,
        user_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        owned_by(&self.transactions, user_id)
    }

    pub fn categories_for<'a>(
        &'a self,
        user_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a Category> + 'a {
        owned_by(&self.categories, user_id)
    }

    pub fn recurring_for<'a>(
        &'a self,
        user_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a RecurringTransaction> + 'a {
        owned_by(&self.recurring_transactions, user_id)
    }

    pub fn goals_for<'a>(
        &'a self,
        user_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a Goal> + 'a {
        owned_by(&self.goals, user_id)
    }

    pub fn wallets_for<'a>(
        &'a self,
        user_id: &'a RecordId,
    ) -> impl Iterator<Item = &'a Wallet> + 'a {
        owned_by(&self.wallets, user_id)
    }

    pub fn category<'a>(&'a self, user_id: &'a RecordId, id: &RecordId) -> Option<&'a Category> {
        self.categories_for(user_id).find(|category| &category.id == id)
    }

    pub fn category_mut(&mut self, user_id: &RecordId, id: &RecordId) -> Option<&mut Category> {
        self.categories
            .iter_mut()
            .find(|category| &category.id == id && &category.user_id == user_id)
    }

    pub fn transaction_mut(
        &mut self,
        user_id: &RecordId,
        id: &RecordId,
    ) -> Option<&mut Transaction> {
        self.transactions
            .iter_mut()
            .find(|txn| &txn.id == id && &txn.user_id == user_id)
    }

    pub fn goal_mut(&mut self, user_id: &RecordId, id: &RecordId) -> Option<&mut Goal> {
        self.goals
            .iter_mut()
            .find(|goal| &goal.id == id && &goal.user_id == user_id)
    }

    pub fn wallet_mut(&mut self, user_id: &RecordId, id: &RecordId) -> Option<&mut Wallet> {
        self.wallets
            .iter_mut()
            .find(|wallet| &wallet.id == id && &wallet.user_id == user_id)
    }

    /// Detects dangling references left behind by hand-edited or legacy files.
    pub fn integrity_warnings(&self) -> Vec<String> {
        let user_ids: HashSet<&RecordId> = self.users.iter().map(Identifiable::id).collect();
        let category_ids: HashSet<&RecordId> = self.categories.iter().map(Identifiable::id).collect();
        let mut warnings = Vec::new();

        unknown_owners("category", &self.categories, &user_ids, &mut warnings);
        unknown_owners("transaction", &self.transactions, &user_ids, &mut warnings);
        unknown_owners(
            "recurring transaction",
            &self.recurring_transactions,
            &user_ids,
            &mut warnings,
        );
        unknown_owners("goal", &self.goals, &user_ids, &mut warnings);
        unknown_owners("wallet", &self.wallets, &user_ids, &mut warnings);

        for txn in &self.transactions {
            if !category_ids.contains(&txn.category_id) {
                warnings.push(format!(
                    "transaction {} references missing category {}",
                    txn.id, txn.category_id
                ));
            }
        }
        for rt in &self.recurring_transactions {
            if !category_ids.contains(&rt.category_id) {
                warnings.push(format!(
                    "recurring transaction {} references missing category {}",
                    rt.id, rt.category_id
                ));
            }
        }
        warnings
    }
}

fn unknown_owners<T: Identifiable + OwnedByUser>(
    kind: &str,
    items: &[T],
    user_ids: &HashSet<&RecordId>,
    warnings: &mut Vec<String>,
) {
    for item in items.iter().filter(|item| !user_ids.contains(item.user_id())) {
        warnings.push(format!(
            "{kind} {} references unknown user {}",
            item.id(),
            item.user_id()
        ));
    }
}

fn owned_by<'a, T: OwnedByUser>(
    items: &'a [T],
    user_id: &'a RecordId,
) -> impl Iterator<Item = &'a T> {
    items.iter().filter(move |item| item.is_owned_by(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::EntryKind;

    #[test]
    fn missing_collections_deserialize_as_empty() {
        let ledger: Ledger = serde_json::from_str(r#"{"users": []}"#).unwrap();
        assert!(ledger.transactions.is_empty());
        assert!(ledger.recurring_transactions.is_empty());
        assert_eq!(ledger.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn integrity_warnings_flag_orphans() {
        let mut ledger = Ledger::new();
        let ghost = RecordId::generate();
        ledger
            .categories
            .push(Category::new(ghost, "Rent", EntryKind::Expense));
        let warnings = ledger.integrity_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown user"));
    }

    #[test]
    fn lookups_are_scoped_to_owner() {
        let mut ledger = Ledger::new();
        let alice = User::new("alice@example.com", "Alice", "hash");
        let bob = User::new("bob@example.com", "Bob", "hash");
        let category = Category::new(alice.id.clone(), "Rent", EntryKind::Expense);
        let category_id = category.id.clone();
        ledger.categories.push(category);
        let (alice_id, bob_id) = (alice.id.clone(), bob.id.clone());
        ledger.users.push(alice);
        ledger.users.push(bob);

        assert!(ledger.category(&alice_id, &category_id).is_some());
        assert!(ledger.category(&bob_id, &category_id).is_none());
        assert_eq!(
            ledger.user_by_email("ALICE@example.com").map(|u| &u.id),
            Some(&alice_id)
        );
    }
}
