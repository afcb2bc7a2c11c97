//! Thread-safe facade combining the in-memory ledger with a storage backend.
//!
//! Every mutating call runs against a working copy under the lock and is only
//! committed once the backend has persisted it. Calls that change nothing do not
//! write.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::errors::{FinanceError, Result};
use crate::core::filters::TransactionFilter;
use crate::core::recurrence::{self, RecurrencePolicy};
use crate::core::services::{
    require_user, BudgetCheck, BudgetService, CategoryService, Dashboard, DashboardService,
    GoalService, RecurringService, TransactionReceipt, TransactionService, UserService,
    WalletService,
};
use crate::domain::{
    Category, CategoryPatch, Goal, GoalPatch, ImportRow, Ledger, NewCategory, NewGoal,
    NewRecurringTransaction, NewTransaction, NewWallet, RecordId, RecurringTransaction, Transaction,
    TransactionPatch, User, UserPatch, Wallet, WalletPatch, CURRENT_SCHEMA_VERSION,
};
use crate::storage::{LedgerStorage, MemoryStorage};

/// How to react when stored contents cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log a warning, keep a copy of the unreadable file and start empty.
    #[default]
    Lenient,
    /// Refuse to open.
    Strict,
}

pub struct RecordStore {
    ledger: Mutex<Ledger>,
    storage: Box<dyn LedgerStorage>,
    recurrence: RecurrencePolicy,
    seed_default_categories: bool,
}

impl RecordStore {
    pub fn open(storage: Box<dyn LedgerStorage>, policy: LoadPolicy) -> Result<Self> {
        let ledger = match storage.load() {
            Ok(ledger) => ledger,
            Err(err) if policy == LoadPolicy::Lenient => {
                let preserved = storage.preserve_unreadable().unwrap_or_else(|copy_err| {
                    warn!(error = %copy_err, "could not keep a copy of the unreadable ledger");
                    None
                });
                warn!(
                    error = %err,
                    preserved = preserved.as_deref().unwrap_or("none"),
                    "stored ledger is unreadable; starting with an empty ledger"
                );
                Ledger::new()
            }
            Err(err) => return Err(err),
        };
        if ledger.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(FinanceError::StorageError(format!(
                "ledger schema version {} is newer than supported version {}",
                ledger.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        for warning in ledger.integrity_warnings() {
            warn!("{warning}");
        }
        info!(
            users = ledger.users.len(),
            transactions = ledger.transactions.len(),
            "record store opened"
        );
        Ok(Self {
            ledger: Mutex::new(ledger),
            storage,
            recurrence: RecurrencePolicy::default(),
            seed_default_categories: true,
        })
    }

    /// Opens `storage` using the load, recurrence and seeding options from `config`.
    pub fn with_config(storage: Box<dyn LedgerStorage>, config: &Config) -> Result<Self> {
        Ok(Self::open(storage, config.load_policy())?
            .with_recurrence_policy(config.recurrence_policy())
            .with_default_categories(config.seed_default_categories))
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self {
            ledger: Mutex::new(Ledger::new()),
            storage: Box::new(MemoryStorage::new()),
            recurrence: RecurrencePolicy::default(),
            seed_default_categories: true,
        }
    }

    pub fn with_recurrence_policy(mut self, policy: RecurrencePolicy) -> Self {
        self.recurrence = policy;
        self
    }

    pub fn with_default_categories(mut self, enabled: bool) -> Self {
        self.seed_default_categories = enabled;
        self
    }

    pub fn recurrence_policy(&self) -> RecurrencePolicy {
        self.recurrence
    }

    /// Clone of the whole ledger as currently committed.
    pub fn snapshot(&self) -> Result<Ledger> {
        self.read(Ledger::clone)
    }

    // Users

    pub fn register_user(&self, email: &str, name: &str, password_hash: &str) -> Result<User> {
        let seed = self.seed_default_categories;
        self.mutate(|ledger| UserService::register(ledger, email, name, password_hash, seed))
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.read(|ledger| UserService::by_email(ledger, email))
    }

    pub fn user(&self, user_id: &RecordId) -> Result<User> {
        self.read(|ledger| UserService::by_id(ledger, user_id))?
    }

    pub fn update_user(&self, user_id: &RecordId, patch: UserPatch) -> Result<User> {
        self.mutate(|ledger| UserService::update_profile(ledger, user_id, patch))
    }

    pub fn record_login(
        &self,
        user_id: &RecordId,
        ip: &str,
        device: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        self.mutate(|ledger| UserService::record_login(ledger, user_id, ip, device, at))
    }

    // Transactions

    pub fn get_transactions(&self, user_id: &RecordId) -> Result<Vec<Transaction>> {
        self.read(|ledger| TransactionService::list(ledger, user_id))
    }

    pub fn add_transaction(
        &self,
        user_id: &RecordId,
        input: NewTransaction,
    ) -> Result<TransactionReceipt> {
        self.mutate(|ledger| TransactionService::add(ledger, user_id, input))
    }

    pub fn add_transactions(
        &self,
        user_id: &RecordId,
        inputs: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>> {
        self.mutate(|ledger| TransactionService::add_many(ledger, user_id, inputs))
    }

    pub fn import_transactions(
        &self,
        user_id: &RecordId,
        rows: Vec<ImportRow>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        self.mutate(|ledger| TransactionService::import(ledger, user_id, rows, now))
    }

    pub fn update_transaction(
        &self,
        user_id: &RecordId,
        id: &RecordId,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        self.mutate(|ledger| TransactionService::update(ledger, user_id, id, patch))
    }

    pub fn delete_transaction(&self, user_id: &RecordId, id: &RecordId) -> Result<Transaction> {
        self.mutate(|ledger| TransactionService::remove(ledger, user_id, id))
    }

    // Categories

    pub fn get_categories(&self, user_id: &RecordId) -> Result<Vec<Category>> {
        self.read(|ledger| CategoryService::list(ledger, user_id))
    }

    pub fn create_category(&self, user_id: &RecordId, input: NewCategory) -> Result<Category> {
        self.mutate(|ledger| CategoryService::create(ledger, user_id, input))
    }

    pub fn update_category(
        &self,
        user_id: &RecordId,
        id: &RecordId,
        patch: CategoryPatch,
    ) -> Result<Category> {
        self.mutate(|ledger| CategoryService::update(ledger, user_id, id, patch))
    }

    // Recurring templates

    pub fn get_recurring_transactions(&self, user_id: &RecordId) -> Result<Vec<RecurringTransaction>> {
        self.read(|ledger| RecurringService::list(ledger, user_id))
    }

    pub fn create_recurring_transaction(
        &self,
        user_id: &RecordId,
        input: NewRecurringTransaction,
    ) -> Result<RecurringTransaction> {
        self.mutate(|ledger| RecurringService::create(ledger, user_id, input))
    }

    pub fn delete_recurring_transaction(
        &self,
        user_id: &RecordId,
        id: &RecordId,
    ) -> Result<RecurringTransaction> {
        self.mutate(|ledger| RecurringService::remove(ledger, user_id, id))
    }

    /// Templates that the next dashboard read or `process_recurring` call would
    /// materialize at `now`. Nothing is written.
    pub fn due_recurring(
        &self,
        user_id: &RecordId,
        now: DateTime<Utc>,
    ) -> Result<Vec<RecurringTransaction>> {
        let policy = self.recurrence;
        self.read(|ledger| {
            require_user(ledger, user_id)?;
            Ok(recurrence::due_templates(ledger, user_id, now, policy)
                .into_iter()
                .cloned()
                .collect())
        })?
    }

    /// Materializes every template due for `user_id` at `now`.
    pub fn process_recurring(&self, user_id: &RecordId, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let policy = self.recurrence;
        self.mutate(|ledger| {
            require_user(ledger, user_id)?;
            Ok(RecurringService::process(ledger, user_id, now, policy))
        })
    }

    // Goals

    pub fn get_goals(&self, user_id: &RecordId) -> Result<Vec<Goal>> {
        self.read(|ledger| GoalService::list(ledger, user_id))
    }

    pub fn create_goal(&self, user_id: &RecordId, input: NewGoal) -> Result<Goal> {
        self.mutate(|ledger| GoalService::create(ledger, user_id, input))
    }

    pub fn update_goal(&self, user_id: &RecordId, id: &RecordId, patch: GoalPatch) -> Result<Goal> {
        self.mutate(|ledger| GoalService::update(ledger, user_id, id, patch))
    }

    pub fn contribute_to_goal(&self, user_id: &RecordId, id: &RecordId, amount: f64) -> Result<Goal> {
        self.mutate(|ledger| GoalService::contribute(ledger, user_id, id, amount))
    }

    pub fn delete_goal(&self, user_id: &RecordId, id: &RecordId) -> Result<Goal> {
        self.mutate(|ledger| GoalService::remove(ledger, user_id, id))
    }

    // Wallets

    pub fn get_wallets(&self, user_id: &RecordId) -> Result<Vec<Wallet>> {
        self.read(|ledger| WalletService::list(ledger, user_id))
    }

    pub fn create_wallet(&self, user_id: &RecordId, input: NewWallet) -> Result<Wallet> {
        self.mutate(|ledger| WalletService::create(ledger, user_id, input))
    }

    pub fn update_wallet(&self, user_id: &RecordId, id: &RecordId, patch: WalletPatch) -> Result<Wallet> {
        self.mutate(|ledger| WalletService::update(ledger, user_id, id, patch))
    }

    pub fn delete_wallet(&self, user_id: &RecordId, id: &RecordId) -> Result<Wallet> {
        self.mutate(|ledger| WalletService::remove(ledger, user_id, id))
    }

    // Reporting

    /// Runs the recurrence engine for the user, then builds the dashboard from
    /// the same locked state.
    pub fn dashboard(
        &self,
        user_id: &RecordId,
        filter: &TransactionFilter,
        now: DateTime<Utc>,
    ) -> Result<Dashboard> {
        let policy = self.recurrence;
        self.mutate(|ledger| {
            require_user(ledger, user_id)?;
            let generated = RecurringService::process(ledger, user_id, now, policy);
            if !generated.is_empty() {
                debug!(count = generated.len(), "recurring transactions added before dashboard");
            }
            Ok(DashboardService::build(ledger, user_id, filter, now))
        })
    }

    pub fn evaluate_budget(&self, user_id: &RecordId, category_id: &RecordId) -> Result<BudgetCheck> {
        self.read(|ledger| BudgetService::evaluate(ledger, user_id, category_id))
    }

    // Backups

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let guard = self.lock()?;
        self.storage.backup(&guard, note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        self.storage.list_backups()
    }

    /// Replaces the current ledger with the named backup.
    pub fn restore_backup(&self, backup_name: &str) -> Result<()> {
        let mut guard = self.lock()?;
        let restored = self.storage.restore(backup_name)?;
        if restored.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(FinanceError::StorageError(format!(
                "backup `{backup_name}` uses unsupported schema version {}",
                restored.schema_version
            )));
        }
        *guard = restored;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| FinanceError::StorageError("ledger lock poisoned".into()))
    }

    fn read<T>(&self, op: impl FnOnce(&Ledger) -> T) -> Result<T> {
        let guard = self.lock()?;
        Ok(op(&guard))
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut Ledger) -> Result<T>) -> Result<T> {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        let value = op(&mut working)?;
        if working != *guard {
            self.storage.save(&working)?;
            *guard = working;
        }
        Ok(value)
    }
}
