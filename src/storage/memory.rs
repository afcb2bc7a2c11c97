use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex, MutexGuard,
};

use chrono::Utc;

use crate::{
    core::errors::{FinanceError, Result},
    domain::Ledger,
};

use super::LedgerStorage;

/// Keeps the ledger and its backups in process memory. Useful for tests and
/// ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    current: Mutex<Option<Ledger>>,
    backups: Mutex<Vec<(String, Ledger)>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            current: Mutex::new(Some(ledger)),
            ..Self::default()
        }
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<Ledger> {
        lock(&self.current).ok().and_then(|guard| guard.as_ref().cloned())
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self) -> Result<Ledger> {
        Ok(lock(&self.current)?.as_ref().cloned().unwrap_or_default())
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        *lock(&self.current)? = Some(ledger.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String> {
        let mut backups = lock(&self.backups)?;
        let mut name = format!("memory_{}_{}", Utc::now().format("%Y%m%d_%H%M%S"), backups.len());
        if let Some(note) = note.map(str::trim).filter(|note| !note.is_empty()) {
            name.push('_');
            name.push_str(note);
        }
        backups.push((name.clone(), ledger.clone()));
        Ok(name)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        Ok(lock(&self.backups)?
            .iter()
            .rev()
            .map(|(name, _)| name.clone())
            .collect())
    }

    fn restore(&self, backup_name: &str) -> Result<Ledger> {
        let ledger = lock(&self.backups)?
            .iter()
            .find(|(name, _)| name == backup_name)
            .map(|(_, ledger)| ledger.clone())
            .ok_or_else(|| {
                FinanceError::StorageError(format!("backup `{backup_name}` not found"))
            })?;
        self.save(&ledger)?;
        Ok(ledger)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| FinanceError::StorageError("memory storage lock poisoned".into()))
}
