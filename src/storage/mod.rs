pub mod json_backend;
pub mod memory;

use crate::{core::errors::Result, domain::Ledger};

/// Abstraction over persistence backends capable of storing the ledger and its snapshots.
pub trait LedgerStorage: Send + Sync {
    /// Reads the stored ledger. A backend with nothing stored yet returns an
    /// empty ledger; unreadable contents are an error.
    fn load(&self) -> Result<Ledger>;
    fn save(&self, ledger: &Ledger) -> Result<()>;
    /// Writes a timestamped copy of `ledger`, returning the backup name.
    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String>;
    /// Backup names, newest first.
    fn list_backups(&self) -> Result<Vec<String>>;
    /// Replaces the stored ledger with the named backup and returns it.
    fn restore(&self, backup_name: &str) -> Result<Ledger>;

    /// Keeps a copy of stored contents that failed to load so a later save does
    /// not destroy them. Returns the name of the copy, if one was made.
    fn preserve_unreadable(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

impl<T: LedgerStorage + ?Sized> LedgerStorage for std::sync::Arc<T> {
    fn load(&self) -> Result<Ledger> {
        (**self).load()
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        (**self).save(ledger)
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String> {
        (**self).backup(ledger, note)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        (**self).list_backups()
    }

    fn restore(&self, backup_name: &str) -> Result<Ledger> {
        (**self).restore(backup_name)
    }

    fn preserve_unreadable(&self) -> Result<Option<String>> {
        (**self).preserve_unreadable()
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
