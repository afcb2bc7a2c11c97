use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::{debug, info};

use crate::{
    core::errors::{FinanceError, Result},
    domain::{Ledger, CURRENT_SCHEMA_VERSION},
    utils::{
        paths,
        persistence::{
            backup_file_name, ensure_dir, is_plain_file_name, list_backup_files,
            parse_backup_timestamp, prune_backups, unique_backup_name, write_atomic,
        },
    },
};

use super::LedgerStorage;

const BACKUP_PREFIX: &str = "ledger";
/// Copies of unreadable ledgers. Never listed, restored or pruned as backups.
const UNREADABLE_PREFIX: &str = "unreadable";
pub const DEFAULT_RETENTION: usize = 5;

/// Stores the whole ledger as one pretty-printed `data.json` inside the data
/// directory, with timestamped copies under `backups/`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    data_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: PathBuf, retention: Option<usize>) -> Result<Self> {
        ensure_dir(&root)?;
        let backups_dir = paths::backup_dir_in(&root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            data_file: paths::data_file_in(&root),
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn backup_path(&self, backup_name: &str) -> PathBuf {
        self.backups_dir.join(backup_name)
    }

    fn read_ledger(path: &Path) -> Result<Ledger> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|err| {
            FinanceError::StorageError(format!("`{}` is not a valid ledger: {err}", path.display()))
        })
    }
}

impl LedgerStorage for JsonStorage {
    fn load(&self) -> Result<Ledger> {
        if !self.data_file.exists() {
            debug!(path = %self.data_file.display(), "no ledger file yet; starting empty");
            return Ok(Ledger::new());
        }
        Self::read_ledger(&self.data_file)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&self.data_file, &json)?;
        Ok(())
    }

    fn backup(&self, ledger: &Ledger, note: Option<&str>) -> Result<String> {
        ensure_dir(&self.backups_dir)?;
        let name = unique_backup_name(
            &self.backups_dir,
            backup_file_name(BACKUP_PREFIX, note, Utc::now()),
        );
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&self.backup_path(&name), &json)?;
        let pruned = prune_backups(&self.backups_dir, BACKUP_PREFIX, self.retention)?;
        info!(backup = %name, pruned, "ledger backup written");
        Ok(name)
    }

    fn list_backups(&self) -> Result<Vec<String>> {
        Ok(list_backup_files(&self.backups_dir, BACKUP_PREFIX)?)
    }

    fn restore(&self, backup_name: &str) -> Result<Ledger> {
        let path = self.backup_path(backup_name);
        let is_backup = is_plain_file_name(backup_name)
            && parse_backup_timestamp(backup_name, BACKUP_PREFIX).is_some();
        if !is_backup || !path.exists() {
            return Err(FinanceError::StorageError(format!(
                "backup `{backup_name}` not found"
            )));
        }
        let ledger = Self::read_ledger(&path)?;
        if ledger.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(FinanceError::StorageError(format!(
                "backup `{backup_name}` uses unsupported schema version {}",
                ledger.schema_version
            )));
        }
        self.save(&ledger)?;
        info!(backup = %backup_name, "ledger restored from backup");
        Ok(ledger)
    }

    fn preserve_unreadable(&self) -> Result<Option<String>> {
        if !self.data_file.exists() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)?;
        let name = unique_backup_name(
            &self.backups_dir,
            backup_file_name(UNREADABLE_PREFIX, None, Utc::now()),
        );
        fs::copy(&self.data_file, self.backup_path(&name))?;
        Ok(Some(name))
    }
}
