//! User preferences persisted next to the ledger.

mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::record_store::LoadPolicy,
    core::recurrence::RecurrencePolicy,
    currency::{CurrencyCode, NumberLocale},
    utils::{
        paths,
        persistence::{
            backup_file_name, ensure_dir, is_plain_file_name, list_backup_files, prune_backups,
            unique_backup_name, write_atomic,
        },
    },
};

pub use error::{ConfigError, ConfigResult};

const BACKUP_PREFIX: &str = "config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub currency: CurrencyCode,
    /// Language tag that picks decimal and grouping separators.
    pub locale: String,
    /// Ledger backups kept before the oldest are pruned.
    pub backup_retention: usize,
    /// Refuse to start on an unreadable ledger instead of starting empty.
    pub strict_load: bool,
    pub seed_default_categories: bool,
    /// Treat a recurring day past the end of a month as its last day.
    pub clamp_day_of_month: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            locale: "en-US".into(),
            backup_retention: 5,
            strict_load: false,
            seed_default_categories: true,
            clamp_day_of_month: false,
        }
    }
}

impl Config {
    pub fn load_policy(&self) -> LoadPolicy {
        if self.strict_load {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Lenient
        }
    }

    pub fn number_locale(&self) -> NumberLocale {
        NumberLocale::from_tag(&self.locale)
    }

    pub fn recurrence_policy(&self) -> RecurrencePolicy {
        RecurrencePolicy {
            clamp_to_month_end: self.clamp_day_of_month,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> ConfigResult<Self> {
        ensure_dir(&paths::config_dir_in(&base))?;
        Ok(Self {
            path: paths::config_file_in(&base),
            backups_dir: paths::config_backup_dir_in(&base),
            retention: Config::default().backup_retention,
        })
    }

    /// Returns the stored config, or defaults when none was saved yet.
    pub fn load(&self) -> ConfigResult<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, config: &Config) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> ConfigResult<String> {
        ensure_dir(&self.backups_dir)?;
        let name = unique_backup_name(
            &self.backups_dir,
            backup_file_name(BACKUP_PREFIX, note, Utc::now()),
        );
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.backups_dir.join(&name), &json)?;
        prune_backups(&self.backups_dir, BACKUP_PREFIX, self.retention)?;
        Ok(name)
    }

    /// Reads a backup and makes it the active configuration.
    pub fn restore(&self, backup_name: &str) -> ConfigResult<Config> {
        let path = self.backups_dir.join(backup_name);
        if !is_plain_file_name(backup_name) || !path.exists() {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("configuration backup `{backup_name}` not found"),
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    pub fn list_backups(&self) -> ConfigResult<Vec<String>> {
        Ok(list_backup_files(&self.backups_dir, BACKUP_PREFIX)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
