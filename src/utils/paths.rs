use std::{env, path::PathBuf};

use dirs::home_dir;

pub const HOME_ENV: &str = "FINTRACK_HOME";
const DEFAULT_DIR_NAME: &str = ".fintrack";
const DATA_FILE: &str = "data.json";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const CONFIG_BACKUP_DIR: &str = "backups";

/// Resolves the data directory: an explicit override wins, then
/// `FINTRACK_HOME`, then `~/.fintrack`.
pub fn app_data_dir(custom: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = custom {
        return dir;
    }
    if let Some(dir) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(dir);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn data_file_in(base: &std::path::Path) -> PathBuf {
    base.join(DATA_FILE)
}

pub fn backup_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_dir_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

pub fn config_backup_dir_in(base: &std::path::Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_BACKUP_DIR)
}
