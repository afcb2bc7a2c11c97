#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use fintrack_core::{
    config::ConfigManager,
    core::record_store::{LoadPolicy, RecordStore},
    domain::{Category, EntryKind, NewTransaction, RecordId, User},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates an isolated JSON-backed store and config manager.
pub fn setup_test_env() -> (RecordStore, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonStorage::new(base.clone(), Some(3)).expect("create json storage backend");
    let store = RecordStore::open(Box::new(storage), LoadPolicy::Strict).expect("open store");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (store, config_manager, base)
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

pub fn register(store: &RecordStore, email: &str) -> User {
    store
        .register_user(email, "Test User", "opaque-hash")
        .expect("register user")
}

pub fn category(store: &RecordStore, user_id: &RecordId, name: &str) -> Category {
    store
        .get_categories(user_id)
        .expect("list categories")
        .into_iter()
        .find(|category| category.name == name)
        .unwrap_or_else(|| panic!("category {name} missing"))
}

pub fn expense(
    category_id: &RecordId,
    amount: f64,
    description: &str,
    date: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        amount,
        description: description.into(),
        date,
        kind: EntryKind::Expense,
        category_id: category_id.clone(),
        wallet_id: None,
    }
}

pub fn income(
    category_id: &RecordId,
    amount: f64,
    description: &str,
    date: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        kind: EntryKind::Income,
        ..expense(category_id, amount, description, date)
    }
}
