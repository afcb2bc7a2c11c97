#![doc(test(attr(deny(warnings))))]

//! fintrack core: personal finance records, monthly recurring transactions,
//! category budgets and dashboard reporting over a JSON-backed store.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod storage;
pub mod utils;

pub use crate::core::{FinanceError, RecordStore, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintrack tracing initialized");
    });
}
