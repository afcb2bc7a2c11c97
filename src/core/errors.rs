use std::result::Result as StdResult;

use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::RecordId;

/// Unified error type for the domain, service and storage layers.
#[derive(Error, Debug)]
pub enum FinanceError {
    #[error("User not found: {0}")]
    UserNotFound(RecordId),
    #[error("Category not found: {0}")]
    CategoryNotFound(RecordId),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(RecordId),
    #[error("Recurring transaction not found: {0}")]
    RecurringNotFound(RecordId),
    #[error("Goal not found: {0}")]
    GoalNotFound(RecordId),
    #[error("Wallet not found: {0}")]
    WalletNotFound(RecordId),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = StdResult<T, FinanceError>;

impl FinanceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FinanceError::UserNotFound(_)
                | FinanceError::CategoryNotFound(_)
                | FinanceError::TransactionNotFound(_)
                | FinanceError::RecurringNotFound(_)
                | FinanceError::GoalNotFound(_)
                | FinanceError::WalletNotFound(_)
        )
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FinanceError {
    fn from(err: serde_json::Error) -> Self {
        FinanceError::StorageError(err.to_string())
    }
}

impl From<ConfigError> for FinanceError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => FinanceError::StorageError(io.to_string()),
            ConfigError::Serde(message) => FinanceError::ConfigError(message),
        }
    }
}
