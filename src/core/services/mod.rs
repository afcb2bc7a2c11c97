//! Stateless, validated operations over a [`Ledger`](crate::domain::Ledger).
//!
//! Every service validates its input before touching the ledger, so a failed
//! call never leaves a partial mutation behind.

pub mod budget_service;
pub mod category_service;
pub mod dashboard_service;
pub mod goal_service;
pub mod recurring_service;
pub mod transaction_service;
pub mod user_service;
pub mod wallet_service;

pub use budget_service::{BudgetCheck, BudgetService};
pub use category_service::CategoryService;
pub use dashboard_service::{Dashboard, DashboardService};
pub use goal_service::GoalService;
pub use recurring_service::RecurringService;
pub use transaction_service::{TransactionReceipt, TransactionService};
pub use user_service::UserService;
pub use wallet_service::WalletService;

use crate::core::errors::{FinanceError, Result};
use crate::domain::{Ledger, RecordId};

pub(crate) fn require_user(ledger: &Ledger, user_id: &RecordId) -> Result<()> {
    if ledger.has_user(user_id) {
        Ok(())
    } else {
        Err(FinanceError::UserNotFound(user_id.clone()))
    }
}

pub(crate) fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FinanceError::Validation(format!(
            "{field} must be a positive amount"
        )))
    }
}

pub(crate) fn require_non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FinanceError::Validation(format!(
            "{field} must be a non-negative amount"
        )))
    }
}

pub(crate) fn require_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FinanceError::Validation(format!("{field} must be a number")))
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FinanceError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}
