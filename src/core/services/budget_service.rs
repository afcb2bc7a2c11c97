//! Budget overflow detection for expense categories.
//!
//! Spend is cumulative over all time: budgets are never reset per period.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Ledger, RecordId};

/// Outcome of a budget check for one category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCheck {
    pub is_over_budget: bool,
    /// Display name of the category, when it exists.
    pub category_name: Option<String>,
    pub spent: f64,
    pub budget: Option<f64>,
}

impl BudgetCheck {
    pub fn not_checked() -> Self {
        Self::default()
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Compares all-time spend in `category_id` against its budget.
    ///
    /// Never fails: a missing category, an income category or a category without a
    /// positive budget reports `is_over_budget = false`.
    pub fn evaluate(ledger: &Ledger, user_id: &RecordId, category_id: &RecordId) -> BudgetCheck {
        let Some(category) = ledger.category(user_id, category_id) else {
            debug!(%category_id, "budget check skipped: category not found");
            return BudgetCheck::not_checked();
        };
        let mut check = BudgetCheck {
            category_name: Some(category.name.clone()),
            ..BudgetCheck::default()
        };
        let Some(budget) = category.tracked_budget() else {
            return check;
        };

        let spent: f64 = ledger
            .transactions_for(user_id)
            .filter(|txn| &txn.category_id == category_id)
            .map(|txn| txn.amount)
            .sum();
        check.spent = spent;
        check.budget = Some(budget);
        check.is_over_budget = spent > budget;
        if check.is_over_budget {
            warn!(
                category = %category.name,
                spent,
                budget,
                "category budget exceeded"
            );
        }
        check
    }
}
