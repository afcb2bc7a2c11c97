//! Bundles every dashboard figure for one user.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::core::aggregation::{
    self, BudgetProgress, CategoryTotal, MonthlyTotal, Totals, TrendPoint,
};
use crate::core::filters::TransactionFilter;
use crate::domain::{Category, Ledger, RecordId, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub totals: Totals,
    pub monthly_series: Vec<MonthlyTotal>,
    pub category_breakdown: Vec<CategoryTotal>,
    pub budget_progress: Vec<BudgetProgress>,
    pub trend_series: Vec<TrendPoint>,
    pub recent_transactions: Vec<Transaction>,
}

pub struct DashboardService;

impl DashboardService {
    /// Computes the dashboard over the user's transactions that pass `filter`.
    /// Read-only: recurrence must already have run.
    pub fn build(
        ledger: &Ledger,
        user_id: &RecordId,
        filter: &TransactionFilter,
        now: DateTime<Utc>,
    ) -> Dashboard {
        let categories: Vec<Category> = ledger.categories_for(user_id).cloned().collect();
        let all: Vec<Transaction> = ledger.transactions_for(user_id).cloned().collect();
        let total = all.len();
        let transactions = filter.apply(all, &categories, now);
        debug!(
            %user_id,
            total,
            kept = transactions.len(),
            range = %filter.range,
            "building dashboard"
        );

        Dashboard {
            totals: aggregation::totals(&transactions),
            monthly_series: aggregation::monthly_series(&transactions),
            category_breakdown: aggregation::category_breakdown(&transactions, &categories),
            budget_progress: aggregation::budget_progress(&transactions, &categories),
            trend_series: aggregation::trend_series(&transactions),
            recent_transactions: aggregation::recent_transactions(&transactions),
        }
    }
}
