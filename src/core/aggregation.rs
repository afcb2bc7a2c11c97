//! Pure dashboard figures derived from a transaction list.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::{Category, RecordId, Transaction};

pub const TREND_WINDOW: usize = 30;
pub const RECENT_LIMIT: usize = 5;
pub const UNKNOWN_CATEGORY: &str = "Unknown";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub month: &'static str,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub category_id: RecordId,
    pub category: String,
    pub spent: f64,
    pub budget: f64,
    pub percentage: f64,
}

impl BudgetProgress {
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// Month/day label such as `Mar 5`.
    pub label: String,
    /// First calendar date that contributed to this point.
    pub date: NaiveDate,
    pub amount: f64,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) = transactions
        .iter()
        .fold((0.0, 0.0), |(income, expenses), txn| {
            if txn.is_expense() {
                (income, expenses + txn.amount)
            } else {
                (income + txn.amount, expenses)
            }
        });
    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Expenses per short month name, ordered Jan..Dec. Years are folded together.
pub fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut buckets: [Option<f64>; 12] = [None; 12];
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let slot = &mut buckets[txn.date.month0() as usize];
        *slot = Some(slot.unwrap_or(0.0) + txn.amount);
    }
    buckets
        .iter()
        .enumerate()
        .filter_map(|(idx, total)| {
            total.map(|total| MonthlyTotal {
                month: MONTH_NAMES[idx],
                total,
            })
        })
        .collect()
}

/// Expenses per category name in first-seen order.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let names: HashMap<&RecordId, &str> = categories
        .iter()
        .map(|c| (&c.id, c.name.as_str()))
        .collect();
    let mut rows: Vec<CategoryTotal> = Vec::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let name = names
            .get(&txn.category_id)
            .copied()
            .unwrap_or(UNKNOWN_CATEGORY);
        match rows.iter_mut().find(|row| row.name == name) {
            Some(row) => row.value += txn.amount,
            None => rows.push(CategoryTotal {
                name: name.to_string(),
                value: txn.amount,
            }),
        }
    }
    rows
}

/// Spend against budget for every expense category with a positive budget,
/// highest percentage first.
pub fn budget_progress(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<BudgetProgress> {
    let mut spent_by_category: HashMap<&RecordId, f64> = HashMap::new();
    for txn in transactions {
        *spent_by_category.entry(&txn.category_id).or_default() += txn.amount;
    }
    let mut rows: Vec<BudgetProgress> = categories
        .iter()
        .filter_map(|category| {
            let budget = category.tracked_budget()?;
            let spent = spent_by_category
                .get(&category.id)
                .copied()
                .unwrap_or(0.0);
            Some(BudgetProgress {
                category_id: category.id.clone(),
                category: category.name.clone(),
                spent,
                budget,
                percentage: spent / budget * 100.0,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Daily expense totals in ascending date order, limited to the latest
/// [`TREND_WINDOW`] points. Days are keyed by month/day label.
pub fn trend_series(transactions: &[Transaction]) -> Vec<TrendPoint> {
    let mut expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    expenses.sort_by_key(|txn| txn.date);

    let mut points: Vec<TrendPoint> = Vec::new();
    for txn in expenses {
        let date = txn.date.date_naive();
        let label = day_label(date);
        match points.iter_mut().find(|point| point.label == label) {
            Some(point) => point.amount += txn.amount,
            None => points.push(TrendPoint {
                label,
                date,
                amount: txn.amount,
            }),
        }
    }
    let skip = points.len().saturating_sub(TREND_WINDOW);
    points.split_off(skip)
}

/// Latest transactions first, at most [`RECENT_LIMIT`].
pub fn recent_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by_key(|txn| Reverse(txn.date));
    sorted.truncate(RECENT_LIMIT);
    sorted
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

fn day_label(date: NaiveDate) -> String {
    format!("{} {}", month_name(date), date.day())
}
