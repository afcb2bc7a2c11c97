//! Search and relative date-range filters applied before aggregation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Transaction};

/// Relative window ending now. Each variant keeps transactions dated on or after
/// the start of today minus the period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Today,
    Week,
    Month,
    Year,
}

impl DateRange {
    /// Earliest timestamp kept by the range, or `None` for [`DateRange::All`].
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        match self {
            DateRange::All => None,
            DateRange::Today => Some(today),
            DateRange::Week => Some(today - Duration::days(7)),
            DateRange::Month => today.checked_sub_months(Months::new(1)),
            DateRange::Year => today.checked_sub_months(Months::new(12)),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateRange::All => "all",
            DateRange::Today => "today",
            DateRange::Week => "week",
            DateRange::Month => "month",
            DateRange::Year => "year",
        };
        f.write_str(label)
    }
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "year" => Ok(DateRange::Year),
            other => Err(format!("unknown date range `{other}`")),
        }
    }
}

/// Optional dashboard filters. Both parts compose as an intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub query: Option<String>,
    pub range: DateRange,
}

impl TransactionFilter {
    pub fn new(query: Option<String>, range: DateRange) -> Self {
        Self { query, range }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            range: DateRange::All,
        }
    }

    pub fn range(range: DateRange) -> Self {
        Self { query: None, range }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_query().is_none() && self.range == DateRange::All
    }

    /// Keeps the transactions matching every active filter, preserving order.
    pub fn apply(
        &self,
        transactions: Vec<Transaction>,
        categories: &[Category],
        now: DateTime<Utc>,
    ) -> Vec<Transaction> {
        let query = self.normalized_query();
        let cutoff = self.range.cutoff(now);
        transactions
            .into_iter()
            .filter(|txn| {
                query
                    .as_deref()
                    .map_or(true, |needle| matches_query(txn, categories, needle))
            })
            .filter(|txn| cutoff.map_or(true, |start| txn.date >= start))
            .collect()
    }

    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

fn matches_query(txn: &Transaction, categories: &[Category], needle: &str) -> bool {
    if txn.description.to_lowercase().contains(needle) {
        return true;
    }
    if txn.amount.to_string().contains(needle) {
        return true;
    }
    categories
        .iter()
        .find(|category| category.id == txn.category_id)
        .is_some_and(|category| category.name.to_lowercase().contains(needle))
}
