//! Domain types representing spending and income categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// Categorises a user's activity for budgeting and reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(user_id: RecordId, name: impl Into<String>, kind: EntryKind) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            user_id,
            name: name.into(),
            kind,
            budget: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Budget limit that participates in overflow checks.
    ///
    /// Only expense categories with a positive budget are tracked; a zero budget
    /// counts as "no budget".
    pub fn tracked_budget(&self) -> Option<f64> {
        if !self.kind.is_expense() {
            return None;
        }
        self.budget.filter(|limit| *limit > 0.0)
    }
}

impl Identifiable for Category {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl OwnedByUser for Category {
    fn user_id(&self) -> &RecordId {
        &self.user_id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Fields accepted when creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub kind: EntryKind,
    pub budget: Option<f64>,
}

/// Partial update for a category. `budget: Some(None)` clears the budget.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<EntryKind>,
    pub budget: Option<Option<f64>>,
}

/// Categories seeded for every newly registered user.
pub const DEFAULT_CATEGORIES: &[(&str, EntryKind, Option<f64>)] = &[
    ("Salary", EntryKind::Income, None),
    ("Freelance", EntryKind::Income, None),
    ("Investments", EntryKind::Income, None),
    ("Groceries", EntryKind::Expense, Some(500.0)),
    ("Rent", EntryKind::Expense, Some(1200.0)),
    ("Utilities", EntryKind::Expense, Some(200.0)),
    ("Entertainment", EntryKind::Expense, Some(150.0)),
    ("Transport", EntryKind::Expense, Some(100.0)),
    ("Health", EntryKind::Expense, Some(100.0)),
    ("Shopping", EntryKind::Expense, Some(200.0)),
];
