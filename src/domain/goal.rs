//! Savings goals tracked per user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::common::{default_color, Identifiable, NamedEntity, OwnedByUser, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: RecordId,
    pub user_id: RecordId,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_deadline"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(user_id: RecordId, name: impl Into<String>, target_amount: f64) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            user_id,
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline: None,
            color: default_color(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Saved share of the target in percent, capped at 100.
    pub fn progress_percentage(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).min(100.0)
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

impl Identifiable for Goal {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl OwnedByUser for Goal {
    fn user_id(&self) -> &RecordId {
        &self.user_id
    }
}

impl NamedEntity for Goal {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Reads a deadline stored as `YYYY-MM-DD`, as a full RFC 3339 timestamp, or as
/// an empty string meaning "no deadline".
fn deserialize_deadline<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(text) = raw.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    DateTime::parse_from_rfc3339(text)
        .map(|stamp| Some(stamp.with_timezone(&Utc).date_naive()))
        .map_err(|_| serde::de::Error::custom(format!("invalid goal deadline `{text}`")))
}

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub deadline: Option<Option<NaiveDate>>,
    pub color: Option<String>,
}
