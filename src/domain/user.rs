//! Registered users and their profile data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, NamedEntity, RecordId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub login_history: Vec<LoginRecord>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            email: email.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            phone: None,
            photo_url: None,
            recovery_email: None,
            login_history: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl NamedEntity for User {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A single sign-in event kept on the user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRecord {
    pub date: DateTime<Utc>,
    pub ip: String,
    pub device: String,
}

/// Partial update for profile fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<Option<String>>,
    pub photo_url: Option<Option<String>>,
    pub recovery_email: Option<Option<String>>,
}
