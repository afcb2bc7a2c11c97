//! Registration and profile management.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::core::errors::{FinanceError, Result};
use crate::core::services::require_text;
use crate::domain::{
    Category, Ledger, LoginRecord, RecordId, User, UserPatch, DEFAULT_CATEGORIES,
};

const MIN_NAME_LEN: usize = 2;
const LOGIN_HISTORY_LIMIT: usize = 20;

pub struct UserService;

impl UserService {
    /// Registers a new user. When `seed_defaults` is set the standard category
    /// set is created alongside the account.
    pub fn register(
        ledger: &mut Ledger,
        email: &str,
        name: &str,
        password_hash: &str,
        seed_defaults: bool,
    ) -> Result<User> {
        let email = validate_email(email)?;
        let name = validate_name(name)?;
        let password_hash = require_text("password hash", password_hash)?;
        if ledger.user_by_email(&email).is_some() {
            return Err(FinanceError::Conflict(format!(
                "email `{email}` is already registered"
            )));
        }

        let user = User::new(email, name, password_hash);
        if seed_defaults {
            ledger
                .categories
                .extend(DEFAULT_CATEGORIES.iter().map(|(name, kind, budget)| {
                    let mut category = Category::new(user.id.clone(), *name, *kind);
                    category.budget = *budget;
                    category
                }));
        }
        ledger.users.push(user.clone());
        ledger.touch();
        info!(user_id = %user.id, seeded = seed_defaults, "user registered");
        Ok(user)
    }

    pub fn by_email(ledger: &Ledger, email: &str) -> Option<User> {
        ledger.user_by_email(email).cloned()
    }

    pub fn by_id(ledger: &Ledger, user_id: &RecordId) -> Result<User> {
        ledger
            .user(user_id)
            .cloned()
            .ok_or_else(|| FinanceError::UserNotFound(user_id.clone()))
    }

    /// Applies a profile patch. Every field is validated before any is written.
    pub fn update_profile(ledger: &mut Ledger, user_id: &RecordId, patch: UserPatch) -> Result<User> {
        let name = patch.name.as_deref().map(validate_name).transpose()?;
        let email = patch.email.as_deref().map(validate_email).transpose()?;
        let password_hash = patch
            .password_hash
            .as_deref()
            .map(|hash| require_text("password hash", hash))
            .transpose()?;
        if let Some(email) = email.as_deref() {
            if ledger
                .user_by_email(email)
                .is_some_and(|other| &other.id != user_id)
            {
                return Err(FinanceError::Conflict(format!(
                    "email `{email}` is already registered"
                )));
            }
        }

        let user = ledger
            .user_mut(user_id)
            .ok_or_else(|| FinanceError::UserNotFound(user_id.clone()))?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(photo_url) = patch.photo_url {
            user.photo_url = photo_url;
        }
        if let Some(recovery_email) = patch.recovery_email {
            user.recovery_email = recovery_email;
        }
        let updated = user.clone();
        ledger.touch();
        Ok(updated)
    }

    /// Appends a sign-in event, keeping only the most recent entries.
    pub fn record_login(
        ledger: &mut Ledger,
        user_id: &RecordId,
        ip: &str,
        device: &str,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let user = ledger
            .user_mut(user_id)
            .ok_or_else(|| FinanceError::UserNotFound(user_id.clone()))?;
        user.login_history.insert(
            0,
            LoginRecord {
                date: at,
                ip: ip.to_string(),
                device: device.to_string(),
            },
        );
        user.login_history.truncate(LOGIN_HISTORY_LIMIT);
        ledger.touch();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = require_text("name", name)?;
    if name.chars().count() < MIN_NAME_LEN {
        return Err(FinanceError::Validation(format!(
            "name must be at least {MIN_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

fn validate_email(email: &str) -> Result<String> {
    let email = require_text("email", email)?;
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid || email.contains(char::is_whitespace) {
        return Err(FinanceError::Validation(format!(
            "`{email}` is not a valid email address"
        )));
    }
    Ok(email.to_ascii_lowercase())
}
