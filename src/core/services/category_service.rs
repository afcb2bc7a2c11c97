//! Category creation and budget maintenance.

use tracing::info;

use crate::core::errors::{FinanceError, Result};
use crate::core::services::{require_non_negative, require_text, require_user};
use crate::domain::{Category, CategoryPatch, Ledger, NamedEntity, NewCategory, RecordId};

pub struct CategoryService;

impl CategoryService {
    pub fn create(ledger: &mut Ledger, user_id: &RecordId, input: NewCategory) -> Result<Category> {
        require_user(ledger, user_id)?;
        let name = require_text("name", &input.name)?;
        if let Some(budget) = input.budget {
            require_non_negative("budget", budget)?;
        }
        Self::ensure_unique_name(ledger, user_id, &name, None)?;

        let mut category = Category::new(user_id.clone(), name, input.kind);
        category.budget = input.budget;
        ledger.categories.push(category.clone());
        ledger.touch();
        info!(category_id = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Applies `patch` to a category owned by `user_id`.
    pub fn update(
        ledger: &mut Ledger,
        user_id: &RecordId,
        id: &RecordId,
        patch: CategoryPatch,
    ) -> Result<Category> {
        let name = patch
            .name
            .as_deref()
            .map(|name| require_text("name", name))
            .transpose()?;
        if let Some(Some(budget)) = patch.budget {
            require_non_negative("budget", budget)?;
        }
        if ledger.category(user_id, id).is_none() {
            return Err(FinanceError::CategoryNotFound(id.clone()));
        }
        if let Some(name) = name.as_deref() {
            Self::ensure_unique_name(ledger, user_id, name, Some(id))?;
        }

        let category = ledger
            .category_mut(user_id, id)
            .ok_or_else(|| FinanceError::CategoryNotFound(id.clone()))?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(kind) = patch.kind {
            category.kind = kind;
        }
        if let Some(budget) = patch.budget {
            category.budget = budget;
        }
        category.updated_at = chrono::Utc::now();
        let updated = category.clone();
        ledger.touch();
        Ok(updated)
    }

    pub fn list(ledger: &Ledger, user_id: &RecordId) -> Vec<Category> {
        ledger.categories_for(user_id).cloned().collect()
    }

    fn ensure_unique_name(
        ledger: &Ledger,
        user_id: &RecordId,
        name: &str,
        except: Option<&RecordId>,
    ) -> Result<()> {
        let taken = ledger
            .categories_for(user_id)
            .filter(|category| Some(&category.id) != except)
            .any(|category| category.name().eq_ignore_ascii_case(name));
        if taken {
            return Err(FinanceError::Conflict(format!(
                "category `{name}` already exists"
            )));
        }
        Ok(())
    }
}
