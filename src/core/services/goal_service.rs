//! Savings goals: creation, edits and contributions.

use chrono::Utc;
use tracing::info;

use crate::core::errors::{FinanceError, Result};
use crate::core::services::{
    require_finite, require_non_negative, require_positive, require_text, require_user,
};
use crate::domain::{Goal, GoalPatch, Ledger, NewGoal, RecordId};

pub struct GoalService;

impl GoalService {
    pub fn create(ledger: &mut Ledger, user_id: &RecordId, input: NewGoal) -> Result<Goal> {
        require_user(ledger, user_id)?;
        let name = require_text("name", &input.name)?;
        require_positive("target amount", input.target_amount)?;

        let mut goal = Goal::new(user_id.clone(), name, input.target_amount);
        goal.deadline = input.deadline;
        if let Some(color) = input.color.filter(|c| !c.trim().is_empty()) {
            goal.color = color;
        }
        ledger.goals.push(goal.clone());
        ledger.touch();
        info!(goal_id = %goal.id, target = goal.target_amount, "goal created");
        Ok(goal)
    }

    pub fn update(
        ledger: &mut Ledger,
        user_id: &RecordId,
        id: &RecordId,
        patch: GoalPatch,
    ) -> Result<Goal> {
        let name = patch
            .name
            .as_deref()
            .map(|name| require_text("name", name))
            .transpose()?;
        if let Some(target) = patch.target_amount {
            require_positive("target amount", target)?;
        }
        if let Some(current) = patch.current_amount {
            require_non_negative("current amount", current)?;
        }

        let goal = ledger
            .goal_mut(user_id, id)
            .ok_or_else(|| FinanceError::GoalNotFound(id.clone()))?;
        if let Some(name) = name {
            goal.name = name;
        }
        if let Some(target) = patch.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = patch.current_amount {
            goal.current_amount = current;
        }
        if let Some(deadline) = patch.deadline {
            goal.deadline = deadline;
        }
        if let Some(color) = patch.color {
            goal.color = color;
        }
        goal.updated_at = Utc::now();
        let updated = goal.clone();
        ledger.touch();
        Ok(updated)
    }

    /// Adds `amount` to the saved total. Negative amounts withdraw, but the
    /// saved total never drops below zero.
    pub fn contribute(
        ledger: &mut Ledger,
        user_id: &RecordId,
        id: &RecordId,
        amount: f64,
    ) -> Result<Goal> {
        require_finite("amount", amount)?;
        let goal = ledger
            .goal_mut(user_id, id)
            .ok_or_else(|| FinanceError::GoalNotFound(id.clone()))?;
        goal.current_amount = (goal.current_amount + amount).max(0.0);
        goal.updated_at = Utc::now();
        let updated = goal.clone();
        ledger.touch();
        if updated.is_reached() {
            info!(goal_id = %updated.id, "goal reached");
        }
        Ok(updated)
    }

    pub fn remove(ledger: &mut Ledger, user_id: &RecordId, id: &RecordId) -> Result<Goal> {
        let position = ledger
            .goals
            .iter()
            .position(|goal| &goal.id == id && &goal.user_id == user_id)
            .ok_or_else(|| FinanceError::GoalNotFound(id.clone()))?;
        let removed = ledger.goals.remove(position);
        ledger.touch();
        Ok(removed)
    }

    pub fn list(ledger: &Ledger, user_id: &RecordId) -> Vec<Goal> {
        ledger.goals_for(user_id).cloned().collect()
    }
}
