//! Monthly materialization of recurring templates.
//!
//! The engine runs opportunistically (every dashboard read) instead of on a
//! schedule, so it must be idempotent within a month and cheap when nothing is
//! due. Each template yields at most one transaction per call; missed months are
//! not back-filled.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::{Ledger, RecordId, RecurringTransaction, Transaction};

/// Knobs for the day-of-month comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurrencePolicy {
    /// Treat a `day_of_month` past the end of the month as the month's last day.
    /// Off by default: a template on day 31 is skipped in shorter months.
    pub clamp_to_month_end: bool,
}

/// Returns whether `template` should produce a transaction at `as_of`.
pub fn is_due(
    template: &RecurringTransaction,
    as_of: DateTime<Utc>,
    policy: RecurrencePolicy,
) -> bool {
    let today = as_of.date_naive();
    if today.day() < effective_day(template.day_of_month, today, policy) {
        return false;
    }
    match template.last_generated {
        None => true,
        Some(last) => !same_month(last.date_naive(), today),
    }
}

/// Generates the transactions due for `user_id` at `as_of`, appends them to the
/// ledger and stamps each template's `last_generated`.
///
/// Returns the generated transactions; an empty result means the ledger was not
/// touched.
pub fn materialize_due(
    ledger: &mut Ledger,
    user_id: &RecordId,
    as_of: DateTime<Utc>,
    policy: RecurrencePolicy,
) -> Vec<Transaction> {
    let mut generated = Vec::new();

    for template in ledger
        .recurring_transactions
        .iter_mut()
        .filter(|rt| &rt.user_id == user_id)
    {
        if !is_due(template, as_of, policy) {
            continue;
        }
        let txn = template.instantiate(as_of);
        template.mark_generated(as_of);
        info!(
            recurring_id = %template.id,
            transaction_id = %txn.id,
            amount = txn.amount,
            "materialized recurring transaction"
        );
        generated.push(txn);
    }

    if generated.is_empty() {
        debug!(%user_id, "no recurring transactions due");
        return generated;
    }

    ledger.transactions.extend(generated.iter().cloned());
    ledger.touch();
    generated
}

/// Lists the user's templates that would materialize at `as_of`.
pub fn due_templates<'a>(
    ledger: &'a Ledger,
    user_id: &'a RecordId,
    as_of: DateTime<Utc>,
    policy: RecurrencePolicy,
) -> Vec<&'a RecurringTransaction> {
    ledger
        .recurring_for(user_id)
        .filter(|rt| is_due(rt, as_of, policy))
        .collect()
}

fn effective_day(day_of_month: u32, date: NaiveDate, policy: RecurrencePolicy) -> u32 {
    if policy.clamp_to_month_end {
        day_of_month.min(days_in_month(date))
    } else {
        day_of_month
    }
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub(crate) fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}
