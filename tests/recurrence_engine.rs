mod common;

use std::sync::Arc;

use chrono::Datelike;
use common::{at, category, register, setup_test_env};
use fintrack_core::core::record_store::{LoadPolicy, RecordStore};
use fintrack_core::core::recurrence::RecurrencePolicy;
use fintrack_core::domain::{EntryKind, NewRecurringTransaction, RecordId};
use fintrack_core::storage::MemoryStorage;

fn monthly(category_id: &RecordId, day_of_month: u32) -> NewRecurringTransaction {
    NewRecurringTransaction {
        amount: 1200.0,
        description: "Rent".into(),
        kind: EntryKind::Expense,
        category_id: category_id.clone(),
        day_of_month,
    }
}

#[test]
fn first_run_waits_for_day_of_month() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "first@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(&user.id, monthly(&rent.id, 15))
        .unwrap();

    assert!(store.process_recurring(&user.id, at(2025, 3, 14)).unwrap().is_empty());

    let generated = store.process_recurring(&user.id, at(2025, 3, 15)).unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0].date, at(2025, 3, 15));
    assert_eq!(generated[0].category_id, rent.id);

    let template = &store.get_recurring_transactions(&user.id).unwrap()[0];
    assert_eq!(template.last_generated, Some(at(2025, 3, 15)));
}

#[test]
fn same_day_processing_is_idempotent() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "idem@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(&user.id, monthly(&rent.id, 1))
        .unwrap();

    let now = at(2025, 6, 1);
    assert_eq!(store.process_recurring(&user.id, now).unwrap().len(), 1);
    assert!(store.process_recurring(&user.id, now).unwrap().is_empty());
    assert_eq!(store.get_transactions(&user.id).unwrap().len(), 1);
}

#[test]
fn month_rollover_waits_for_day_again() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "roll@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(&user.id, monthly(&rent.id, 15))
        .unwrap();
    assert_eq!(store.process_recurring(&user.id, at(2025, 1, 20)).unwrap().len(), 1);

    assert!(store.process_recurring(&user.id, at(2025, 2, 10)).unwrap().is_empty());
    let feb = store.process_recurring(&user.id, at(2025, 2, 16)).unwrap();
    assert_eq!(feb.len(), 1);
    assert_eq!(feb[0].date.month(), 2);
}

#[test]
fn missed_months_are_not_backfilled() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "gap@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(&user.id, monthly(&rent.id, 5))
        .unwrap();
    store.process_recurring(&user.id, at(2025, 1, 5)).unwrap();

    let later = store.process_recurring(&user.id, at(2025, 5, 20)).unwrap();
    assert_eq!(later.len(), 1);
    assert_eq!(store.get_transactions(&user.id).unwrap().len(), 2);
}

#[test]
fn day_31_depends_on_clamp_policy() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "d31@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(&user.id, monthly(&rent.id, 31))
        .unwrap();
    assert!(store.process_recurring(&user.id, at(2025, 4, 30)).unwrap().is_empty());

    let clamped = RecordStore::in_memory().with_recurrence_policy(RecurrencePolicy {
        clamp_to_month_end: true,
    });
    let other = register(&clamped, "clamp@example.com");
    let rent = category(&clamped, &other.id, "Rent");
    clamped
        .create_recurring_transaction(&other.id, monthly(&rent.id, 31))
        .unwrap();
    assert_eq!(clamped.process_recurring(&other.id, at(2025, 4, 30)).unwrap().len(), 1);
}

#[test]
fn nothing_due_means_no_write() {
    let storage = Arc::new(MemoryStorage::new());
    let store = RecordStore::open(Box::new(Arc::clone(&storage)), LoadPolicy::Strict).unwrap();
    let user = register(&store, "quiet@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(&user.id, monthly(&rent.id, 20))
        .unwrap();
    let writes = storage.save_count();

    assert!(store.process_recurring(&user.id, at(2025, 7, 10)).unwrap().is_empty());
    assert_eq!(storage.save_count(), writes);

    assert_eq!(store.process_recurring(&user.id, at(2025, 7, 21)).unwrap().len(), 1);
    assert_eq!(storage.save_count(), writes + 1);
}

#[test]
fn templates_of_other_users_are_untouched() {
    let (store, _, _) = setup_test_env();
    let alice = register(&store, "alice@example.com");
    let bob = register(&store, "bob@example.com");
    let rent = category(&store, &bob.id, "Rent");
    store
        .create_recurring_transaction(&bob.id, monthly(&rent.id, 1))
        .unwrap();

    assert!(store.process_recurring(&alice.id, at(2025, 8, 2)).unwrap().is_empty());
    assert!(store.get_recurring_transactions(&bob.id).unwrap()[0]
        .last_generated
        .is_none());
}
