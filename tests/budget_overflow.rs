mod common;

use common::{at, category, expense, income, register, setup_test_env};
use fintrack_core::domain::{CategoryPatch, EntryKind, NewCategory, RecordId};

#[test]
fn crossing_budget_is_reported_with_category_name() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "budget@example.com");
    let groceries = category(&store, &user.id, "Groceries");
    assert_eq!(groceries.budget, Some(500.0));

    let first = store
        .add_transaction(&user.id, expense(&groceries.id, 450.0, "Bulk shop", at(2025, 2, 1)))
        .unwrap();
    assert!(!first.budget.is_over_budget);

    let second = store
        .add_transaction(&user.id, expense(&groceries.id, 100.0, "Top-up", at(2025, 2, 3)))
        .unwrap();
    assert!(second.budget.is_over_budget);
    assert_eq!(second.budget.category_name.as_deref(), Some("Groceries"));
    assert_eq!(second.budget.spent, 550.0);
    assert_eq!(second.budget.budget, Some(500.0));
}

#[test]
fn spend_accumulates_across_months() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "alltime@example.com");
    let fun = category(&store, &user.id, "Entertainment");

    store
        .add_transaction(&user.id, expense(&fun.id, 100.0, "Concert", at(2024, 11, 2)))
        .unwrap();
    let receipt = store
        .add_transaction(&user.id, expense(&fun.id, 60.0, "Cinema", at(2025, 3, 9)))
        .unwrap();
    assert!(receipt.budget.is_over_budget);
}

#[test]
fn income_and_unbudgeted_categories_never_warn() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "nowarn@example.com");
    let salary = category(&store, &user.id, "Salary");
    let receipt = store
        .add_transaction(&user.id, income(&salary.id, 9000.0, "Payroll", at(2025, 1, 31)))
        .unwrap();
    assert!(!receipt.budget.is_over_budget);

    let misc = store
        .create_category(
            &user.id,
            NewCategory {
                name: "Misc".into(),
                kind: EntryKind::Expense,
                budget: Some(0.0),
            },
        )
        .unwrap();
    let receipt = store
        .add_transaction(&user.id, expense(&misc.id, 5000.0, "Whatever", at(2025, 1, 31)))
        .unwrap();
    assert!(!receipt.budget.is_over_budget);
}

#[test]
fn missing_category_degrades_to_no_check() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "ghostcat@example.com");
    let receipt = store
        .add_transaction(&user.id, expense(&RecordId::generate(), 10.0, "Orphan", at(2025, 1, 1)))
        .unwrap();
    assert!(!receipt.budget.is_over_budget);
    assert!(receipt.budget.category_name.is_none());
    assert_eq!(store.get_transactions(&user.id).unwrap().len(), 1);
}

#[test]
fn raising_budget_clears_overflow() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "raise@example.com");
    let transport = category(&store, &user.id, "Transport");
    store
        .add_transaction(&user.id, expense(&transport.id, 150.0, "Train pass", at(2025, 4, 1)))
        .unwrap();
    assert!(store.evaluate_budget(&user.id, &transport.id).unwrap().is_over_budget);

    store
        .update_category(
            &user.id,
            &transport.id,
            CategoryPatch {
                budget: Some(Some(200.0)),
                ..CategoryPatch::default()
            },
        )
        .unwrap();
    assert!(!store.evaluate_budget(&user.id, &transport.id).unwrap().is_over_budget);
}
