mod common;

use chrono::NaiveDate;
use common::{at, category, expense, register, setup_test_env};
use fintrack_core::domain::{
    EntryKind, GoalPatch, ImportRow, NewCategory, NewGoal, NewRecurringTransaction, NewWallet,
    RecordId, TransactionPatch, UserPatch, WalletKind, WalletPatch,
};
use fintrack_core::FinanceError;

#[test]
fn registration_seeds_categories_and_rejects_duplicates() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "Dup@Example.com");
    assert_eq!(user.email, "dup@example.com");
    assert_eq!(store.get_categories(&user.id).unwrap().len(), 10);

    let err = store
        .register_user("dup@example.com", "Again", "hash")
        .unwrap_err();
    assert!(matches!(err, FinanceError::Conflict(_)));
    assert_eq!(store.snapshot().unwrap().users.len(), 1);
}

#[test]
fn profile_update_and_login_history() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "profile@example.com");
    let updated = store
        .update_user(
            &user.id,
            UserPatch {
                name: Some("Renamed".into()),
                phone: Some(Some("+1 555 0100".into())),
                ..UserPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.phone.as_deref(), Some("+1 555 0100"));

    for day in 1..=25 {
        store
            .record_login(&user.id, "10.0.0.1", "laptop", at(2025, 1, day))
            .unwrap();
    }
    let history = store.user(&user.id).unwrap().login_history;
    assert_eq!(history.len(), 20);
    assert_eq!(history[0].date, at(2025, 1, 25));
}

#[test]
fn unknown_ids_are_not_found() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "missing@example.com");
    let ghost = RecordId::generate();

    assert!(store.user(&ghost).unwrap_err().is_not_found());
    assert!(store
        .update_transaction(&user.id, &ghost, TransactionPatch::default())
        .unwrap_err()
        .is_not_found());
    assert!(store.delete_transaction(&user.id, &ghost).unwrap_err().is_not_found());
    assert!(store
        .delete_recurring_transaction(&user.id, &ghost)
        .unwrap_err()
        .is_not_found());
    assert!(store.delete_goal(&user.id, &ghost).unwrap_err().is_not_found());
    assert!(store.delete_wallet(&user.id, &ghost).unwrap_err().is_not_found());
    assert!(store
        .add_transaction(&ghost, expense(&ghost, 1.0, "x", at(2025, 1, 1)))
        .unwrap_err()
        .is_not_found());
}

#[test]
fn invalid_input_leaves_store_unchanged() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "invalid@example.com");
    let groceries = category(&store, &user.id, "Groceries");
    let before = store.snapshot().unwrap();

    let negative = store.add_transaction(&user.id, expense(&groceries.id, -5.0, "Refund", at(2025, 1, 1)));
    assert!(matches!(negative, Err(FinanceError::Validation(_))));

    let blank = store.add_transaction(&user.id, expense(&groceries.id, 5.0, "   ", at(2025, 1, 1)));
    assert!(matches!(blank, Err(FinanceError::Validation(_))));

    let bad_day = store.create_recurring_transaction(
        &user.id,
        NewRecurringTransaction {
            amount: 10.0,
            description: "Gym".into(),
            kind: EntryKind::Expense,
            category_id: groceries.id.clone(),
            day_of_month: 32,
        },
    );
    assert!(matches!(bad_day, Err(FinanceError::Validation(_))));

    let batch = store.add_transactions(
        &user.id,
        vec![
            expense(&groceries.id, 5.0, "Fine", at(2025, 1, 1)),
            expense(&groceries.id, 0.0, "Zero", at(2025, 1, 1)),
        ],
    );
    let err = batch.unwrap_err();
    assert!(err.to_string().contains("entry 2"));

    assert_eq!(store.snapshot().unwrap(), before);
}

#[test]
fn transaction_update_and_delete() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "edit@example.com");
    let groceries = category(&store, &user.id, "Groceries");
    let shopping = category(&store, &user.id, "Shopping");
    let receipt = store
        .add_transaction(&user.id, expense(&groceries.id, 20.0, "Lunch", at(2025, 1, 2)))
        .unwrap();
    let id = receipt.transaction.id;

    let updated = store
        .update_transaction(
            &user.id,
            &id,
            TransactionPatch {
                amount: Some(25.0),
                category_id: Some(shopping.id.clone()),
                ..TransactionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount, 25.0);
    assert_eq!(updated.category_id, shopping.id);
    assert_eq!(updated.description, "Lunch");

    let removed = store.delete_transaction(&user.id, &id).unwrap();
    assert_eq!(removed.id, id);
    assert!(store.get_transactions(&user.id).unwrap().is_empty());
}

#[test]
fn users_cannot_touch_each_others_records() {
    let (store, _, _) = setup_test_env();
    let owner = register(&store, "owner@example.com");
    let intruder = register(&store, "intruder@example.com");
    let groceries = category(&store, &owner.id, "Groceries");
    let receipt = store
        .add_transaction(&owner.id, expense(&groceries.id, 9.0, "Mine", at(2025, 1, 1)))
        .unwrap();

    let err = store
        .delete_transaction(&intruder.id, &receipt.transaction.id)
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(store.get_transactions(&intruder.id).unwrap().is_empty());
    assert_eq!(store.get_transactions(&owner.id).unwrap().len(), 1);
}

#[test]
fn category_names_are_unique_per_user() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "cats@example.com");
    let other = register(&store, "othercats@example.com");
    let travel = NewCategory {
        name: "Travel".into(),
        kind: EntryKind::Expense,
        budget: Some(300.0),
    };
    store.create_category(&user.id, travel.clone()).unwrap();
    let dup = store.create_category(
        &user.id,
        NewCategory {
            name: "travel".into(),
            ..travel.clone()
        },
    );
    assert!(matches!(dup, Err(FinanceError::Conflict(_))));
    assert!(store.create_category(&other.id, travel).is_ok());
}

#[test]
fn import_resolves_categories_and_signs() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "import@example.com");
    let now = at(2025, 4, 4);
    let imported = store
        .import_transactions(
            &user.id,
            vec![
                ImportRow {
                    description: Some("Coffee".into()),
                    amount: -4.5,
                    category: Some("groceries".into()),
                    ..ImportRow::default()
                },
                ImportRow {
                    amount: 250.0,
                    category: Some("Unknown".into()),
                    ..ImportRow::default()
                },
            ],
            now,
        )
        .unwrap();

    assert_eq!(imported.len(), 2);
    assert_eq!(imported[0].kind, EntryKind::Expense);
    assert_eq!(imported[0].amount, 4.5);
    assert_eq!(imported[0].category_id, category(&store, &user.id, "Groceries").id);
    assert_eq!(imported[1].kind, EntryKind::Income);
    assert_eq!(imported[1].description, "Imported Transaction");
    assert_eq!(imported[1].date, now);
    assert_eq!(imported[1].category_id, category(&store, &user.id, "Salary").id);
}

#[test]
fn goals_track_contributions() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "goals@example.com");
    let goal = store
        .create_goal(
            &user.id,
            NewGoal {
                name: "Emergency fund".into(),
                target_amount: 1000.0,
                deadline: NaiveDate::from_ymd_opt(2025, 12, 31),
                color: None,
            },
        )
        .unwrap();
    assert_eq!(goal.current_amount, 0.0);

    let goal = store.contribute_to_goal(&user.id, &goal.id, 600.0).unwrap();
    assert_eq!(goal.progress_percentage(), 60.0);
    let goal = store.contribute_to_goal(&user.id, &goal.id, -900.0).unwrap();
    assert_eq!(goal.current_amount, 0.0);

    let goal = store
        .update_goal(
            &user.id,
            &goal.id,
            GoalPatch {
                target_amount: Some(2000.0),
                ..GoalPatch::default()
            },
        )
        .unwrap();
    assert_eq!(goal.target_amount, 2000.0);
    assert_eq!(store.get_goals(&user.id).unwrap().len(), 1);
}

#[test]
fn wallets_crud() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "wallets@example.com");
    let wallet = store
        .create_wallet(
            &user.id,
            NewWallet {
                name: "Checking".into(),
                kind: WalletKind::Bank,
                initial_balance: Some(150.0),
                color: None,
            },
        )
        .unwrap();
    let renamed = store
        .update_wallet(
            &user.id,
            &wallet.id,
            WalletPatch {
                name: Some("Main account".into()),
                ..WalletPatch::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Main account");
    assert_eq!(renamed.initial_balance, 150.0);

    store.delete_wallet(&user.id, &wallet.id).unwrap();
    assert!(store.get_wallets(&user.id).unwrap().is_empty());
}
