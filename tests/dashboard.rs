mod common;

use chrono::Duration;
use common::{at, category, expense, income, register, setup_test_env};
use fintrack_core::core::filters::{DateRange, TransactionFilter};
use fintrack_core::domain::{EntryKind, NewRecurringTransaction};

#[test]
fn totals_and_breakdown_reflect_user_records() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "dash@example.com");
    let other = register(&store, "other@example.com");
    let salary = category(&store, &user.id, "Salary");
    let groceries = category(&store, &user.id, "Groceries");
    let transport = category(&store, &user.id, "Transport");

    store
        .add_transactions(
            &user.id,
            vec![
                income(&salary.id, 3000.0, "Payroll", at(2025, 3, 1)),
                expense(&groceries.id, 120.0, "Market", at(2025, 3, 2)),
                expense(&transport.id, 40.0, "Bus card", at(2025, 3, 3)),
                expense(&groceries.id, 30.0, "Bakery", at(2025, 3, 4)),
            ],
        )
        .unwrap();
    let other_groceries = category(&store, &other.id, "Groceries");
    store
        .add_transaction(&other.id, expense(&other_groceries.id, 999.0, "Not mine", at(2025, 3, 2)))
        .unwrap();

    let dashboard = store
        .dashboard(&user.id, &TransactionFilter::default(), at(2025, 3, 10))
        .unwrap();

    assert_eq!(dashboard.totals.income, 3000.0);
    assert_eq!(dashboard.totals.expenses, 190.0);
    assert_eq!(dashboard.totals.balance, 2810.0);

    let names: Vec<&str> = dashboard
        .category_breakdown
        .iter()
        .map(|row| row.name.as_str())
        .collect();
    assert_eq!(names, vec!["Groceries", "Transport"]);
    assert_eq!(dashboard.category_breakdown[0].value, 150.0);

    let top = &dashboard.budget_progress[0];
    assert_eq!(top.category, "Transport");
    assert_eq!(top.percentage, 40.0);
    assert_eq!(dashboard.recent_transactions.len(), 4);
    assert_eq!(dashboard.recent_transactions[0].description, "Bakery");
}

#[test]
fn monthly_series_is_calendar_ordered() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "months@example.com");
    let shopping = category(&store, &user.id, "Shopping");
    store
        .add_transactions(
            &user.id,
            vec![
                expense(&shopping.id, 10.0, "Nov", at(2024, 11, 5)),
                expense(&shopping.id, 20.0, "Feb", at(2025, 2, 5)),
                expense(&shopping.id, 5.0, "Feb again", at(2025, 2, 20)),
                expense(&shopping.id, 30.0, "Jan", at(2025, 1, 5)),
            ],
        )
        .unwrap();

    let dashboard = store
        .dashboard(&user.id, &TransactionFilter::default(), at(2025, 3, 1))
        .unwrap();
    let months: Vec<(&str, f64)> = dashboard
        .monthly_series
        .iter()
        .map(|m| (m.month, m.total))
        .collect();
    assert_eq!(months, vec![("Jan", 30.0), ("Feb", 25.0), ("Nov", 10.0)]);
}

#[test]
fn trend_series_keeps_latest_thirty_days_ascending() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "trend@example.com");
    let health = category(&store, &user.id, "Health");
    let start = at(2025, 1, 1);
    let entries = (0..45)
        .map(|day| expense(&health.id, 1.0 + day as f64, "Daily", start + Duration::days(day)))
        .collect();
    store.add_transactions(&user.id, entries).unwrap();

    let dashboard = store
        .dashboard(&user.id, &TransactionFilter::default(), at(2025, 3, 1))
        .unwrap();
    let trend = &dashboard.trend_series;
    assert_eq!(trend.len(), 30);
    assert!(trend.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(trend.last().unwrap().label, "Feb 14");
    assert_eq!(trend.last().unwrap().amount, 45.0);
}

#[test]
fn search_and_range_filters_intersect() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "filter@example.com");
    let groceries = category(&store, &user.id, "Groceries");
    let utilities = category(&store, &user.id, "Utilities");
    let now = at(2025, 6, 30);
    store
        .add_transactions(
            &user.id,
            vec![
                expense(&groceries.id, 12.0, "Coffee beans", now - Duration::days(2)),
                expense(&groceries.id, 8.0, "Coffee filter", now - Duration::days(60)),
                expense(&utilities.id, 90.0, "Power bill", now - Duration::days(3)),
            ],
        )
        .unwrap();

    let filter = TransactionFilter::new(Some("coffee".into()), DateRange::Week);
    let dashboard = store.dashboard(&user.id, &filter, now).unwrap();
    assert_eq!(dashboard.totals.expenses, 12.0);
    assert_eq!(dashboard.recent_transactions.len(), 1);

    let by_category = store
        .dashboard(&user.id, &TransactionFilter::search("utilities"), now)
        .unwrap();
    assert_eq!(by_category.totals.expenses, 90.0);
}

#[test]
fn dashboard_materializes_due_recurring_once() {
    let (store, _, _) = setup_test_env();
    let user = register(&store, "dashrec@example.com");
    let rent = category(&store, &user.id, "Rent");
    store
        .create_recurring_transaction(
            &user.id,
            NewRecurringTransaction {
                amount: 900.0,
                description: "Flat".into(),
                kind: EntryKind::Expense,
                category_id: rent.id,
                day_of_month: 1,
            },
        )
        .unwrap();

    let now = at(2025, 5, 2);
    let first = store
        .dashboard(&user.id, &TransactionFilter::default(), now)
        .unwrap();
    let second = store
        .dashboard(&user.id, &TransactionFilter::default(), now)
        .unwrap();
    assert_eq!(first.totals.expenses, 900.0);
    assert_eq!(first, second);
}
