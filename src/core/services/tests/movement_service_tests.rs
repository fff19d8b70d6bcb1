use chrono::NaiveDate;

use crate::core::services::{MovementService, ServiceError};
use crate::ledger::{
    DateWindow, Frequency, Movement, MovementKind, MovementStatus, RecurringObligation, Tenant,
};
use crate::storage::MovementStore;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn add_rejects_zero_amount() {
    let mut tenant = Tenant::new("Test");
    let movement = Movement::new(MovementKind::Expense, 0.0, "Fuel", date(2024, 1, 3));

    let err = MovementService::add(&mut tenant, movement).unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));
}

#[test]
fn mark_paid_records_payment_once() {
    let mut tenant = Tenant::new("Test");
    let id = MovementService::add(
        &mut tenant,
        Movement::new(MovementKind::Expense, 80.0, "Fuel", date(2024, 1, 3)),
    )
    .unwrap();

    MovementService::mark_paid(&mut tenant, id, date(2024, 1, 5)).unwrap();
    let movement = tenant.movement(id).unwrap();
    assert_eq!(movement.status, MovementStatus::Paid);
    assert_eq!(movement.paid_on, Some(date(2024, 1, 5)));

    let err = MovementService::mark_paid(&mut tenant, id, date(2024, 1, 6)).unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));
}

#[test]
fn edit_keeps_date_of_materialized_rows() {
    let mut tenant = Tenant::new("Test");
    let obligation = RecurringObligation::new(
        MovementKind::Expense,
        500.0,
        "Insurance",
        Frequency::Monthly,
        10,
        date(2024, 1, 1),
    );
    let id = tenant
        .insert_movement(Movement::from_obligation(&obligation, date(2024, 1, 10)))
        .unwrap();

    let changes = Movement::new(MovementKind::Expense, 520.0, "Insurance", date(2024, 1, 20));
    MovementService::edit(&mut tenant, id, changes).unwrap();

    let movement = tenant.movement(id).unwrap();
    assert_eq!(movement.amount, 520.0);
    assert_eq!(movement.date, date(2024, 1, 10));
}

#[test]
fn list_in_window_is_sorted_and_bounded() {
    let mut tenant = Tenant::new("Test");
    for (day, label) in [(20, "late"), (2, "early"), (40, "outside")] {
        let when = date(2024, 1, 1) + chrono::Duration::days(day - 1);
        MovementService::add(
            &mut tenant,
            Movement::new(MovementKind::Income, 10.0, label, when),
        )
        .unwrap();
    }
    let window = DateWindow::month_of(date(2024, 1, 15)).unwrap();

    let labels: Vec<&str> = MovementService::list_in_window(&tenant, window)
        .into_iter()
        .map(|movement| movement.description.as_str())
        .collect();
    assert_eq!(labels, vec!["early", "late"]);
}
