use chrono::NaiveDate;

use crate::core::services::{
    GenerationService, ObligationChanges, ObligationService, ServiceError,
};
use crate::ledger::{Frequency, MovementKind, RecurringObligation, Tenant};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent() -> RecurringObligation {
    RecurringObligation::new(
        MovementKind::Expense,
        1200.0,
        "Warehouse rent",
        Frequency::Monthly,
        5,
        date(2024, 1, 1),
    )
}

#[test]
fn add_rejects_end_before_start() {
    let mut tenant = Tenant::new("Test");
    let obligation = rent().with_end_date(date(2023, 12, 31));

    let err = ObligationService::add(&mut tenant, obligation).unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(_)));
}

#[test]
fn add_rejects_unsupported_frequency() {
    let mut tenant = Tenant::new("Test");
    let mut obligation = rent();
    obligation.frequency = Frequency::parse("fortnightly-ish");

    assert!(ObligationService::add(&mut tenant, obligation).is_err());
}

#[test]
fn edit_clamps_billing_day_and_keeps_marker() {
    let mut tenant = Tenant::new("Test");
    let id = ObligationService::add(&mut tenant, rent()).unwrap();
    GenerationService::generate_for_tenant(&mut tenant, date(2024, 2, 10)).unwrap();

    let mut changes = ObligationChanges::from(tenant.obligation_ref(id).unwrap());
    changes.amount = 1300.0;
    changes.billing_day = 31;
    ObligationService::edit(&mut tenant, id, changes).unwrap();

    let updated = tenant.obligation_ref(id).unwrap();
    assert_eq!(updated.billing_day(), 28);
    assert_eq!(updated.amount, 1300.0);
    assert_eq!(updated.last_generated, Some(date(2024, 2, 5)));
    assert!(tenant.movements.iter().all(|movement| movement.amount == 1200.0));
}

#[test]
fn removing_keeps_generated_movements() {
    let mut tenant = Tenant::new("Test");
    let id = ObligationService::add(&mut tenant, rent()).unwrap();
    GenerationService::generate_for_tenant(&mut tenant, date(2024, 3, 31)).unwrap();

    ObligationService::remove(&mut tenant, id).unwrap();

    assert!(tenant.obligations.is_empty());
    assert_eq!(tenant.movements.len(), 3);
    assert!(tenant
        .movements
        .iter()
        .all(|movement| movement.source_obligation_id == Some(id)));
}

#[test]
fn next_due_is_hidden_for_inactive_obligations() {
    let mut tenant = Tenant::new("Test");
    let id = ObligationService::add(&mut tenant, rent()).unwrap();

    let listed = ObligationService::list_with_next_due(&tenant, date(2024, 4, 6));
    assert_eq!(listed[0].1, Some(date(2024, 5, 5)));

    ObligationService::set_active(&mut tenant, id, false).unwrap();
    let listed = ObligationService::list_with_next_due(&tenant, date(2024, 4, 6));
    assert_eq!(listed[0].1, None);
}
