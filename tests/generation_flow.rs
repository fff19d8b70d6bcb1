mod common;

use common::{date, obligation, setup_test_env};
use rental_core::{
    core::services::{GenerationService, MovementService, ObligationService, SummaryService},
    ledger::{DateWindow, Frequency, MovementKind, RecurringObligation, Tenant},
    storage::TenantStorage,
};

#[test]
fn monthly_backlog_is_generated_once_and_survives_reload() {
    let (mut manager, _config) = setup_test_env();
    manager.create("Stage Hire", Some("ops")).unwrap();
    let tenant = manager.current_mut().unwrap();
    let rent = ObligationService::add(
        tenant,
        obligation(Frequency::Monthly, 31, date(2024, 1, 1)).with_category("Rent"),
    )
    .unwrap();
    ObligationService::add(
        tenant,
        RecurringObligation::new(
            MovementKind::Income,
            400.0,
            "Storage sublet",
            Frequency::Biweekly,
            1,
            date(2024, 1, 1),
        ),
    )
    .unwrap();

    let first = manager.generate_pending(date(2024, 3, 15)).unwrap();
    assert_eq!(first.created_for(rent), 2);
    assert_eq!(first.created, 2 + 5);

    let second = manager.generate_pending(date(2024, 3, 15)).unwrap();
    assert_eq!(second.created, 0);

    manager.close();
    manager.open("Stage Hire", None).unwrap();
    let tenant = manager.current().unwrap();
    assert_eq!(tenant.movements.len(), 7);
    let rent_dates: Vec<_> = MovementService::list(tenant)
        .into_iter()
        .filter(|movement| movement.source_obligation_id == Some(rent))
        .map(|movement| movement.date)
        .collect();
    assert_eq!(rent_dates, vec![date(2024, 1, 28), date(2024, 2, 28)]);
}

#[test]
fn later_cutoff_only_adds_new_dates() {
    let mut tenant = Tenant::new("Lights");
    let id = ObligationService::add(
        &mut tenant,
        obligation(Frequency::Monthly, 31, date(2024, 1, 1)),
    )
    .unwrap();

    GenerationService::generate_for_tenant(&mut tenant, date(2024, 1, 31)).unwrap();
    let report = GenerationService::generate_for_tenant(&mut tenant, date(2024, 3, 31)).unwrap();

    assert_eq!(report.created_for(id), 2);
    assert_eq!(tenant.movements.len(), 3);
    assert_eq!(
        tenant.obligation_ref(id).unwrap().last_generated,
        Some(date(2024, 3, 28))
    );
}

#[test]
fn paused_obligation_catches_up_when_reactivated() {
    let mut tenant = Tenant::new("Audio");
    let id = ObligationService::add(
        &mut tenant,
        obligation(Frequency::Quarterly, 10, date(2024, 1, 1)),
    )
    .unwrap();
    ObligationService::set_active(&mut tenant, id, false).unwrap();

    let paused = GenerationService::generate_for_tenant(&mut tenant, date(2024, 12, 31)).unwrap();
    assert_eq!(paused.created, 0);

    ObligationService::set_active(&mut tenant, id, true).unwrap();
    let resumed = GenerationService::generate_for_tenant(&mut tenant, date(2024, 12, 31)).unwrap();
    assert_eq!(resumed.created, 4);
}

#[test]
fn generated_movements_feed_the_summary() {
    let mut tenant = Tenant::new("Summary");
    ObligationService::add(
        &mut tenant,
        obligation(Frequency::Monthly, 5, date(2024, 1, 1)).with_category("Insurance"),
    )
    .unwrap();
    GenerationService::generate_for_tenant(&mut tenant, date(2024, 6, 30)).unwrap();

    let window = DateWindow::new(date(2024, 4, 1), date(2024, 6, 30)).unwrap();
    let summary = SummaryService::summarize(&tenant, window);

    assert_eq!(summary.movement_count, 3);
    assert_eq!(summary.expense, 450.0);
    assert_eq!(summary.pending_total, 450.0);
    assert_eq!(summary.per_category[0].category, "Insurance");
}

#[test]
fn batch_runs_against_a_reloaded_snapshot() {
    let (manager, _config) = setup_test_env();
    let storage = manager.storage();
    let mut tenant = Tenant::new("Snapshot");
    tenant
        .obligations
        .push(obligation(Frequency::Yearly, 15, date(2022, 6, 1)));
    storage.save(&tenant, "snapshot").unwrap();

    let mut loaded = storage.load("snapshot").unwrap();
    let report = GenerationService::generate_for_tenant(&mut loaded, date(2024, 6, 30)).unwrap();

    assert_eq!(report.created, 3);
    let dates: Vec<_> = loaded.movements.iter().map(|m| m.date).collect();
    assert_eq!(
        dates,
        vec![date(2022, 6, 15), date(2023, 6, 15), date(2024, 6, 15)]
    );
}
