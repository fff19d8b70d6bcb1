mod common;

use std::fs;
use std::path::Path;

use assert_fs::prelude::*;
use predicates::prelude::*;
use common::{date, obligation, scratch_dir};
use rental_core::{
    core::errors::RentalError,
    ledger::{Frequency, Movement, Tenant},
    storage::{json_backend, tenant_warnings, JsonStorage, MovementStore, TenantStorage},
};

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => String::from("tmp"),
    };
    tmp.set_extension(ext);
    tmp
}

fn sample_tenant() -> Tenant {
    let mut tenant = Tenant::new("Reliable");
    let rent = obligation(Frequency::Monthly, 12, date(2024, 1, 1));
    tenant
        .insert_movement(Movement::from_obligation(&rent, date(2024, 1, 12)))
        .unwrap();
    tenant.obligations.push(rent);
    tenant
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let store = JsonStorage::new(Some(scratch_dir()), Some(2)).unwrap();
    let mut tenant = sample_tenant();
    store.save(&tenant, "reliable").expect("initial save");
    let path = store.tenant_path("reliable");
    let original = fs::read_to_string(&path).expect("read original file");

    // A directory at the staging path makes File::create fail.
    fs::create_dir_all(tmp_path_for(&path)).unwrap();

    tenant.name = "Changed".into();
    let result = store.save(&tenant, "reliable");
    assert!(result.is_err(), "expected save to fail when temp path is a directory");

    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(current, original, "failed save must not corrupt the original file");
}

#[test]
fn unknown_frequency_survives_a_round_trip() {
    let dir = scratch_dir();
    let path = dir.join("legacy.json");
    let mut tenant = sample_tenant();
    tenant.obligations[0].frequency = Frequency::parse("fortnightly");
    json_backend::save_tenant_to_path(&tenant, &path).unwrap();

    let loaded = json_backend::load_tenant_from_path(&path).unwrap();

    assert_eq!(
        loaded.obligations[0].frequency,
        Frequency::Unsupported("fortnightly".into())
    );
    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"fortnightly\""));
    assert_eq!(tenant_warnings(&loaded).len(), 1);
}

#[test]
fn out_of_range_billing_day_is_clamped_on_load() {
    let dir = scratch_dir();
    let path = dir.join("clamp.json");
    json_backend::save_tenant_to_path(&sample_tenant(), &path).unwrap();
    let raw = fs::read_to_string(&path).unwrap();
    fs::write(&path, raw.replace("\"billing_day\": 12", "\"billing_day\": 31")).unwrap();

    let loaded = json_backend::load_tenant_from_path(&path).unwrap();
    assert_eq!(loaded.obligations[0].billing_day(), 28);

    fs::write(&path, raw.replace("\"billing_day\": 12", "\"billing_day\": -4")).unwrap();
    let loaded = json_backend::load_tenant_from_path(&path).unwrap();
    assert_eq!(loaded.obligations[0].billing_day(), 1);
}

#[test]
fn corrupt_file_reports_storage_error() {
    let store = JsonStorage::new(Some(scratch_dir()), Some(2)).unwrap();
    fs::write(store.tenant_path("broken"), "{ not json").unwrap();

    let err = store.load("broken").unwrap_err();
    assert!(matches!(err, RentalError::StorageError(_)));
}

#[test]
fn backups_list_newest_first() {
    let store = JsonStorage::new(Some(scratch_dir()), Some(5)).unwrap();
    let tenant = sample_tenant();
    let first = store.backup(&tenant, "reliable", Some("first")).unwrap();
    let second = store.backup(&tenant, "reliable", Some("second")).unwrap();

    let listed = store.list_backups("reliable").unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].file_name, second.file_name);
    assert_eq!(listed[1].file_name, first.file_name);
}

#[test]
fn missing_backup_cannot_be_restored() {
    let store = JsonStorage::new(Some(scratch_dir()), Some(5)).unwrap();
    store.save(&sample_tenant(), "reliable").unwrap();

    let err = store.restore("reliable", "20000101_000000-00.json").unwrap_err();
    assert!(matches!(err, RentalError::StorageError(_)));
}

#[test]
fn tenant_and_backup_files_land_under_the_home_directory() {
    let home = assert_fs::TempDir::new().unwrap();
    let store = JsonStorage::new(Some(home.path().to_path_buf()), Some(3)).unwrap();
    let tenant = sample_tenant();

    store.save(&tenant, "Reliable Rentals").unwrap();
    let backup = store
        .backup(&tenant, "Reliable Rentals", Some("month end"))
        .unwrap();

    home.child("tenants/reliable_rentals.json")
        .assert(predicate::path::is_file())
        .assert(predicate::str::contains("\"Equipment insurance\""));
    home.child("tenants/reliable_rentals.json.tmp")
        .assert(predicate::path::missing());
    home.child("backups/reliable_rentals")
        .child(&backup.file_name)
        .assert(predicate::path::is_file());
    assert!(backup.file_name.ends_with("_month-end.json"));

    home.close().unwrap();
}
