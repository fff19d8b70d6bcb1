#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rental_core::{
    config::ConfigManager,
    core::TenantManager,
    ledger::{Frequency, MovementKind, RecurringObligation},
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn scratch_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (TenantManager, ConfigManager) {
    let base = scratch_dir();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage backend");
    let tenant_manager = TenantManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (tenant_manager, config_manager)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn obligation(frequency: Frequency, billing_day: i64, start: NaiveDate) -> RecurringObligation {
    RecurringObligation::new(
        MovementKind::Expense,
        150.0,
        "Equipment insurance",
        frequency,
        billing_day,
        start,
    )
}

pub fn all_frequencies() -> Vec<Frequency> {
    vec![
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Bimonthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ]
}
