mod common;

use std::fs;

use common::setup_test_env;
use rental_core::{config::Config, core::errors::RentalError};

#[test]
fn missing_file_yields_defaults() {
    let (_manager, config) = setup_test_env();
    let loaded = config.load().unwrap();
    assert_eq!(loaded, Config::default());
    assert_eq!(loaded.currency, "EUR");
    assert_eq!(loaded.backup_retention, 5);
}

#[test]
fn saved_values_are_reloaded() {
    let (_manager, config) = setup_test_env();
    let mut settings = Config::default();
    settings.default_tenant = Some("acme".into());
    settings.log_level = Some("rental_core=debug".into());
    config.save(&settings).unwrap();

    assert_eq!(config.load().unwrap(), settings);
}

#[test]
fn corrupt_file_is_a_config_error() {
    let (_manager, config) = setup_test_env();
    fs::write(config.path(), "[]").unwrap();

    let err = config.load().unwrap_err();
    assert!(matches!(err, RentalError::ConfigError(_)));
}

#[test]
fn backup_and_restore_round_trip() {
    let (_manager, config) = setup_test_env();
    let mut settings = Config::default();
    settings.currency = "USD".into();
    config.save(&settings).unwrap();
    let name = config.backup(&settings, Some("Before Audit")).unwrap();
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-audit.json"));

    config.save(&Config::default()).unwrap();
    let restored = config.restore(&name).unwrap();

    assert_eq!(restored.currency, "USD");
    assert_eq!(config.load().unwrap().currency, "USD");
    assert_eq!(config.list_backups().unwrap(), vec![name]);
}
