mod common;

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rental_core_cli").unwrap();
    cmd.env("RENTAL_CORE_HOME", home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_prints_package_version() {
    let home = common::scratch_dir();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn obligation_to_generated_movements_flow() {
    let home = common::scratch_dir();

    cli(&home)
        .args(["tenant", "new", "Acme Events"])
        .assert()
        .success()
        .stdout(contains("Tenant `Acme Events` created"));

    cli(&home)
        .args([
            "obligation",
            "add",
            "Warehouse rent",
            "--amount",
            "1200",
            "--day",
            "31",
            "--start",
            "2024-01-01",
            "--category",
            "Rent",
        ])
        .assert()
        .success()
        .stdout(contains("Obligation"));

    cli(&home)
        .args(["generate", "--through", "2024-03-15", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("2024-01-28").and(contains("2 movement(s) would be created")));

    cli(&home)
        .args(["generate", "--through", "2024-03-15"])
        .assert()
        .success()
        .stdout(contains("Created 2 movement(s)"));

    cli(&home)
        .args(["generate", "--through", "2024-03-15"])
        .assert()
        .success()
        .stdout(contains("Created 0 movement(s)"));

    cli(&home)
        .args(["summary", "--from", "2024-01-01", "--to", "2024-03-31"])
        .assert()
        .success()
        .stdout(contains("2400.00 EUR").and(contains("Rent")));

    cli(&home)
        .args(["movement", "list"])
        .assert()
        .success()
        .stdout(contains("2024-02-28").and(contains("pending")));
}

#[test]
fn missing_tenant_fails_with_message() {
    let home = common::scratch_dir();
    cli(&home)
        .args(["obligation", "list"])
        .assert()
        .failure()
        .stderr(contains("no tenant selected"));
}

#[test]
fn invalid_date_is_rejected() {
    let home = common::scratch_dir();
    cli(&home).args(["tenant", "new", "Acme"]).assert().success();
    cli(&home)
        .args(["generate", "--through", "31/03/2024"])
        .assert()
        .failure()
        .stderr(contains("expected YYYY-MM-DD"));
}

#[test]
fn backup_reports_file_name() {
    let home = common::scratch_dir();
    cli(&home).args(["tenant", "new", "Acme"]).assert().success();
    cli(&home)
        .args(["backup", "--note", "month end"])
        .assert()
        .success()
        .stdout(contains("month-end"));
}
