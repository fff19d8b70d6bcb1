use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = run_capture("git", &["rev-parse", "--short", "HEAD"])
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    emit("RENTAL_CORE_BUILD_HASH", &hash);

    let status = match run_capture("git", &["status", "--porcelain"]) {
        Some(out) if out.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    emit("RENTAL_CORE_BUILD_STATUS", status);

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    emit("RENTAL_CORE_BUILD_TIMESTAMP", &timestamp);

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());
    emit("RENTAL_CORE_BUILD_TARGET", &target);

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_string());
    emit("RENTAL_CORE_BUILD_PROFILE", &profile);

    let rustc = run_capture("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());
    emit("RENTAL_CORE_BUILD_RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={key}={value}");
}

/// Runs a command and returns its trimmed stdout when it exits successfully.
fn run_capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
