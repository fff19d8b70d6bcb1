use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::core::errors::RentalError;

const DEFAULT_DIR_NAME: &str = ".rental_core";
const HOME_ENV: &str = "RENTAL_CORE_HOME";
const TENANT_DIR: &str = "tenants";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";

/// Resolves the on-disk layout under the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// `RENTAL_CORE_HOME` when set, otherwise `~/.rental_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn tenant_dir_in(base: &Path) -> PathBuf {
        base.join(TENANT_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_BACKUP_DIR)
    }
}

pub fn ensure_dir(path: &Path) -> Result<(), RentalError> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Lower-cases a free-form note into a dash-separated slug suitable for file names.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
