use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    core::{
        errors::RentalError,
        utils::{ensure_dir, sanitize_note, PathResolver},
    },
    ledger::Tenant,
};

use super::{Result, TenantBackupInfo, TenantStorage};

const TENANT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// File-per-tenant JSON persistence with rolling backups.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    tenants_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let tenants_dir = PathResolver::tenant_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&tenants_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            tenants_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn tenant_path(&self, name: &str) -> PathBuf {
        self.tenants_dir
            .join(format!("{}.{}", canonical_name(name), TENANT_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn next_backup_path(&self, name: &str, note: Option<&str>) -> PathBuf {
        let dir = self.backup_dir(name);
        let stamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let suffix = sanitize_note(note)
            .map(|label| format!("_{}", label))
            .unwrap_or_default();
        let mut attempt = 0u32;
        loop {
            let path = dir.join(format!(
                "{}-{:02}{}.{}",
                stamp, attempt, suffix, TENANT_EXTENSION
            ));
            if !path.exists() {
                return path;
            }
            attempt += 1;
        }
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for stale in backups.iter().skip(self.retention) {
            debug!(path = %stale.path.display(), "pruning tenant backup");
            let _ = fs::remove_file(&stale.path);
        }
        Ok(())
    }
}

impl TenantStorage for JsonStorage {
    fn save(&self, tenant: &Tenant, name: &str) -> Result<()> {
        let path = self.tenant_path(name);
        save_tenant_to_path(tenant, &path)?;
        debug!(tenant = name, path = %path.display(), "tenant saved");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Tenant> {
        let path = self.tenant_path(name);
        if !path.exists() {
            return Err(RentalError::NotFound(format!("tenant `{}`", name)));
        }
        load_tenant_from_path(&path)
    }

    fn exists(&self, name: &str) -> bool {
        self.tenant_path(name).exists()
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.tenants_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TENANT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn backup(&self, tenant: &Tenant, name: &str, note: Option<&str>) -> Result<TenantBackupInfo> {
        ensure_dir(&self.backup_dir(name))?;
        let path = self.next_backup_path(name, note);
        let json = serde_json::to_string_pretty(tenant)?;
        write_atomic(&path, &json)?;
        info!(tenant = name, path = %path.display(), "tenant backup written");
        let file_name = path
            .file_name()
            .and_then(|file| file.to_str())
            .unwrap_or_default()
            .to_string();
        self.prune_backups(name)?;
        Ok(TenantBackupInfo {
            tenant: canonical_name(name),
            file_name,
            path,
        })
    }

    fn list_backups(&self, name: &str) -> Result<Vec<TenantBackupInfo>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TENANT_EXTENSION) {
                continue;
            }
            let file_name = match path.file_name().and_then(|file| file.to_str()) {
                Some(file) => file.to_string(),
                None => continue,
            };
            entries.push(TenantBackupInfo {
                tenant: canonical_name(name),
                file_name,
                path,
            });
        }
        entries.sort_by(|a, b| {
            let key_a = (parse_backup_timestamp(&a.file_name), &a.file_name);
            let key_b = (parse_backup_timestamp(&b.file_name), &b.file_name);
            key_b.cmp(&key_a)
        });
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<Tenant> {
        let backup_path = self.backup_dir(name).join(backup_name);
        if !backup_path.exists() {
            return Err(RentalError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let tenant = load_tenant_from_path(&backup_path)?;
        save_tenant_to_path(&tenant, &self.tenant_path(name))?;
        info!(tenant = name, backup = backup_name, "tenant restored from backup");
        Ok(tenant)
    }
}

/// Writes the tenant as pretty JSON, staging through a temporary file first.
pub fn save_tenant_to_path(tenant: &Tenant, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(tenant)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn load_tenant_from_path(path: &Path) -> Result<Tenant> {
    let data = fs::read_to_string(path)?;
    let tenant: Tenant = serde_json::from_str(&data)?;
    Ok(tenant)
}

/// Lower-case ASCII slug used for file and directory names.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "tenant".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    let mut parts = file_name.split('_');
    let date_part = parts.next()?;
    let time_part = parts.next()?.get(..6)?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
