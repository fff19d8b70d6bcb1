use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::RentalError,
    utils::{ensure_dir, sanitize_note, PathResolver},
};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_BACKUP_RETENTION: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_tenant: Option<String>,
    #[serde(default = "default_retention")]
    pub backup_retention: usize,
    /// Extra `tracing` directive, e.g. `rental_core=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_retention() -> usize {
    DEFAULT_BACKUP_RETENTION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "es-ES".into(),
            currency: "EUR".into(),
            default_tenant: None,
            backup_retention: DEFAULT_BACKUP_RETENTION,
            log_level: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, RentalError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, RentalError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    pub fn load(&self) -> Result<Config, RentalError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            RentalError::ConfigError(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), RentalError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, RentalError> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut name = format!("config_{}", timestamp);
        if let Some(label) = sanitize_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(&format!(".{}", BACKUP_EXTENSION));
        let path = self.backups_dir.join(&name);
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&path, &json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, RentalError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(RentalError::ConfigError(format!(
                "configuration backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, RentalError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| (parse_timestamp(b), b).cmp(&(parse_timestamp(a), a)));
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `config_YYYYMMDD_HHMMSS[_note].json` -> timestamp.
fn parse_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut segments = trimmed.split('_').skip(1);
    let date_part = segments.next()?;
    let time_part = segments.next()?;
    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
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

fn write_atomic(path: &Path, data: &str) -> Result<(), RentalError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
