pub mod json_backend;
mod tenant_store;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    core::errors::RentalError,
    ledger::{Movement, RecurringObligation, Tenant},
};

pub type Result<T> = std::result::Result<T, RentalError>;

/// Read/update access to recurring obligation records.
pub trait ObligationStore {
    fn obligations(&self) -> Result<Vec<RecurringObligation>>;
    fn obligation(&self, id: Uuid) -> Result<Option<RecurringObligation>>;
    /// Advances `last_generated`; returns `false` when `date` is not ahead of the
    /// stored marker.
    fn record_generated(&mut self, id: Uuid, date: NaiveDate) -> Result<bool>;
    fn set_active(&mut self, id: Uuid, active: bool) -> Result<()>;
}

/// Ledger rows keyed, for recurring rows, by `(source_obligation_id, date)`.
pub trait MovementStore {
    fn movement_exists(&self, obligation_id: Uuid, date: NaiveDate) -> Result<bool>;
    /// Fails with [`RentalError::DuplicateMovement`] when a row for the same
    /// obligation and date is already stored.
    fn insert_movement(&mut self, movement: Movement) -> Result<Uuid>;
}

/// Describes a persisted backup artifact for a tenant.
#[derive(Debug, Clone)]
pub struct TenantBackupInfo {
    pub tenant: String,
    pub file_name: String,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing tenants and backups.
pub trait TenantStorage: Send + Sync {
    fn save(&self, tenant: &Tenant, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Tenant>;
    fn exists(&self, name: &str) -> bool;
    fn list(&self) -> Result<Vec<String>>;
    fn backup(&self, tenant: &Tenant, name: &str, note: Option<&str>) -> Result<TenantBackupInfo>;
    fn list_backups(&self, name: &str) -> Result<Vec<TenantBackupInfo>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Tenant>;

    fn save_to_path(&self, tenant: &Tenant, path: &Path) -> Result<()> {
        json_backend::save_tenant_to_path(tenant, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<Tenant> {
        json_backend::load_tenant_from_path(path)
    }
}

pub use json_backend::JsonStorage;
pub use tenant_store::tenant_warnings;
