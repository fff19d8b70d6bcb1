use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use crate::core::errors::RentalError;
use crate::core::services::{GenerationReport, GenerationService, ServiceResult};
use crate::ledger::tenant::CURRENT_SCHEMA_VERSION;
use crate::ledger::Tenant;
use crate::storage::{tenant_warnings, TenantBackupInfo, TenantStorage};

/// Who is working on which tenant, replacing any process-wide "current tenant".
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub tenant: String,
    pub operator: Option<String>,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    fn open(tenant: &str, operator: Option<&str>) -> Self {
        Self {
            tenant: tenant.to_string(),
            operator: operator.map(str::to_string),
            opened_at: Utc::now(),
        }
    }
}

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub name: String,
    pub warnings: Vec<String>,
    pub schema_version: u8,
}

/// Facade that owns the only loaded copy of a tenant and its persistence.
pub struct TenantManager {
    current: Option<Tenant>,
    session: Option<Session>,
    storage: Box<dyn TenantStorage>,
}

impl TenantManager {
    pub fn new(storage: Box<dyn TenantStorage>) -> Self {
        Self {
            current: None,
            session: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn TenantStorage {
        self.storage.as_ref()
    }

    /// Creates and persists an empty tenant, then opens it.
    pub fn create(&mut self, name: &str, operator: Option<&str>) -> Result<&Tenant, RentalError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(RentalError::InvalidInput("tenant name is required".into()));
        }
        if self.storage.exists(trimmed) {
            return Err(RentalError::InvalidInput(format!(
                "tenant `{}` already exists",
                trimmed
            )));
        }
        let tenant = Tenant::new(trimmed);
        self.storage.save(&tenant, trimmed)?;
        info!(tenant = trimmed, "tenant created");
        self.session = Some(Session::open(trimmed, operator));
        Ok(self.current.insert(tenant))
    }

    pub fn open(&mut self, name: &str, operator: Option<&str>) -> Result<LoadMetadata, RentalError> {
        let tenant = self.storage.load(name)?;
        Self::ensure_schema_support(tenant.schema_version)?;
        let warnings = tenant_warnings(&tenant);
        for warning in &warnings {
            warn!(tenant = name, "{}", warning);
        }
        let metadata = LoadMetadata {
            name: name.to_string(),
            warnings,
            schema_version: tenant.schema_version,
        };
        self.current = Some(tenant);
        self.session = Some(Session::open(name, operator));
        info!(tenant = name, "tenant opened");
        Ok(metadata)
    }

    pub fn save(&self) -> Result<(), RentalError> {
        let (tenant, session) = self.loaded()?;
        self.storage.save(tenant, &session.tenant)
    }

    /// Drops the loaded tenant and invalidates the session without saving.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            info!(tenant = %session.tenant, "tenant closed");
        }
        self.current = None;
    }

    pub fn current(&self) -> Result<&Tenant, RentalError> {
        self.current.as_ref().ok_or(RentalError::TenantNotLoaded)
    }

    pub fn current_mut(&mut self) -> Result<&mut Tenant, RentalError> {
        self.current.as_mut().ok_or(RentalError::TenantNotLoaded)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn list(&self) -> Result<Vec<String>, RentalError> {
        self.storage.list()
    }

    pub fn backup(&self, note: Option<&str>) -> Result<TenantBackupInfo, RentalError> {
        let (tenant, session) = self.loaded()?;
        self.storage.backup(tenant, &session.tenant, note)
    }

    pub fn list_backups(&self) -> Result<Vec<TenantBackupInfo>, RentalError> {
        let (_, session) = self.loaded()?;
        self.storage.list_backups(&session.tenant)
    }

    /// Replaces the active tenant file with `backup_name` and reloads it.
    pub fn restore(&mut self, backup_name: &str) -> Result<LoadMetadata, RentalError> {
        let session = self.session.clone().ok_or(RentalError::TenantNotLoaded)?;
        self.storage.restore(&session.tenant, backup_name)?;
        info!(tenant = %session.tenant, backup = backup_name, "tenant restored");
        self.open(&session.tenant, session.operator.as_deref())
    }

    /// Runs the recurring generation batch on the loaded tenant and saves it.
    pub fn generate_pending(&mut self, cutoff: NaiveDate) -> ServiceResult<GenerationReport> {
        let tenant = self.current_mut()?;
        let report = GenerationService::generate_for_tenant(tenant, cutoff)?;
        if report.changed_stores() {
            self.save()?;
        }
        Ok(report)
    }

    fn loaded(&self) -> Result<(&Tenant, &Session), RentalError> {
        match (self.current.as_ref(), self.session.as_ref()) {
            (Some(tenant), Some(session)) => Ok((tenant, session)),
            _ => Err(RentalError::TenantNotLoaded),
        }
    }

    fn ensure_schema_support(schema_version: u8) -> Result<(), RentalError> {
        if schema_version > CURRENT_SCHEMA_VERSION {
            return Err(RentalError::StorageError(format!(
                "tenant schema v{} is newer than supported v{}",
                schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}
