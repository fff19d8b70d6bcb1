use std::result::Result as StdResult;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::core::services::ServiceError;

/// Unified error type for core/domain/storage layers.
#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Tenant not loaded")]
    TenantNotLoaded,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Movement for obligation {obligation_id} on {date} already exists")]
    DuplicateMovement { obligation_id: Uuid, date: NaiveDate },
}

pub type Result<T> = StdResult<T, RentalError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] RentalError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Invalid input: {0}")]
    Input(String),
}

impl From<std::io::Error> for RentalError {
    fn from(err: std::io::Error) -> Self {
        RentalError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for RentalError {
    fn from(err: serde_json::Error) -> Self {
        RentalError::StorageError(err.to_string())
    }
}
