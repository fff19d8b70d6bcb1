pub mod client_service;
pub mod generation_service;
pub mod movement_service;
pub mod obligation_service;
pub mod order_service;
pub mod product_service;
pub mod summary_service;
pub mod supplier_service;

pub use client_service::ClientService;
pub use generation_service::{GenerationReport, GenerationService};
pub use movement_service::MovementService;
pub use obligation_service::{ObligationChanges, ObligationService};
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use summary_service::{CategoryTotal, LedgerSummary, SummaryService};
pub use supplier_service::SupplierService;

use uuid::Uuid;

use crate::core::errors::RentalError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] RentalError),
    #[error("{0}")]
    Invalid(String),
}

/// Rejects `candidate` when another entity (other than `exclude`) already uses the
/// same name, compared trimmed and case-insensitively.
pub(crate) fn ensure_unique_name<'a, I>(
    existing: I,
    exclude: Option<Uuid>,
    candidate: &str,
    label: &str,
) -> ServiceResult<()>
where
    I: IntoIterator<Item = (Uuid, &'a str)>,
{
    let normalized = candidate.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ServiceError::Invalid(format!("{} name is required", label)));
    }
    let duplicate = existing.into_iter().any(|(id, name)| {
        name.trim().to_lowercase() == normalized && exclude.map_or(true, |skip| skip != id)
    });
    if duplicate {
        Err(ServiceError::Invalid(format!(
            "{} `{}` already exists",
            label,
            candidate.trim()
        )))
    } else {
        Ok(())
    }
}

pub(crate) fn ensure_positive_amount(amount: f64, label: &str) -> ServiceResult<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ServiceError::Invalid(format!(
            "{} must be a positive amount",
            label
        )))
    }
}

#[cfg(test)]
mod tests;
