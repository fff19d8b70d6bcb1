//! Maintenance of recurring obligation templates.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::{next_due_date, Frequency, MovementKind, RecurringObligation, Tenant};
use crate::storage::ObligationStore;

use super::{ensure_positive_amount, ServiceError, ServiceResult};

/// Editable fields of an obligation. The identifier and the generation marker are
/// deliberately absent: edits only shape movements that are still to come.
#[derive(Debug, Clone, PartialEq)]
pub struct ObligationChanges {
    pub kind: MovementKind,
    pub amount: f64,
    pub description: String,
    pub category: Option<String>,
    pub frequency: Frequency,
    pub billing_day: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<&RecurringObligation> for ObligationChanges {
    fn from(obligation: &RecurringObligation) -> Self {
        Self {
            kind: obligation.kind,
            amount: obligation.amount,
            description: obligation.description.clone(),
            category: obligation.category.clone(),
            frequency: obligation.frequency.clone(),
            billing_day: obligation.billing_day() as i64,
            start_date: obligation.start_date,
            end_date: obligation.end_date,
        }
    }
}

pub struct ObligationService;

impl ObligationService {
    pub fn add(tenant: &mut Tenant, obligation: RecurringObligation) -> ServiceResult<Uuid> {
        Self::validate(&ObligationChanges::from(&obligation))?;
        let id = obligation.id;
        tenant.obligations.push(obligation);
        tenant.touch();
        Ok(id)
    }

    /// Applies `changes` to the obligation. Movements already materialized are
    /// never touched.
    pub fn edit(tenant: &mut Tenant, id: Uuid, changes: ObligationChanges) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let obligation = tenant
            .obligation_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Obligation not found".into()))?;
        obligation.kind = changes.kind;
        obligation.amount = changes.amount;
        obligation.description = changes.description.trim().to_string();
        obligation.category = changes.category;
        obligation.frequency = changes.frequency;
        obligation.set_billing_day(changes.billing_day);
        obligation.start_date = changes.start_date;
        obligation.end_date = changes.end_date;
        tenant.touch();
        Ok(())
    }

    pub fn set_active(tenant: &mut Tenant, id: Uuid, active: bool) -> ServiceResult<()> {
        Ok(ObligationStore::set_active(tenant, id, active)?)
    }

    /// Deletes the template. Movements generated from it stay in the ledger and
    /// keep their `source_obligation_id` for traceability.
    pub fn remove(tenant: &mut Tenant, id: Uuid) -> ServiceResult<RecurringObligation> {
        let index = tenant
            .obligations
            .iter()
            .position(|obligation| obligation.id == id)
            .ok_or_else(|| ServiceError::Invalid("Obligation not found".into()))?;
        let removed = tenant.obligations.remove(index);
        tenant.touch();
        Ok(removed)
    }

    pub fn list(tenant: &Tenant) -> Vec<&RecurringObligation> {
        let mut obligations: Vec<&RecurringObligation> = tenant.obligations.iter().collect();
        obligations.sort_by_key(|obligation| obligation.description.to_lowercase());
        obligations
    }

    /// Obligations paired with their next due date on or after `reference`.
    /// Inactive obligations report `None`.
    pub fn list_with_next_due(
        tenant: &Tenant,
        reference: NaiveDate,
    ) -> Vec<(&RecurringObligation, Option<NaiveDate>)> {
        Self::list(tenant)
            .into_iter()
            .map(|obligation| {
                let next = if obligation.active {
                    next_due_date(obligation, reference)
                } else {
                    None
                };
                (obligation, next)
            })
            .collect()
    }

    fn validate(changes: &ObligationChanges) -> ServiceResult<()> {
        ensure_positive_amount(changes.amount, "Obligation amount")?;
        if changes.description.trim().is_empty() {
            return Err(ServiceError::Invalid(
                "Obligation description is required".into(),
            ));
        }
        if !changes.frequency.is_supported() {
            return Err(ServiceError::Invalid(format!(
                "Unsupported frequency `{}`",
                changes.frequency
            )));
        }
        if let Some(end) = changes.end_date {
            if end < changes.start_date {
                return Err(ServiceError::Invalid(
                    "End date must not precede start date".into(),
                ));
            }
        }
        Ok(())
    }
}
