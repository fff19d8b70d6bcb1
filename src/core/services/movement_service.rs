//! Manual ledger movements and payment tracking.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::{DateWindow, Movement, Tenant};
use crate::storage::MovementStore;

use super::{ensure_positive_amount, ServiceError, ServiceResult};

pub struct MovementService;

impl MovementService {
    /// Records a movement typed in by a user. Recurring rows go through
    /// [`super::GenerationService`] instead.
    pub fn add(tenant: &mut Tenant, movement: Movement) -> ServiceResult<Uuid> {
        Self::validate(&movement)?;
        Ok(tenant.insert_movement(movement)?)
    }

    /// Updates descriptive fields and the amount. The date and the source
    /// obligation of a materialized row are left alone so the
    /// `(obligation, date)` pair stays unique.
    pub fn edit(tenant: &mut Tenant, id: Uuid, changes: Movement) -> ServiceResult<()> {
        Self::validate(&changes)?;
        let movement = tenant
            .movement_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Movement not found".into()))?;
        movement.kind = changes.kind;
        movement.amount = changes.amount;
        movement.description = changes.description;
        movement.category = changes.category;
        movement.notes = changes.notes;
        if movement.source_obligation_id.is_none() {
            movement.date = changes.date;
        }
        tenant.touch();
        Ok(())
    }

    pub fn mark_paid(tenant: &mut Tenant, id: Uuid, paid_on: NaiveDate) -> ServiceResult<()> {
        let movement = tenant
            .movement_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Movement not found".into()))?;
        if movement.is_paid() {
            return Err(ServiceError::Invalid("Movement is already paid".into()));
        }
        movement.mark_paid(paid_on);
        tenant.touch();
        Ok(())
    }

    pub fn remove(tenant: &mut Tenant, id: Uuid) -> ServiceResult<Movement> {
        let index = tenant
            .movements
            .iter()
            .position(|movement| movement.id == id)
            .ok_or_else(|| ServiceError::Invalid("Movement not found".into()))?;
        let removed = tenant.movements.remove(index);
        tenant.touch();
        Ok(removed)
    }

    /// All movements ordered by date, oldest first.
    pub fn list(tenant: &Tenant) -> Vec<&Movement> {
        let mut movements: Vec<&Movement> = tenant.movements.iter().collect();
        movements.sort_by_key(|movement| (movement.date, movement.created_at));
        movements
    }

    pub fn list_in_window(tenant: &Tenant, window: DateWindow) -> Vec<&Movement> {
        Self::list(tenant)
            .into_iter()
            .filter(|movement| window.contains(movement.date))
            .collect()
    }

    fn validate(movement: &Movement) -> ServiceResult<()> {
        ensure_positive_amount(movement.amount, "Movement amount")?;
        if movement.description.trim().is_empty() {
            return Err(ServiceError::Invalid(
                "Movement description is required".into(),
            ));
        }
        Ok(())
    }
}
