//! The loaded tenant acts as both the obligation store and the ledger store.

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    core::errors::RentalError,
    ledger::{Movement, RecurringObligation, Tenant},
};

use super::{MovementStore, ObligationStore, Result};

impl ObligationStore for Tenant {
    fn obligations(&self) -> Result<Vec<RecurringObligation>> {
        Ok(self.obligations.clone())
    }

    fn obligation(&self, id: Uuid) -> Result<Option<RecurringObligation>> {
        Ok(self.obligation_ref(id).cloned())
    }

    fn record_generated(&mut self, id: Uuid, date: NaiveDate) -> Result<bool> {
        let obligation = self
            .obligation_mut(id)
            .ok_or_else(|| RentalError::NotFound(format!("obligation {}", id)))?;
        let advanced = obligation.advance_last_generated(date);
        if advanced {
            self.touch();
        }
        Ok(advanced)
    }

    fn set_active(&mut self, id: Uuid, active: bool) -> Result<()> {
        let obligation = self
            .obligation_mut(id)
            .ok_or_else(|| RentalError::NotFound(format!("obligation {}", id)))?;
        obligation.active = active;
        self.touch();
        Ok(())
    }
}

impl MovementStore for Tenant {
    fn movement_exists(&self, obligation_id: Uuid, date: NaiveDate) -> Result<bool> {
        Ok(self.has_movement_for(obligation_id, date))
    }

    fn insert_movement(&mut self, movement: Movement) -> Result<Uuid> {
        if let Some(obligation_id) = movement.source_obligation_id {
            if self.has_movement_for(obligation_id, movement.date) {
                return Err(RentalError::DuplicateMovement {
                    obligation_id,
                    date: movement.date,
                });
            }
        }
        let id = movement.id;
        self.movements.push(movement);
        self.touch();
        Ok(id)
    }
}

/// Detects dangling references and other anomalies within a tenant snapshot.
pub fn tenant_warnings(tenant: &Tenant) -> Vec<String> {
    let client_ids: HashSet<_> = tenant.clients.iter().map(|c| c.id).collect();
    let supplier_ids: HashSet<_> = tenant.suppliers.iter().map(|s| s.id).collect();
    let product_ids: HashSet<_> = tenant.products.iter().map(|p| p.id).collect();
    let mut warnings = Vec::new();

    for product in &tenant.products {
        if let Some(supplier) = product.supplier_id {
            if !supplier_ids.contains(&supplier) {
                warnings.push(format!(
                    "product {} references unknown supplier {}",
                    product.id, supplier
                ));
            }
        }
    }
    for order in &tenant.orders {
        if !client_ids.contains(&order.client_id) {
            warnings.push(format!(
                "order {} references unknown client {}",
                order.number, order.client_id
            ));
        }
        for line in &order.lines {
            if !product_ids.contains(&line.product_id) {
                warnings.push(format!(
                    "order {} references unknown product {}",
                    order.number, line.product_id
                ));
            }
        }
    }
    for obligation in &tenant.obligations {
        if !obligation.frequency.is_supported() {
            warnings.push(format!(
                "obligation {} has unsupported frequency `{}`",
                obligation.id, obligation.frequency
            ));
        }
    }
    let mut seen = HashSet::new();
    for movement in &tenant.movements {
        if let Some(obligation_id) = movement.source_obligation_id {
            if !seen.insert((obligation_id, movement.date)) {
                warnings.push(format!(
                    "obligation {} has more than one movement on {}",
                    obligation_id, movement.date
                ));
            }
        }
    }
    warnings
}
