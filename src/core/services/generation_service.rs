//! Materializes pending recurring movements into the ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::errors::RentalError;
use crate::ledger::{
    pending_due_dates, preview_pending, Movement, PendingDue, RecurringObligation, Tenant,
};
use crate::storage::{self, MovementStore, ObligationStore};

use super::ServiceResult;

/// Outcome of one generation batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub cutoff: Option<NaiveDate>,
    pub created: usize,
    pub skipped: usize,
    /// Obligations whose `last_generated` marker moved forward.
    pub markers_advanced: usize,
    pub warnings: Vec<String>,
    pub per_obligation: BTreeMap<Uuid, usize>,
}

impl GenerationReport {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.skipped == 0 && self.warnings.is_empty()
    }

    /// True when either store was written to.
    pub fn changed_stores(&self) -> bool {
        self.created > 0 || self.markers_advanced > 0
    }

    pub fn created_for(&self, obligation_id: Uuid) -> usize {
        self.per_obligation.get(&obligation_id).copied().unwrap_or(0)
    }
}

pub struct GenerationService;

impl GenerationService {
    /// Inserts one movement per pending due date of every active obligation, then
    /// advances each obligation's `last_generated` marker.
    ///
    /// Rows already present (same obligation and date) are skipped, so running the
    /// batch twice with the same cutoff creates nothing the second time. The first
    /// store failure aborts the batch; obligations finished before it keep their
    /// advanced marker.
    pub fn generate_pending<O, M>(
        obligations: &mut O,
        ledger: &mut M,
        cutoff: NaiveDate,
    ) -> ServiceResult<GenerationReport>
    where
        O: ObligationStore,
        M: MovementStore,
    {
        let mut stores = SplitStores {
            obligations,
            ledger,
        };
        Self::run(&mut stores, cutoff)
    }

    /// Same batch against a tenant, which holds both the obligations and the
    /// ledger.
    pub fn generate_for_tenant(
        tenant: &mut Tenant,
        cutoff: NaiveDate,
    ) -> ServiceResult<GenerationReport> {
        Self::run(tenant, cutoff)
    }

    /// What a batch with `cutoff` would insert, without touching either store.
    pub fn preview<O: ObligationStore>(
        obligations: &O,
        cutoff: NaiveDate,
    ) -> ServiceResult<Vec<PendingDue>> {
        Ok(preview_pending(&obligations.obligations()?, cutoff))
    }

    fn run<S>(store: &mut S, cutoff: NaiveDate) -> ServiceResult<GenerationReport>
    where
        S: ObligationStore + MovementStore,
    {
        let mut report = GenerationReport {
            cutoff: Some(cutoff),
            ..GenerationReport::default()
        };

        for obligation in store.obligations()? {
            if !obligation.active {
                continue;
            }
            if !obligation.frequency.is_supported() {
                warn!(
                    obligation = %obligation.id,
                    frequency = %obligation.frequency,
                    "skipping obligation with unsupported frequency"
                );
                report.warnings.push(format!(
                    "{}: unsupported frequency `{}`",
                    obligation.description, obligation.frequency
                ));
                continue;
            }
            Self::materialize(store, &obligation, cutoff, &mut report)?;
        }

        info!(
            cutoff = %cutoff,
            created = report.created,
            skipped = report.skipped,
            warnings = report.warnings.len(),
            "recurring generation finished"
        );
        Ok(report)
    }

    fn materialize<S>(
        store: &mut S,
        obligation: &RecurringObligation,
        cutoff: NaiveDate,
        report: &mut GenerationReport,
    ) -> ServiceResult<()>
    where
        S: ObligationStore + MovementStore,
    {
        let due_dates = pending_due_dates(obligation, cutoff);
        let last = match due_dates.last() {
            Some(last) => *last,
            None => return Ok(()),
        };

        let mut created = 0;
        for due in due_dates {
            if store.movement_exists(obligation.id, due)? {
                report.skipped += 1;
                continue;
            }
            match store.insert_movement(Movement::from_obligation(obligation, due)) {
                Ok(movement_id) => {
                    debug!(obligation = %obligation.id, movement = %movement_id, date = %due, "movement created");
                    created += 1;
                }
                Err(RentalError::DuplicateMovement { .. }) => {
                    warn!(obligation = %obligation.id, date = %due, "movement already present");
                    report.skipped += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }

        if store.record_generated(obligation.id, last)? {
            report.markers_advanced += 1;
        }
        report.created += created;
        if created > 0 {
            report.per_obligation.insert(obligation.id, created);
        }
        Ok(())
    }
}

/// Presents two independent stores as one so the batch is written once.
struct SplitStores<'a, O, M> {
    obligations: &'a mut O,
    ledger: &'a mut M,
}

impl<O: ObligationStore, M> ObligationStore for SplitStores<'_, O, M> {
    fn obligations(&self) -> storage::Result<Vec<RecurringObligation>> {
        self.obligations.obligations()
    }

    fn obligation(&self, id: Uuid) -> storage::Result<Option<RecurringObligation>> {
        self.obligations.obligation(id)
    }

    fn record_generated(&mut self, id: Uuid, date: NaiveDate) -> storage::Result<bool> {
        self.obligations.record_generated(id, date)
    }

    fn set_active(&mut self, id: Uuid, active: bool) -> storage::Result<()> {
        self.obligations.set_active(id, active)
    }
}

impl<O, M: MovementStore> MovementStore for SplitStores<'_, O, M> {
    fn movement_exists(&self, obligation_id: Uuid, date: NaiveDate) -> storage::Result<bool> {
        self.ledger.movement_exists(obligation_id, date)
    }

    fn insert_movement(&mut self, movement: Movement) -> storage::Result<Uuid> {
        self.ledger.insert_movement(movement)
    }
}
