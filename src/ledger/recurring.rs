//! Due-date computation for recurring obligations.
//!
//! Everything here is a pure function of an obligation snapshot and a cutoff
//! date. Callers are expected to pass dates already normalized to one reference
//! time zone.

use chrono::NaiveDate;
use uuid::Uuid;

use super::calendar::{date_in_month, month_index, next_on_linear_grid, MAX_BILLING_DAY};
use super::movement::MovementKind;
use super::obligation::{Frequency, RecurringObligation};

/// Upper bound on loop iterations for a single call. Weekly obligations produce at
/// most 53 dates a year, so hitting this means a backlog older than several
/// years; the next call resumes from `last_generated`.
pub const MAX_SCHEDULER_ITERATIONS: usize = 365;

const WEEK_DAYS: i64 = 7;
const BIWEEKLY_OFFSET: u32 = 15;

/// Due dates of `obligation` that are not yet materialized and fall on or before
/// `cutoff`, in strictly increasing order.
///
/// An unsupported frequency yields an empty vector so one corrupt record never
/// blocks a batch.
pub fn pending_due_dates(obligation: &RecurringObligation, cutoff: NaiveDate) -> Vec<NaiveDate> {
    let mut due_dates = Vec::new();
    if !obligation.frequency.is_supported() {
        return due_dates;
    }

    let mut cursor = match initial_cursor(obligation) {
        Some(cursor) => cursor,
        None => return due_dates,
    };
    let limit = match obligation.end_date {
        Some(end) => end.min(cutoff),
        None => cutoff,
    };

    for _ in 0..MAX_SCHEDULER_ITERATIONS {
        let due = match next_due_on_or_after(obligation, cursor) {
            Some(due) => due,
            None => break,
        };
        if due > limit {
            break;
        }
        let after_marker = obligation.last_generated.map_or(true, |last| due > last);
        let after_previous = due_dates.last().map_or(true, |prev| due > *prev);
        if due >= obligation.start_date && after_marker && after_previous {
            due_dates.push(due);
        }
        cursor = match due.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    due_dates
}

/// First due date on or after `reference` that is still ahead of the generation
/// marker and inside `[start_date, end_date]`. `None` when the obligation has run
/// out or its frequency is unsupported.
pub fn next_due_date(obligation: &RecurringObligation, reference: NaiveDate) -> Option<NaiveDate> {
    let cursor = initial_cursor(obligation)?.max(reference);
    let due = next_due_on_or_after(obligation, cursor)?;
    match obligation.end_date {
        Some(end) if due > end => None,
        _ => Some(due),
    }
}

/// Frequency-specific rule: the first due date on or after `cursor`.
pub fn next_due_on_or_after(
    obligation: &RecurringObligation,
    cursor: NaiveDate,
) -> Option<NaiveDate> {
    let day = obligation.billing_day();
    let index = month_index(cursor);
    match &obligation.frequency {
        Frequency::Weekly => next_on_linear_grid(obligation.start_date, cursor, WEEK_DAYS),
        Frequency::Biweekly => {
            let first = date_in_month(index, day)?;
            if first >= cursor {
                return Some(first);
            }
            let second = date_in_month(index, (day + BIWEEKLY_OFFSET).min(MAX_BILLING_DAY))?;
            if second >= cursor {
                return Some(second);
            }
            date_in_month(index + 1, day)
        }
        Frequency::Unsupported(_) => None,
        monthly_family => {
            let step = monthly_family.month_step()?;
            let candidate = date_in_month(index, day)?;
            if candidate >= cursor {
                Some(candidate)
            } else {
                date_in_month(index + step, day)
            }
        }
    }
}

fn initial_cursor(obligation: &RecurringObligation) -> Option<NaiveDate> {
    let cursor = match obligation.last_generated {
        Some(last) => last.succ_opt()?,
        None => obligation.start_date,
    };
    Some(cursor.max(obligation.start_date))
}

/// One not-yet-materialized due date, flattened for previews.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDue {
    pub obligation_id: Uuid,
    pub description: String,
    pub kind: MovementKind,
    pub amount: f64,
    pub due_date: NaiveDate,
}

/// Dry run over a set of obligations: every pending due date of every active
/// obligation, ordered by date.
pub fn preview_pending(obligations: &[RecurringObligation], cutoff: NaiveDate) -> Vec<PendingDue> {
    let mut pending: Vec<PendingDue> = obligations
        .iter()
        .filter(|obligation| obligation.active)
        .flat_map(|obligation| {
            pending_due_dates(obligation, cutoff)
                .into_iter()
                .map(move |due_date| PendingDue {
                    obligation_id: obligation.id,
                    description: obligation.description.clone(),
                    kind: obligation.kind,
                    amount: obligation.amount,
                    due_date,
                })
        })
        .collect();
    pending.sort_by_key(|item| item.due_date);
    pending
}
