use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::obligation::RecurringObligation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MovementKind {
    Expense,
    Income,
}

impl MovementKind {
    pub fn parse(raw: &str) -> Option<MovementKind> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "expense" => Some(MovementKind::Expense),
            "income" => Some(MovementKind::Income),
            _ => None,
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            MovementKind::Expense => -1.0,
            MovementKind::Income => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovementKind::Expense => "expense",
            MovementKind::Income => "income",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MovementStatus {
    #[default]
    Pending,
    Paid,
}

/// One accounting ledger row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub id: Uuid,
    pub kind: MovementKind,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_obligation_id: Option<Uuid>,
    #[serde(default)]
    pub status: MovementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    pub fn new(
        kind: MovementKind,
        amount: f64,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            description: description.into(),
            category: None,
            date,
            source_obligation_id: None,
            status: MovementStatus::Pending,
            paid_on: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Materializes one due date of a recurring obligation.
    pub fn from_obligation(obligation: &RecurringObligation, due_date: NaiveDate) -> Self {
        let mut movement = Movement::new(
            obligation.kind,
            obligation.amount,
            obligation.description.clone(),
            due_date,
        );
        movement.category = obligation.category.clone();
        movement.source_obligation_id = Some(obligation.id);
        movement
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn mark_paid(&mut self, paid_on: NaiveDate) {
        self.status = MovementStatus::Paid;
        self.paid_on = Some(paid_on);
    }

    pub fn is_paid(&self) -> bool {
        self.status == MovementStatus::Paid
    }

    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    /// True when this row was materialized from `obligation_id` for `date`.
    pub fn materializes(&self, obligation_id: Uuid, date: NaiveDate) -> bool {
        self.source_obligation_id == Some(obligation_id) && self.date == date
    }
}
