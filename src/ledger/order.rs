use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::inclusive_days;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderKind {
    Quote,
    Order,
}

impl OrderKind {
    pub fn number_prefix(self) -> &'static str {
        match self {
            OrderKind::Quote => "Q",
            OrderKind::Order => "O",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Draft,
    Confirmed,
    Delivered,
    Returned,
    Cancelled,
}

impl OrderStatus {
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Draft, Confirmed)
                | (Draft, Cancelled)
                | (Confirmed, Delivered)
                | (Confirmed, Cancelled)
                | (Delivered, Returned)
        )
    }

    /// Whether an order in this status holds inventory for its event window.
    pub fn reserves_stock(self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::Delivered)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn new(
        product_id: Uuid,
        description: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Self {
        Self {
            product_id,
            description: description.into(),
            quantity,
            unit_price,
        }
    }
}

/// A quote or a confirmed rental order for an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub number: String,
    pub kind: OrderKind,
    pub client_id: Uuid,
    pub event_start: NaiveDate,
    pub event_end: NaiveDate,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_quote_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        kind: OrderKind,
        number: impl Into<String>,
        client_id: Uuid,
        event_start: NaiveDate,
        event_end: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            kind,
            client_id,
            event_start,
            event_end,
            status: OrderStatus::Draft,
            lines: Vec::new(),
            source_quote_id: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn rental_days(&self) -> i64 {
        inclusive_days(self.event_start, self.event_end)
    }

    pub fn line_total(&self, line: &OrderLine) -> f64 {
        line.quantity as f64 * line.unit_price * self.rental_days() as f64
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(|line| self.line_total(line)).sum()
    }

    /// Quotes never hold inventory, whatever their status.
    pub fn holds_stock(&self) -> bool {
        self.kind == OrderKind::Order && self.status.reserves_stock()
    }

    /// Inclusive overlap between the event and `[start, end]`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.event_start <= end && start <= self.event_end
    }

    pub fn quantity_of(&self, product_id: Uuid) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }
}

pub fn format_number(kind: OrderKind, sequence: u32) -> String {
    format!("{}-{:04}", kind.number_prefix(), sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn totals_scale_with_rental_days() {
        let mut order = Order::new(
            OrderKind::Quote,
            "Q-0001",
            Uuid::new_v4(),
            date(2024, 6, 1),
            date(2024, 6, 3),
        );
        order
            .lines
            .push(OrderLine::new(Uuid::new_v4(), "Speaker", 2, 25.0));
        order
            .lines
            .push(OrderLine::new(Uuid::new_v4(), "Mixer", 1, 40.0));
        assert_eq!(order.rental_days(), 3);
        assert!((order.total() - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn status_transitions_follow_rental_lifecycle() {
        assert!(OrderStatus::Draft.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Delivered.can_transition_to(OrderStatus::Returned));
        assert!(!OrderStatus::Returned.can_transition_to(OrderStatus::Draft));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn numbers_are_zero_padded() {
        assert_eq!(format_number(OrderKind::Quote, 7), "Q-0007");
        assert_eq!(format_number(OrderKind::Order, 12345), "O-12345");
    }
}
