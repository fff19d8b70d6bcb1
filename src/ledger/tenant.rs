use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    movement::Movement,
    obligation::RecurringObligation,
    order::{format_number, Order, OrderKind},
    party::{Client, Supplier},
    product::Product,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// One organization's isolated data partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub movements: Vec<Movement>,
    #[serde(default)]
    pub obligations: Vec<RecurringObligation>,
    #[serde(default = "Tenant::first_sequence")]
    pub next_quote_number: u32,
    #[serde(default = "Tenant::first_sequence")]
    pub next_order_number: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Tenant::schema_version_default")]
    pub schema_version: u8,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            clients: Vec::new(),
            suppliers: Vec::new(),
            products: Vec::new(),
            orders: Vec::new(),
            movements: Vec::new(),
            obligations: Vec::new(),
            next_quote_number: 1,
            next_order_number: 1,
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn client(&self, id: Uuid) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn client_mut(&mut self, id: Uuid) -> Option<&mut Client> {
        self.clients.iter_mut().find(|client| client.id == id)
    }

    pub fn supplier(&self, id: Uuid) -> Option<&Supplier> {
        self.suppliers.iter().find(|supplier| supplier.id == id)
    }

    pub fn supplier_mut(&mut self, id: Uuid) -> Option<&mut Supplier> {
        self.suppliers.iter_mut().find(|supplier| supplier.id == id)
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn product_mut(&mut self, id: Uuid) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    pub fn order(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn order_mut(&mut self, id: Uuid) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| order.id == id)
    }

    pub fn movement(&self, id: Uuid) -> Option<&Movement> {
        self.movements.iter().find(|movement| movement.id == id)
    }

    pub fn movement_mut(&mut self, id: Uuid) -> Option<&mut Movement> {
        self.movements.iter_mut().find(|movement| movement.id == id)
    }

    pub fn obligation_ref(&self, id: Uuid) -> Option<&RecurringObligation> {
        self.obligations.iter().find(|obligation| obligation.id == id)
    }

    pub fn obligation_mut(&mut self, id: Uuid) -> Option<&mut RecurringObligation> {
        self.obligations
            .iter_mut()
            .find(|obligation| obligation.id == id)
    }

    pub fn has_movement_for(&self, obligation_id: Uuid, date: NaiveDate) -> bool {
        self.movements
            .iter()
            .any(|movement| movement.materializes(obligation_id, date))
    }

    /// Hands out the next document number for `kind` and bumps the counter.
    pub fn allocate_number(&mut self, kind: OrderKind) -> String {
        let counter = match kind {
            OrderKind::Quote => &mut self.next_quote_number,
            OrderKind::Order => &mut self.next_order_number,
        };
        let number = format_number(kind, *counter);
        *counter += 1;
        number
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn first_sequence() -> u32 {
        1
    }
}
