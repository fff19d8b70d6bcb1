use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rentable inventory item. `stock` is the number of units the tenant owns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub stock: u32,
    pub daily_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Product {
    pub fn new(name: impl Into<String>, stock: u32, daily_rate: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sku: None,
            stock,
            daily_rate,
            supplier_id: None,
            notes: None,
        }
    }

    pub fn with_supplier(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = Some(supplier_id);
        self
    }
}
