//! Quotes and rental orders.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::ledger::{Order, OrderKind, OrderLine, OrderStatus, Tenant};

use super::{ProductService, ServiceError, ServiceResult};

pub struct OrderService;

impl OrderService {
    pub fn create_quote(
        tenant: &mut Tenant,
        client_id: Uuid,
        event_start: NaiveDate,
        event_end: NaiveDate,
    ) -> ServiceResult<Uuid> {
        Self::create(tenant, OrderKind::Quote, client_id, event_start, event_end)
    }

    pub fn create(
        tenant: &mut Tenant,
        kind: OrderKind,
        client_id: Uuid,
        event_start: NaiveDate,
        event_end: NaiveDate,
    ) -> ServiceResult<Uuid> {
        if tenant.client(client_id).is_none() {
            return Err(ServiceError::Invalid("Client not found".into()));
        }
        if event_end < event_start {
            return Err(ServiceError::Invalid(
                "Event end must not precede event start".into(),
            ));
        }
        let number = tenant.allocate_number(kind);
        let order = Order::new(kind, number, client_id, event_start, event_end);
        let id = order.id;
        tenant.orders.push(order);
        tenant.touch();
        Ok(id)
    }

    /// Appends a line priced at `unit_price`, or at the product's daily rate when
    /// no price is given. Only draft documents can be edited.
    pub fn add_line(
        tenant: &mut Tenant,
        order_id: Uuid,
        product_id: Uuid,
        quantity: u32,
        unit_price: Option<f64>,
    ) -> ServiceResult<()> {
        if quantity == 0 {
            return Err(ServiceError::Invalid("Quantity must be at least 1".into()));
        }
        let product = tenant
            .product(product_id)
            .ok_or_else(|| ServiceError::Invalid("Product not found".into()))?;
        let price = unit_price.unwrap_or(product.daily_rate);
        if !price.is_finite() || price < 0.0 {
            return Err(ServiceError::Invalid("Unit price must not be negative".into()));
        }
        let line = OrderLine::new(product_id, product.name.clone(), quantity, price);
        let order = Self::draft_mut(tenant, order_id)?;
        order.lines.push(line);
        tenant.touch();
        Ok(())
    }

    pub fn remove_line(tenant: &mut Tenant, order_id: Uuid, index: usize) -> ServiceResult<OrderLine> {
        let order = Self::draft_mut(tenant, order_id)?;
        if index >= order.lines.len() {
            return Err(ServiceError::Invalid("Order line not found".into()));
        }
        let removed = order.lines.remove(index);
        tenant.touch();
        Ok(removed)
    }

    /// Turns an accepted quote into a new draft order carrying the same lines.
    /// The quote is marked confirmed and keeps its own number.
    pub fn convert_to_order(tenant: &mut Tenant, quote_id: Uuid) -> ServiceResult<Uuid> {
        let quote = tenant
            .order(quote_id)
            .ok_or_else(|| ServiceError::Invalid("Quote not found".into()))?;
        if quote.kind != OrderKind::Quote {
            return Err(ServiceError::Invalid("Only quotes can be converted".into()));
        }
        if quote.status != OrderStatus::Draft {
            return Err(ServiceError::Invalid(
                "Quote was already converted or cancelled".into(),
            ));
        }
        let (client_id, start, end, lines, notes) = (
            quote.client_id,
            quote.event_start,
            quote.event_end,
            quote.lines.clone(),
            quote.notes.clone(),
        );
        let quote_number = quote.number.clone();

        let number = tenant.allocate_number(OrderKind::Order);
        let mut order = Order::new(OrderKind::Order, number, client_id, start, end);
        order.lines = lines;
        order.notes = notes;
        order.source_quote_id = Some(quote_id);
        let order_id = order.id;
        info!(quote = %quote_number, order = %order.number, "quote converted to order");
        tenant.orders.push(order);

        if let Some(quote) = tenant.order_mut(quote_id) {
            quote.status = OrderStatus::Confirmed;
        }
        tenant.touch();
        Ok(order_id)
    }

    /// Moves an order through its lifecycle. Confirming a rental order checks that
    /// every product has enough free units over the event.
    pub fn set_status(tenant: &mut Tenant, order_id: Uuid, next: OrderStatus) -> ServiceResult<()> {
        let order = tenant
            .order(order_id)
            .ok_or_else(|| ServiceError::Invalid("Order not found".into()))?;
        if !order.status.can_transition_to(next) {
            return Err(ServiceError::Invalid(format!(
                "Cannot move order {} from {:?} to {:?}",
                order.number, order.status, next
            )));
        }
        if order.kind == OrderKind::Order && next.reserves_stock() && !order.holds_stock() {
            Self::ensure_available(tenant, order)?;
        }
        if let Some(order) = tenant.order_mut(order_id) {
            order.status = next;
        }
        tenant.touch();
        Ok(())
    }

    pub fn remove(tenant: &mut Tenant, order_id: Uuid) -> ServiceResult<Order> {
        let index = tenant
            .orders
            .iter()
            .position(|order| order.id == order_id)
            .ok_or_else(|| ServiceError::Invalid("Order not found".into()))?;
        let status = tenant.orders[index].status;
        if !matches!(status, OrderStatus::Draft | OrderStatus::Cancelled) {
            return Err(ServiceError::Invalid(
                "Only draft or cancelled documents can be deleted".into(),
            ));
        }
        let removed = tenant.orders.remove(index);
        tenant.touch();
        Ok(removed)
    }

    /// Documents of `kind` (all when `None`), ordered by number.
    pub fn list(tenant: &Tenant, kind: Option<OrderKind>) -> Vec<&Order> {
        let mut orders: Vec<&Order> = tenant
            .orders
            .iter()
            .filter(|order| kind.map_or(true, |k| order.kind == k))
            .collect();
        orders.sort_by(|a, b| a.number.cmp(&b.number));
        orders
    }

    fn ensure_available(tenant: &Tenant, order: &Order) -> ServiceResult<()> {
        let mut requested: BTreeMap<Uuid, u32> = BTreeMap::new();
        for line in &order.lines {
            *requested.entry(line.product_id).or_default() += line.quantity;
        }
        for (product_id, quantity) in requested {
            let free = ProductService::available_quantity(
                tenant,
                product_id,
                order.event_start,
                order.event_end,
                Some(order.id),
            )?;
            if free < quantity {
                let name = tenant
                    .product(product_id)
                    .map(|product| product.name.clone())
                    .unwrap_or_else(|| product_id.to_string());
                return Err(ServiceError::Invalid(format!(
                    "Only {} unit(s) of {} available, {} requested",
                    free, name, quantity
                )));
            }
        }
        Ok(())
    }

    fn draft_mut(tenant: &mut Tenant, order_id: Uuid) -> ServiceResult<&mut Order> {
        let order = tenant
            .order_mut(order_id)
            .ok_or_else(|| ServiceError::Invalid("Order not found".into()))?;
        if order.status != OrderStatus::Draft {
            return Err(ServiceError::Invalid(
                "Only draft documents can be edited".into(),
            ));
        }
        Ok(order)
    }
}
