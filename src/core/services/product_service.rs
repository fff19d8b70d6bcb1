use chrono::NaiveDate;
use uuid::Uuid;

use crate::ledger::{Product, Tenant};

use super::{ensure_unique_name, ServiceError, ServiceResult};

pub struct ProductService;

impl ProductService {
    pub fn add(tenant: &mut Tenant, mut product: Product) -> ServiceResult<Uuid> {
        Self::validate(tenant, None, &product)?;
        product.name = product.name.trim().to_string();
        let id = product.id;
        tenant.products.push(product);
        tenant.touch();
        Ok(id)
    }

    pub fn edit(tenant: &mut Tenant, id: Uuid, changes: Product) -> ServiceResult<()> {
        Self::validate(tenant, Some(id), &changes)?;
        let product = tenant
            .product_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Product not found".into()))?;
        product.name = changes.name.trim().to_string();
        product.sku = changes.sku;
        product.stock = changes.stock;
        product.daily_rate = changes.daily_rate;
        product.supplier_id = changes.supplier_id;
        product.notes = changes.notes;
        tenant.touch();
        Ok(())
    }

    pub fn remove(tenant: &mut Tenant, id: Uuid) -> ServiceResult<Product> {
        let referenced = tenant
            .orders
            .iter()
            .any(|order| order.lines.iter().any(|line| line.product_id == id));
        if referenced {
            return Err(ServiceError::Invalid("Product is used by orders".into()));
        }
        let index = tenant
            .products
            .iter()
            .position(|product| product.id == id)
            .ok_or_else(|| ServiceError::Invalid("Product not found".into()))?;
        let removed = tenant.products.remove(index);
        tenant.touch();
        Ok(removed)
    }

    pub fn list(tenant: &Tenant) -> Vec<&Product> {
        let mut products: Vec<&Product> = tenant.products.iter().collect();
        products.sort_by_key(|product| product.name.to_lowercase());
        products
    }

    /// Units still free over `[start, end]` once stock-holding orders are
    /// subtracted. `exclude_order` leaves one order out of the count, so an order
    /// can be checked against everything else.
    pub fn available_quantity(
        tenant: &Tenant,
        product_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
        exclude_order: Option<Uuid>,
    ) -> ServiceResult<u32> {
        let product = tenant
            .product(product_id)
            .ok_or_else(|| ServiceError::Invalid("Product not found".into()))?;
        let reserved: u32 = tenant
            .orders
            .iter()
            .filter(|order| Some(order.id) != exclude_order)
            .filter(|order| order.holds_stock() && order.overlaps(start, end))
            .map(|order| order.quantity_of(product_id))
            .sum();
        Ok(product.stock.saturating_sub(reserved))
    }

    fn validate(tenant: &Tenant, exclude: Option<Uuid>, product: &Product) -> ServiceResult<()> {
        ensure_unique_name(
            tenant.products.iter().map(|p| (p.id, p.name.as_str())),
            exclude,
            &product.name,
            "Product",
        )?;
        if !product.daily_rate.is_finite() || product.daily_rate < 0.0 {
            return Err(ServiceError::Invalid(
                "Daily rate must not be negative".into(),
            ));
        }
        if let Some(supplier_id) = product.supplier_id {
            if tenant.supplier(supplier_id).is_none() {
                return Err(ServiceError::Invalid(
                    "Linked supplier does not exist".into(),
                ));
            }
        }
        Ok(())
    }
}
