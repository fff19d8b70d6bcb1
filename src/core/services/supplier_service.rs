use uuid::Uuid;

use crate::ledger::{Supplier, Tenant};

use super::{ensure_unique_name, ServiceError, ServiceResult};

pub struct SupplierService;

impl SupplierService {
    pub fn add(tenant: &mut Tenant, mut supplier: Supplier) -> ServiceResult<Uuid> {
        Self::validate_name(tenant, None, &supplier.name)?;
        supplier.name = supplier.name.trim().to_string();
        let id = supplier.id;
        tenant.suppliers.push(supplier);
        tenant.touch();
        Ok(id)
    }

    pub fn edit(tenant: &mut Tenant, id: Uuid, changes: Supplier) -> ServiceResult<()> {
        Self::validate_name(tenant, Some(id), &changes.name)?;
        let supplier = tenant
            .supplier_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Supplier not found".into()))?;
        supplier.name = changes.name.trim().to_string();
        supplier.contact = changes.contact;
        supplier.email = changes.email;
        supplier.phone = changes.phone;
        supplier.notes = changes.notes;
        tenant.touch();
        Ok(())
    }

    pub fn remove(tenant: &mut Tenant, id: Uuid) -> ServiceResult<Supplier> {
        if tenant
            .products
            .iter()
            .any(|product| product.supplier_id == Some(id))
        {
            return Err(ServiceError::Invalid("Supplier has linked products".into()));
        }
        let index = tenant
            .suppliers
            .iter()
            .position(|supplier| supplier.id == id)
            .ok_or_else(|| ServiceError::Invalid("Supplier not found".into()))?;
        let removed = tenant.suppliers.remove(index);
        tenant.touch();
        Ok(removed)
    }

    pub fn list(tenant: &Tenant) -> Vec<&Supplier> {
        let mut suppliers: Vec<&Supplier> = tenant.suppliers.iter().collect();
        suppliers.sort_by_key(|supplier| supplier.name.to_lowercase());
        suppliers
    }

    fn validate_name(tenant: &Tenant, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        ensure_unique_name(
            tenant.suppliers.iter().map(|s| (s.id, s.name.as_str())),
            exclude,
            candidate,
            "Supplier",
        )
    }
}
