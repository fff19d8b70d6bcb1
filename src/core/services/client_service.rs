use uuid::Uuid;

use crate::ledger::{Client, Tenant};

use super::{ensure_unique_name, ServiceError, ServiceResult};

pub struct ClientService;

impl ClientService {
    pub fn add(tenant: &mut Tenant, mut client: Client) -> ServiceResult<Uuid> {
        Self::validate_name(tenant, None, &client.name)?;
        client.name = client.name.trim().to_string();
        let id = client.id;
        tenant.clients.push(client);
        tenant.touch();
        Ok(id)
    }

    pub fn edit(tenant: &mut Tenant, id: Uuid, changes: Client) -> ServiceResult<()> {
        Self::validate_name(tenant, Some(id), &changes.name)?;
        let client = tenant
            .client_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Client not found".into()))?;
        client.name = changes.name.trim().to_string();
        client.tax_id = changes.tax_id;
        client.email = changes.email;
        client.phone = changes.phone;
        client.address = changes.address;
        client.notes = changes.notes;
        tenant.touch();
        Ok(())
    }

    pub fn remove(tenant: &mut Tenant, id: Uuid) -> ServiceResult<Client> {
        if tenant.orders.iter().any(|order| order.client_id == id) {
            return Err(ServiceError::Invalid("Client has linked orders".into()));
        }
        let index = tenant
            .clients
            .iter()
            .position(|client| client.id == id)
            .ok_or_else(|| ServiceError::Invalid("Client not found".into()))?;
        let removed = tenant.clients.remove(index);
        tenant.touch();
        Ok(removed)
    }

    /// Clients sorted by name.
    pub fn list(tenant: &Tenant) -> Vec<&Client> {
        let mut clients: Vec<&Client> = tenant.clients.iter().collect();
        clients.sort_by_key(|client| client.name.to_lowercase());
        clients
    }

    fn validate_name(tenant: &Tenant, exclude: Option<Uuid>, candidate: &str) -> ServiceResult<()> {
        ensure_unique_name(
            tenant.clients.iter().map(|c| (c.id, c.name.as_str())),
            exclude,
            candidate,
            "Client",
        )
    }
}
