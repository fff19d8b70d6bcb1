pub mod errors;
pub mod services;
pub mod tenant_manager;
pub mod utils;

pub use tenant_manager::{LoadMetadata, Session, TenantManager};
