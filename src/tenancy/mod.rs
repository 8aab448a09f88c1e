//! Tenant model and domain-based identification.

mod middleware;
mod registry;
mod tenant;

pub use middleware::{
    CurrentTenant, TenantCouldNotBeIdentifiedOnDomainException, identify_tenant_by_domain,
};
pub use registry::TenantRegistry;
pub use tenant::{
    Domain, HasDomains, INTERNAL_DB_NAME, Tenant, TenantWithDatabase, normalize_domain,
};
