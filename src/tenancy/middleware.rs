use crate::exception::Throwable;
use crate::tenancy::{Tenant, TenantRegistry};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

/// The tenant identified for the current request.
///
/// Inserted into request extensions for handlers, and into response extensions
/// so outer layers can tag their logs.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub Arc<Tenant>);

impl Deref for CurrentTenant {
    type Target = Tenant;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Error)]
#[error("Tenant could not be identified on domain {domain}")]
pub struct TenantCouldNotBeIdentifiedOnDomainException {
    pub domain: String,
}

/// Resolve the tenant from the `Host` header.
///
/// Use with [`axum::middleware::from_fn_with_state`], placed inside the
/// exception layer so an unknown host is rendered like any other error.
pub async fn identify_tenant_by_domain(
    State(registry): State<Arc<TenantRegistry>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Throwable> {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| request.uri().host())
        .unwrap_or_default()
        .to_string();

    let Some(tenant) = registry.find_by_domain(&host) else {
        tracing::warn!(host = %host, "No tenant for domain");
        return Err(TenantCouldNotBeIdentifiedOnDomainException { domain: host }.into());
    };

    tracing::debug!(tenant_id = tenant.id(), host = %host, "Identified tenant");
    let current = CurrentTenant(tenant);
    request.extensions_mut().insert(current.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(current);
    Ok(response)
}
