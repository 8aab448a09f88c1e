use crate::error::{Result, TenantryError};
use crate::tenancy::{HasDomains, Tenant, normalize_domain};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// In-memory tenant store indexed by id and by domain.
#[derive(Debug, Default)]
pub struct TenantRegistry {
    tenants: DashMap<String, Arc<Tenant>>,
    domains: DashMap<String, String>,
}

impl TenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tenant, replacing any tenant with the same id.
    ///
    /// Fails if one of its domains belongs to a different tenant. Domains are
    /// claimed one entry at a time, and released again on conflict.
    pub fn insert(&self, tenant: Tenant) -> Result<Arc<Tenant>> {
        let mut claimed = Vec::new();
        for domain in tenant.domains() {
            let owner = match self.domains.entry(domain.domain.clone()) {
                Entry::Occupied(owner) if owner.get() != tenant.id() => {
                    Some(owner.get().clone())
                }
                Entry::Occupied(_) => None,
                Entry::Vacant(slot) => {
                    slot.insert(tenant.id().to_string());
                    claimed.push(domain.domain.as_str());
                    None
                }
            };

            if let Some(owner) = owner {
                for domain in claimed {
                    self.release(domain, tenant.id());
                }
                return Err(TenantryError::DuplicateDomain {
                    domain: domain.domain.clone(),
                    tenant_id: owner,
                });
            }
        }

        let tenant = Arc::new(tenant);
        if let Some(previous) = self.tenants.insert(tenant.id().to_string(), tenant.clone()) {
            for domain in previous.domains() {
                if !tenant.has_domain(&domain.domain) {
                    self.release(&domain.domain, tenant.id());
                }
            }
        }

        tracing::debug!(
            tenant_id = tenant.id(),
            domains = tenant.domains().len(),
            "Registered tenant"
        );
        Ok(tenant)
    }

    pub fn find(&self, id: &str) -> Option<Arc<Tenant>> {
        self.tenants.get(id).map(|entry| entry.value().clone())
    }

    /// Look up the tenant owning `host`. A port suffix is ignored.
    pub fn find_by_domain(&self, host: &str) -> Option<Arc<Tenant>> {
        let domain = normalize_domain(strip_port(host));
        let id = self.domains.get(&domain)?.value().clone();
        self.find(&id)
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Tenant>> {
        let (_, tenant) = self.tenants.remove(id)?;
        self.unindex(&tenant);
        Some(tenant)
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }

    fn unindex(&self, tenant: &Tenant) {
        for domain in tenant.domains() {
            self.release(&domain.domain, tenant.id());
        }
    }

    fn release(&self, domain: &str, tenant_id: &str) {
        self.domains.remove_if(domain, |_, owner| owner == tenant_id);
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal
        return host
            .split_once(']')
            .map_or(host, |(addr, _)| &host[..=addr.len()]);
    }
    host.split_once(':').map_or(host, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(id: &str, domains: &[&str]) -> Tenant {
        let mut tenant = Tenant::with_id(id);
        for domain in domains {
            tenant.add_domain(domain);
        }
        tenant
    }

    #[test]
    fn finds_by_id_and_domain() {
        let registry = TenantRegistry::new();
        registry.insert(tenant("acme", &["acme.test", "www.acme.test"])).unwrap();

        assert_eq!(registry.find("acme").unwrap().id(), "acme");
        assert_eq!(registry.find_by_domain("WWW.acme.test:8080").unwrap().id(), "acme");
        assert!(registry.find_by_domain("globex.test").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_domain_owned_by_another_tenant() {
        let registry = TenantRegistry::new();
        registry.insert(tenant("acme", &["acme.test"])).unwrap();

        let err = registry.insert(tenant("globex", &["acme.test"])).unwrap_err();
        assert!(matches!(
            err,
            TenantryError::DuplicateDomain { ref tenant_id, .. } if tenant_id == "acme"
        ));
        assert!(registry.find("globex").is_none());
    }

    #[test]
    fn reinserting_replaces_domains() {
        let registry = TenantRegistry::new();
        registry.insert(tenant("acme", &["old.acme.test"])).unwrap();
        registry.insert(tenant("acme", &["new.acme.test"])).unwrap();

        assert!(registry.find_by_domain("old.acme.test").is_none());
        assert!(registry.find_by_domain("new.acme.test").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_drops_domains() {
        let registry = TenantRegistry::new();
        registry.insert(tenant("acme", &["acme.test"])).unwrap();

        assert!(registry.remove("acme").is_some());
        assert!(registry.find_by_domain("acme.test").is_none());
        assert!(registry.is_empty());
        assert!(registry.remove("acme").is_none());
    }

    #[test]
    fn concurrent_inserts_claim_a_domain_once() {
        let registry = TenantRegistry::new();
        let winners: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let registry = &registry;
                    scope.spawn(move || {
                        let id = format!("tenant-{i}");
                        let own = format!("own-{i}.test");
                        registry
                            .insert(tenant(&id, &[own.as_str(), "shared.test"]))
                            .map(|_| id)
                            .ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|handle| handle.join().unwrap())
                .collect()
        });

        assert_eq!(winners.len(), 1);
        assert_eq!(registry.len(), 1);
        let owner = registry.find_by_domain("shared.test").unwrap();
        assert_eq!(owner.id(), winners[0]);
        // Losers released the domains they had already claimed.
        for i in 0..8 {
            let own = registry.find_by_domain(&format!("own-{i}.test"));
            assert_eq!(own.is_some(), format!("tenant-{i}") == winners[0]);
        }
    }

    #[test]
    fn failed_insert_keeps_previous_domains() {
        let registry = TenantRegistry::new();
        registry.insert(tenant("acme", &["acme.test"])).unwrap();
        registry.insert(tenant("globex", &["globex.test"])).unwrap();

        let err = registry.insert(tenant("acme", &["acme.test", "fresh.test", "globex.test"]));
        assert!(err.is_err());
        assert_eq!(registry.find_by_domain("acme.test").unwrap().id(), "acme");
        assert!(registry.find_by_domain("fresh.test").is_none());
        assert_eq!(registry.find_by_domain("globex.test").unwrap().id(), "globex");
    }

    #[test]
    fn strips_ports() {
        assert_eq!(strip_port("acme.test:443"), "acme.test");
        assert_eq!(strip_port("acme.test"), "acme.test");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
    }
}
