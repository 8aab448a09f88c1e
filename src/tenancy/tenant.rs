use crate::config::TenancyConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Data key overriding the generated database name.
pub const INTERNAL_DB_NAME: &str = "tenancy_db_name";

/// A hostname routed to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub domain: String,
    pub tenant_id: String,
}

/// An isolated customer of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    id: String,
    #[serde(default)]
    data: Map<String, Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    domains: Vec<Domain>,
}

impl Tenant {
    /// New tenant with a random UUID v4 id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            data: Map::new(),
            created_at: now,
            updated_at: now,
            domains: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Set a custom attribute, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.touch();
        self.data.insert(key.into(), value.into())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Tenant {
    fn default() -> Self {
        Self::new()
    }
}

/// Tenants owning a dedicated database.
pub trait TenantWithDatabase {
    fn database_name(&self, config: &TenancyConfig) -> String;
}

impl TenantWithDatabase for Tenant {
    fn database_name(&self, config: &TenancyConfig) -> String {
        match self.get(INTERNAL_DB_NAME).and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => format!("{}{}{}", config.database_prefix, self.id, config.database_suffix),
        }
    }
}

/// Tenants reachable through one or more hostnames.
pub trait HasDomains {
    fn domains(&self) -> &[Domain];

    /// Attach a hostname. Returns false if it was already attached.
    fn add_domain(&mut self, domain: &str) -> bool;

    fn has_domain(&self, domain: &str) -> bool {
        let domain = normalize_domain(domain);
        self.domains().iter().any(|d| d.domain == domain)
    }
}

impl HasDomains for Tenant {
    fn domains(&self) -> &[Domain] {
        &self.domains
    }

    fn add_domain(&mut self, domain: &str) -> bool {
        if self.has_domain(domain) {
            return false;
        }
        self.domains.push(Domain {
            domain: normalize_domain(domain),
            tenant_id: self.id.clone(),
        });
        self.touch();
        true
    }
}

/// Lowercase hostname without surrounding whitespace or a trailing dot.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_tenant_gets_uuid_id() {
        let tenant = Tenant::new();
        assert!(Uuid::parse_str(tenant.id()).is_ok());
        assert_eq!(tenant.created_at(), tenant.updated_at());
        assert!(tenant.domains().is_empty());
    }

    #[test]
    fn database_name_uses_prefix_and_suffix() {
        let tenant = Tenant::with_id("acme");
        assert_eq!(tenant.database_name(&TenancyConfig::default()), "tenantacme");

        let config = TenancyConfig {
            database_prefix: "t_".into(),
            database_suffix: "_db".into(),
        };
        assert_eq!(tenant.database_name(&config), "t_acme_db");
    }

    #[test]
    fn database_name_can_be_overridden() {
        let mut tenant = Tenant::with_id("acme");
        tenant.set(INTERNAL_DB_NAME, "legacy_acme");
        assert_eq!(tenant.database_name(&TenancyConfig::default()), "legacy_acme");
    }

    #[test]
    fn set_returns_previous_value() {
        let mut tenant = Tenant::with_id("acme");
        assert_eq!(tenant.set("plan", "free"), None);
        assert_eq!(tenant.set("plan", json!("pro")), Some(json!("free")));
        assert_eq!(tenant.get("plan"), Some(&json!("pro")));
        assert!(tenant.updated_at() >= tenant.created_at());
    }

    #[test]
    fn domains_are_normalized_and_unique() {
        let mut tenant = Tenant::with_id("acme");
        assert!(tenant.add_domain(" Acme.Example.com. "));
        assert!(!tenant.add_domain("acme.example.com"));

        assert_eq!(
            tenant.domains(),
            &[Domain {
                domain: "acme.example.com".into(),
                tenant_id: "acme".into(),
            }]
        );
        assert!(tenant.has_domain("ACME.example.com"));
        assert!(!tenant.has_domain("other.example.com"));
    }

    #[test]
    fn serializes_attributes() {
        let mut tenant = Tenant::with_id("acme");
        tenant.set("plan", "pro");
        tenant.add_domain("acme.test");

        let value = serde_json::to_value(&tenant).unwrap();
        assert_eq!(value["id"], "acme");
        assert_eq!(value["data"]["plan"], "pro");
        assert_eq!(value["domains"][0]["domain"], "acme.test");

        let back: Tenant = serde_json::from_value(value).unwrap();
        assert_eq!(back, tenant);
    }
}
