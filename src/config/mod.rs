use crate::error::{Result, TenantryError};
use crate::lang::DEFAULT_LOCALE;
use dashmap::DashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumString};

/// Raw string settings, seeded from the process environment.
#[derive(Clone, Default)]
pub struct ConfigService {
    values: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn from_env() -> Self {
        Self::from_pairs(env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let service = Self::default();
        for (key, value) in pairs {
            service.values.insert(key.into(), value.into());
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Deployment environment. Only `production` hides internal error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Local,
    Testing,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenancyConfig {
    pub database_prefix: String,
    pub database_suffix: String,
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            database_prefix: "tenant".to_string(),
            database_suffix: String::new(),
        }
    }
}

/// Typed application settings.
///
/// | Key | Default |
/// |---|---|
/// | `APP_NAME` | `tenantry` |
/// | `APP_ENV` | `production` |
/// | `APP_LOCALE` | `en` |
/// | `APP_FALLBACK_LOCALE` | `en` |
/// | `APP_LANG_PATH` | none (bundled English only) |
/// | `TENANCY_DB_PREFIX` | `tenant` |
/// | `TENANCY_DB_SUFFIX` | empty |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub locale: String,
    pub fallback_locale: String,
    pub lang_path: Option<PathBuf>,
    pub tenancy: TenancyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "tenantry".to_string(),
            environment: Environment::default(),
            locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: DEFAULT_LOCALE.to_string(),
            lang_path: None,
            tenancy: TenancyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_service(&ConfigService::from_env())
    }

    pub fn from_service(config: &ConfigService) -> Result<Self> {
        let defaults = Self::default();
        let environment = match config.get("APP_ENV") {
            Some(value) => {
                Environment::from_str(value.trim()).map_err(|_| TenantryError::InvalidConfig {
                    key: "APP_ENV".to_string(),
                    value,
                })?
            }
            None => defaults.environment,
        };

        let tenancy = &defaults.tenancy;
        Ok(Self {
            name: config.get_or("APP_NAME", &defaults.name),
            environment,
            locale: config.get_or("APP_LOCALE", &defaults.locale),
            fallback_locale: config.get_or("APP_FALLBACK_LOCALE", &defaults.fallback_locale),
            lang_path: config.get("APP_LANG_PATH").map(PathBuf::from),
            tenancy: TenancyConfig {
                database_prefix: config.get_or("TENANCY_DB_PREFIX", &tenancy.database_prefix),
                database_suffix: config.get_or("TENANCY_DB_SUFFIX", &tenancy.database_suffix),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_production_english() {
        let config = AppConfig::from_service(&ConfigService::default()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.environment.is_production());
    }

    #[test]
    fn reads_typed_values() {
        let service = ConfigService::from_pairs([
            ("APP_ENV", "Local"),
            ("APP_LOCALE", "es"),
            ("TENANCY_DB_PREFIX", "t_"),
            ("TENANCY_DB_SUFFIX", "_db"),
        ]);
        let config = AppConfig::from_service(&service).unwrap();
        assert_eq!(config.environment, Environment::Local);
        assert!(!config.environment.is_production());
        assert_eq!(config.locale, "es");
        assert_eq!(config.fallback_locale, "en");
        assert_eq!(config.tenancy.database_prefix, "t_");
        assert_eq!(config.tenancy.database_suffix, "_db");
    }

    #[test]
    fn rejects_unknown_environment() {
        let service = ConfigService::from_pairs([("APP_ENV", "prod")]);
        let err = AppConfig::from_service(&service).unwrap_err();
        assert!(matches!(err, TenantryError::InvalidConfig { ref key, .. } if key == "APP_ENV"));
    }

    #[test]
    fn set_overrides_values() {
        let service = ConfigService::default();
        service.set("APP_NAME", "billing");
        assert_eq!(service.get("APP_NAME").as_deref(), Some("billing"));
        assert_eq!(service.get_or("MISSING", "x"), "x");
    }
}
