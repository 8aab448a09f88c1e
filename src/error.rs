use thiserror::Error;

/// Defaults to [`TenantryError`]; handlers name their own error type, as in
/// `Result<Json<Widget>, Throwable>`.
pub type Result<T, E = TenantryError> = std::result::Result<T, E>;

/// Configuration and wiring failures.
///
/// These surface while the application boots. Errors raised while serving a
/// request go through [`crate::exception::Throwable`] instead.
#[derive(Debug, Error)]
pub enum TenantryError {
    #[error("No binding registered for {type_name}")]
    BindingNotFound { type_name: String },

    #[error("Failed to downcast binding: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Missing translation for key '{key}' in locale '{locale}'")]
    MissingTranslation { locale: String, key: String },

    #[error("Failed to read message catalog {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Locale '{locale}' is not loaded")]
    UnknownLocale { locale: String },

    #[error("Invalid message catalog for locale '{locale}': {source}")]
    InvalidCatalog {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value '{value}' for configuration key {key}")]
    InvalidConfig { key: String, value: String },

    #[error("Domain '{domain}' already belongs to tenant {tenant_id}")]
    DuplicateDomain { domain: String, tenant_id: String },
}

impl TenantryError {
    pub fn binding_not_found<T: ?Sized>() -> Self {
        Self::BindingNotFound {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }

    pub fn missing_translation(locale: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingTranslation {
            locale: locale.into(),
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::{HttpException, Throwable};

    fn lookup(found: bool) -> Result<u8> {
        if found {
            Ok(7)
        } else {
            Err(TenantryError::binding_not_found::<u8>())
        }
    }

    // Handler-style signature with the alias in scope.
    fn handler(found: bool) -> Result<u8, Throwable> {
        if !found {
            return Err(HttpException::not_found("missing").into());
        }
        Ok(lookup(found)?)
    }

    #[test]
    fn alias_takes_an_explicit_error_type() {
        assert_eq!(handler(true).unwrap(), 7);
        assert_eq!(handler(false).unwrap_err().class_name(), "NotFoundHttpException");
        assert!(matches!(
            lookup(false),
            Err(TenantryError::BindingNotFound { ref type_name }) if type_name == "u8"
        ));
    }
}
