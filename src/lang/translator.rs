use crate::error::Result;
use crate::lang::{MessageCatalog, MessageKey};
use std::sync::Arc;

/// A catalog bound to the application locale.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<MessageCatalog>,
    locale: String,
}

impl Translator {
    /// Fails if `locale` was never loaded into the catalog.
    pub fn new(catalog: Arc<MessageCatalog>, locale: impl Into<String>) -> Result<Self> {
        let locale = locale.into();
        catalog.ensure_locale(&locale)?;
        Ok(Self { catalog, locale })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn catalog(&self) -> &Arc<MessageCatalog> {
        &self.catalog
    }

    pub fn trans(&self, key: MessageKey) -> String {
        self.catalog.message(&self.locale, key)
    }

    pub fn trans_with(&self, key: MessageKey, replace: &[(&str, &str)]) -> String {
        self.catalog.message_with(&self.locale, key, replace)
    }

    /// Lookup by an application-defined key that may be absent.
    pub fn get(&self, key: &str, replace: &[(&str, &str)]) -> Result<String> {
        self.catalog.get(&self.locale, key, replace)
    }
}
