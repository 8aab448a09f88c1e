use crate::error::{Result, TenantryError};
use crate::lang::{MessageKey, make_replacements};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use strum::IntoEnumIterator;

/// Locale the built-in catalog ships with.
pub const DEFAULT_LOCALE: &str = "en";

const EN: &str = include_str!("../../lang/en.json");

/// Message lines keyed by locale, then by key.
///
/// Every loaded locale is checked to define all [`MessageKey`]s, so lookups by
/// `MessageKey` cannot miss once the catalog is built. Lookups by arbitrary
/// string key are fallible and fall back to the fallback locale first.
///
/// # Example
/// ```
/// use tenantry::lang::{MessageCatalog, MessageKey};
///
/// let catalog = MessageCatalog::builtin().unwrap();
/// let replace = [("model", "Widget"), ("id", "7")];
/// let line = catalog.message_with("en", MessageKey::ModelNotFound, &replace);
/// assert_eq!(line, "Widget with ID 7 not found.");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locales: HashMap<String, HashMap<String, String>>,
    fallback: String,
}

impl MessageCatalog {
    /// Catalog holding the bundled English lines, with English as fallback.
    pub fn builtin() -> Result<Self> {
        let mut catalog = Self {
            locales: HashMap::new(),
            fallback: DEFAULT_LOCALE.to_string(),
        };
        catalog.load_json(DEFAULT_LOCALE, EN)?;
        Ok(catalog)
    }

    /// Parse a flat JSON object of `key: line` pairs and add it as `locale`.
    pub fn load_json(&mut self, locale: &str, json: &str) -> Result<()> {
        let lines: HashMap<String, String> =
            serde_json::from_str(json).map_err(|source| TenantryError::InvalidCatalog {
                locale: locale.to_string(),
                source,
            })?;
        self.add_locale(locale, lines)
    }

    /// Load every `<locale>.json` file in `dir`. Returns the loaded locales.
    pub fn load_dir(&mut self, dir: &Path) -> Result<Vec<String>> {
        let io_error = |path: &Path| {
            let path = path.display().to_string();
            move |source: std::io::Error| TenantryError::CatalogIo { path, source }
        };

        let mut loaded = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error(dir))? {
            let path = entry.map_err(io_error(dir))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let json = fs::read_to_string(&path).map_err(io_error(&path))?;
            self.load_json(locale, &json)?;
            loaded.push(locale.to_string());
        }
        loaded.sort();
        Ok(loaded)
    }

    /// Add or replace a locale. Fails if any [`MessageKey`] is missing.
    pub fn add_locale(
        &mut self,
        locale: impl Into<String>,
        lines: HashMap<String, String>,
    ) -> Result<()> {
        let locale = locale.into();
        if let Some(missing) = MessageKey::iter().find(|key| !lines.contains_key(key.as_ref())) {
            return Err(TenantryError::missing_translation(locale, missing.as_ref()));
        }
        tracing::debug!(locale = %locale, lines = lines.len(), "Loaded message catalog");
        self.locales.insert(locale, lines);
        Ok(())
    }

    pub fn set_fallback(&mut self, locale: &str) -> Result<()> {
        self.ensure_locale(locale)?;
        self.fallback = locale.to_string();
        Ok(())
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    pub fn ensure_locale(&self, locale: &str) -> Result<()> {
        if self.has_locale(locale) {
            Ok(())
        } else {
            Err(TenantryError::UnknownLocale {
                locale: locale.to_string(),
            })
        }
    }

    /// Raw template for `key`, trying `locale` then the fallback locale.
    pub fn line(&self, locale: &str, key: &str) -> Result<&str> {
        [locale, self.fallback.as_str()]
            .into_iter()
            .filter_map(|candidate| self.locales.get(candidate))
            .find_map(|lines| lines.get(key))
            .map(String::as_str)
            .ok_or_else(|| TenantryError::missing_translation(locale, key))
    }

    /// Template for `key` with placeholders substituted.
    pub fn get(&self, locale: &str, key: &str, replace: &[(&str, &str)]) -> Result<String> {
        self.line(locale, key)
            .map(|line| make_replacements(line, replace))
    }

    pub fn message(&self, locale: &str, key: MessageKey) -> String {
        self.message_with(locale, key, &[])
    }

    pub fn message_with(&self, locale: &str, key: MessageKey, replace: &[(&str, &str)]) -> String {
        // Loaded locales are complete, so this only misses if the fallback
        // locale itself was never loaded.
        self.get(locale, key.as_ref(), replace)
            .unwrap_or_else(|_| key.as_ref().to_string())
    }
}
