//! Localized message lines.
//!
//! Lines live in `lang/<locale>.json` as a flat object of symbolic keys to
//! templates. Templates may carry `:name` placeholders.

mod catalog;
mod key;
mod replace;
mod translator;

pub use catalog::{DEFAULT_LOCALE, MessageCatalog};
pub use key::MessageKey;
pub use replace::make_replacements;
pub use translator::Translator;
