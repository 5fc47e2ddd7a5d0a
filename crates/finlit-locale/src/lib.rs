//! Localized curriculum content and UI copy.
//!
//! The default locale ([`Locale::DEFAULT`]) holds the complete, authoritative
//! tables. Other locales only carry what they translate, and resolution fills
//! the gaps from the default in two different ways:
//!
//! - entities (modules, lessons, step payloads) merge field by field, so a
//!   translated lesson that only overrides `title` keeps every other field;
//! - copy bundles fall back as a whole: a locale either has a bundle for a
//!   screen or the default bundle is used unchanged.
//!
//! Language preferences are free-form strings from settings storage;
//! [`resolve_locale`] maps any of them to a supported locale and never fails.
//!
//! # Example
//! ```rust
//! use finlit_locale::{ContentCategory, LocaleData, LocaleTables};
//! use serde_json::json;
//!
//! let mut en = LocaleData::default();
//! en.insert_entity_json(ContentCategory::Lessons, "l1", json!({ "title": "Budgeting", "minutes": 5 }));
//! let mut nl = LocaleData::default();
//! nl.insert_entity_json(ContentCategory::Lessons, "l1", json!({ "title": "Budgetteren" }));
//!
//! let tables = LocaleTables::new(en).with_override(finlit_locale::Locale::Nl, nl);
//! let lesson = tables.resolve_entity(ContentCategory::Lessons, "l1", "Dutch").unwrap();
//! assert_eq!(lesson["title"], "Budgetteren");
//! assert_eq!(lesson["minutes"], 5);
//! ```

pub mod loader;
pub mod locale;
pub mod tables;

pub use locale::{ContentCategory, Locale, resolve_locale};
pub use tables::{
    CategoryCoverage, ContentResolver, CopyBundle, Entity, EntityTable, LocaleCoverage,
    LocaleData, LocaleError, LocaleTables,
};
