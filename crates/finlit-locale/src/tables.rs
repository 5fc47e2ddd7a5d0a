use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::locale::{ContentCategory, Locale, resolve_locale};

/// One localized unit of content (a module, a lesson, a step payload).
pub type Entity = Map<String, Value>;

/// Entities of one category keyed by id, in authoring order.
pub type EntityTable = IndexMap<String, Entity>;

/// Flat UI strings for one screen or feature.
pub type CopyBundle = IndexMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    #[error("unknown {category} entity {id:?} in default locale")]
    UnknownEntity {
        category: ContentCategory,
        id: String,
    },
    #[error("unknown copy category {0:?} in default locale")]
    UnknownCopyCategory(String),
}

/// Everything one locale provides. Override locales may be sparse.
#[derive(Debug, Clone, Default)]
pub struct LocaleData {
    entities: HashMap<ContentCategory, EntityTable>,
    copy: IndexMap<String, CopyBundle>,
}

impl LocaleData {
    pub fn insert_entity(&mut self, category: ContentCategory, id: impl Into<String>, entity: Entity) {
        self.entities
            .entry(category)
            .or_default()
            .insert(id.into(), entity);
    }

    /// Insert a JSON object as an entity; other JSON values are ignored.
    pub fn insert_entity_json(&mut self, category: ContentCategory, id: impl Into<String>, value: Value) {
        let id = id.into();
        match value {
            Value::Object(entity) => self.insert_entity(category, id, entity),
            other => warn!("ignoring {category} entry {id:?}: expected object, got {other}"),
        }
    }

    pub fn insert_copy_bundle(&mut self, category: impl Into<String>, bundle: CopyBundle) {
        self.copy.insert(category.into(), bundle);
    }

    pub fn entity(&self, category: ContentCategory, id: &str) -> Option<&Entity> {
        self.entities.get(&category).and_then(|table| table.get(id))
    }

    pub fn table(&self, category: ContentCategory) -> Option<&EntityTable> {
        self.entities.get(&category)
    }

    pub fn copy_bundle(&self, category: &str) -> Option<&CopyBundle> {
        self.copy.get(category)
    }

    pub fn copy_categories(&self) -> impl Iterator<Item = &str> {
        self.copy.keys().map(String::as_str)
    }
}

/// Default tables plus sparse per-locale overrides. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct LocaleTables {
    default: LocaleData,
    overrides: HashMap<Locale, LocaleData>,
}

impl LocaleTables {
    pub fn new(default: LocaleData) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    /// Register overrides for a non-default locale.
    ///
    /// Data registered for [`Locale::DEFAULT`] is dropped; the default tables
    /// are fixed at construction.
    pub fn with_override(mut self, locale: Locale, data: LocaleData) -> Self {
        if locale.is_default() {
            warn!("ignoring override tables for default locale {locale}");
            return self;
        }
        self.overrides.insert(locale, data);
        self
    }

    pub fn default_data(&self) -> &LocaleData {
        &self.default
    }

    pub fn locale_data(&self, locale: Locale) -> Option<&LocaleData> {
        if locale.is_default() {
            Some(&self.default)
        } else {
            self.overrides.get(&locale)
        }
    }

    /// Bind a language preference once for repeated lookups.
    pub fn for_language(&self, preference: &str) -> ContentResolver<'_> {
        self.for_locale(resolve_locale(preference))
    }

    pub fn for_locale(&self, locale: Locale) -> ContentResolver<'_> {
        ContentResolver {
            tables: self,
            locale,
        }
    }

    /// Default entity with the preferred locale's fields merged on top.
    pub fn resolve_entity(
        &self,
        category: ContentCategory,
        id: &str,
        preference: &str,
    ) -> Result<Entity, LocaleError> {
        self.for_language(preference).entity(category, id)
    }

    /// Every default entity of `category`, localized for `preference`.
    pub fn resolve_all(&self, category: ContentCategory, preference: &str) -> Vec<(&str, Entity)> {
        self.for_language(preference).all(category)
    }

    /// The preferred locale's bundle for `category`, or the default bundle.
    ///
    /// Unlike [`LocaleTables::resolve_entity`] there is no per-key merge: a
    /// locale that defines the bundle is trusted to define all of it.
    pub fn resolve_copy_bundle(
        &self,
        category: &str,
        preference: &str,
    ) -> Result<&CopyBundle, LocaleError> {
        self.for_language(preference).copy_bundle(category)
    }

    /// How much of the default content `locale` translates.
    pub fn coverage(&self, locale: Locale) -> LocaleCoverage {
        let data = self.locale_data(locale);
        let categories = ContentCategory::ALL
            .into_iter()
            .map(|category| {
                let defaults = self.default.table(category);
                let total = defaults.map_or(0, IndexMap::len);
                let overridden = match (defaults, data.and_then(|d| d.table(category))) {
                    (Some(defaults), Some(localized)) => localized
                        .keys()
                        .filter(|id| defaults.contains_key(*id))
                        .count(),
                    _ => 0,
                };
                CategoryCoverage {
                    category,
                    total,
                    overridden,
                }
            })
            .collect();

        let (copy_categories, missing_copy_categories): (Vec<String>, Vec<String>) = self
            .default
            .copy_categories()
            .map(str::to_string)
            .partition(|name| {
                data.and_then(|d| d.copy_bundle(name))
                    .is_some_and(|bundle| !bundle.is_empty())
            });

        LocaleCoverage {
            locale,
            categories,
            copy_categories,
            missing_copy_categories,
        }
    }
}

/// Lookups for one resolved locale.
#[derive(Debug, Clone, Copy)]
pub struct ContentResolver<'a> {
    tables: &'a LocaleTables,
    locale: Locale,
}

impl<'a> ContentResolver<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn entity(&self, category: ContentCategory, id: &str) -> Result<Entity, LocaleError> {
        let base = self
            .tables
            .default
            .entity(category, id)
            .ok_or_else(|| LocaleError::UnknownEntity {
                category,
                id: id.to_string(),
            })?;
        Ok(merge_entity(base, self.localized_entity(category, id)))
    }

    /// Every default entity of `category`, localized, in default order.
    pub fn all(&self, category: ContentCategory) -> Vec<(&'a str, Entity)> {
        let Some(defaults) = self.tables.default.table(category) else {
            return Vec::new();
        };
        defaults
            .iter()
            .map(|(id, base)| {
                (
                    id.as_str(),
                    merge_entity(base, self.localized_entity(category, id)),
                )
            })
            .collect()
    }

    pub fn copy_bundle(&self, category: &str) -> Result<&'a CopyBundle, LocaleError> {
        self.tables
            .locale_data(self.locale)
            .and_then(|data| data.copy_bundle(category))
            .filter(|bundle| !bundle.is_empty())
            .or_else(|| self.tables.default.copy_bundle(category))
            .ok_or_else(|| LocaleError::UnknownCopyCategory(category.to_string()))
    }

    /// A single copy string, following the same whole-bundle fallback.
    pub fn copy(&self, category: &str, key: &str) -> Option<&'a str> {
        self.copy_bundle(category)
            .ok()
            .and_then(|bundle| bundle.get(key))
            .map(String::as_str)
    }

    fn localized_entity(&self, category: ContentCategory, id: &str) -> Option<&'a Entity> {
        if self.locale.is_default() {
            return None;
        }
        self.tables
            .overrides
            .get(&self.locale)
            .and_then(|data| data.entity(category, id))
    }
}

/// Shallow merge: override fields replace default fields one for one.
fn merge_entity(base: &Entity, localized: Option<&Entity>) -> Entity {
    let mut merged = base.clone();
    if let Some(localized) = localized {
        for (key, value) in localized {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCoverage {
    pub locale: Locale,
    pub categories: Vec<CategoryCoverage>,
    pub copy_categories: Vec<String>,
    pub missing_copy_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCoverage {
    pub category: ContentCategory,
    pub total: usize,
    pub overridden: usize,
}
