//! On-disk layout:
//!
//! ```text
//! <dir>/en/modules.json   { "<id>": { ... } }  or  [ { "id": "<id>", ... } ]
//! <dir>/en/lessons.json
//! <dir>/en/steps.json
//! <dir>/en/copy.json      { "<category>": { "<key>": "<string>" } }
//! <dir>/nl/...            same files, any subset, entries may be partial
//! ```
//!
//! The default locale directory must exist. Every file is optional; a missing
//! file is an empty table.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::locale::{ContentCategory, Locale};
use crate::tables::{CopyBundle, LocaleData, LocaleTables};

const COPY_FILE: &str = "copy.json";

impl LocaleTables {
    /// Load the default locale and every override found under `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let default_dir = dir.join(Locale::DEFAULT.code());
        if !default_dir.is_dir() {
            bail!(
                "default locale directory {} does not exist",
                default_dir.display()
            );
        }

        let default = load_locale(&default_dir)?;
        info!(
            "loaded default locale {} from {}",
            Locale::DEFAULT,
            default_dir.display()
        );
        let mut tables = LocaleTables::new(default);

        for locale in Locale::ALL.into_iter().filter(|l| !l.is_default()) {
            let locale_dir = dir.join(locale.code());
            if !locale_dir.is_dir() {
                debug!("no override directory for locale {locale}");
                continue;
            }
            let data = load_locale(&locale_dir)?;
            warn_orphans(&tables, locale, &data);
            info!("loaded locale {locale} from {}", locale_dir.display());
            tables = tables.with_override(locale, data);
        }

        Ok(tables)
    }
}

fn load_locale(dir: &Path) -> Result<LocaleData> {
    let mut data = LocaleData::default();

    for category in ContentCategory::ALL {
        let path = dir.join(format!("{}.json", category.name()));
        let Some(value) = load_optional_json(&path)? else {
            continue;
        };
        for (id, entity) in entity_entries(&path, value)? {
            data.insert_entity_json(category, id, entity);
        }
    }

    let copy_path = dir.join(COPY_FILE);
    if let Some(value) = load_optional_json(&copy_path)? {
        let bundles: IndexMap<String, CopyBundle> = serde_json::from_value(value)
            .with_context(|| format!("copy bundles in {}", copy_path.display()))?;
        for (category, bundle) in bundles {
            data.insert_copy_bundle(category, bundle);
        }
    }

    Ok(data)
}

fn load_optional_json(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        debug!("optional file {} not found", path.display());
        return Ok(None);
    }
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

/// Accept either an id-keyed object or an array of objects carrying `id`.
fn entity_entries(path: &Path, value: Value) -> Result<Vec<(String, Value)>> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(pos, item)| {
                let id = item.get("id").and_then(Value::as_str).map(str::to_string);
                if id.is_none() {
                    warn!("{}: entry {pos} has no string id; skipped", path.display());
                }
                id.map(|id| (id, item))
            })
            .collect()),
        other => bail!(
            "{}: expected an object or array of entities, got {other}",
            path.display()
        ),
    }
}

fn warn_orphans(tables: &LocaleTables, locale: Locale, data: &LocaleData) {
    for category in ContentCategory::ALL {
        let Some(table) = data.table(category) else {
            continue;
        };
        for id in table.keys() {
            if tables.default_data().entity(category, id).is_none() {
                warn!("locale {locale} overrides unknown {category} entity {id:?}; ignored");
            }
        }
    }
}
