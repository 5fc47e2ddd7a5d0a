use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use finlit_curriculum::{CurriculumOutline, GrowthParams, ModuleOutline, project_growth};
use finlit_glossary::GlossaryIndex;
use finlit_locale::{ContentCategory, Entity, LocaleTables, resolve_locale};
use finlit_types::{ContentNode, GlossaryTerm, KnowledgeLevel, TextSegment};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::{Command, Config};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentView<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    term_id: Option<&'a str>,
}

impl<'a> From<TextSegment<'a>> for SegmentView<'a> {
    fn from(segment: TextSegment<'a>) -> Self {
        Self {
            text: segment.text,
            term_id: segment.term_id(),
        }
    }
}

#[derive(Serialize)]
struct LinkResponse<'a> {
    segments: Vec<SegmentView<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TermsResponse<'a> {
    term_ids: Vec<&'a str>,
    labels: Vec<&'a str>,
}

#[derive(Serialize)]
struct DefineResponse<'a> {
    term: &'a GlossaryTerm,
    level: KnowledgeLevel,
    description: &'a str,
}

#[derive(Serialize)]
struct LocaleResponse<'a> {
    preference: &'a str,
    locale: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct EntityResponse<'a> {
    locale: &'static str,
    category: ContentCategory,
    id: &'a str,
    entity: Entity,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LessonNeighbours<'a> {
    lesson_id: &'a str,
    module_id: Option<&'a str>,
    previous: Option<&'a str>,
    next: Option<&'a str>,
}

/// Run one command and return its JSON output.
pub fn execute(command: &Command, config: &Config) -> Result<Value> {
    let output = match command {
        Command::Link { text } => {
            let index = load_glossary(config)?;
            let segments = index
                .split_text(text)
                .into_iter()
                .map(SegmentView::from)
                .collect();
            serde_json::to_value(LinkResponse { segments })?
        }
        Command::Terms { content } => {
            let index = load_glossary(config)?;
            let node = load_content(content)?;
            let term_ids = index.collect_term_ids(&node);
            let labels = term_ids
                .iter()
                .filter_map(|id| index.term(id))
                .map(|term| term.term.as_str())
                .collect();
            serde_json::to_value(TermsResponse { term_ids, labels })?
        }
        Command::Define { term_id } => {
            let index = load_glossary(config)?;
            let term = index
                .term(term_id)
                .ok_or_else(|| anyhow!("unknown glossary term {term_id:?}"))?;
            serde_json::to_value(DefineResponse {
                term,
                level: config.level,
                description: term.description_for(config.level),
            })?
        }
        Command::Locale { preference } => {
            let locale = resolve_locale(preference);
            serde_json::to_value(LocaleResponse {
                preference,
                locale: locale.code(),
                name: locale.native_name(),
            })?
        }
        Command::Entity { category, id } => {
            let category = parse_category(category)?;
            let tables = load_tables(config)?;
            let resolver = tables.for_language(&config.language);
            let entity = resolver.entity(category, id)?;
            serde_json::to_value(EntityResponse {
                locale: resolver.locale().code(),
                category,
                id,
                entity,
            })?
        }
        Command::Copy { category } => {
            let tables = load_tables(config)?;
            let bundle = tables.resolve_copy_bundle(category, &config.language)?;
            serde_json::to_value(bundle)?
        }
        Command::Coverage { locale } => {
            let tables = load_tables(config)?;
            serde_json::to_value(tables.coverage(resolve_locale(locale)))?
        }
        Command::NextLesson { lesson_id } => {
            let outline = load_outline(config)?;
            if outline.position(lesson_id).is_none() {
                bail!("lesson {lesson_id:?} is not part of the curriculum");
            }
            serde_json::to_value(LessonNeighbours {
                lesson_id,
                module_id: outline.module_of(lesson_id),
                previous: outline.previous_lesson(lesson_id),
                next: outline.next_lesson(lesson_id),
            })?
        }
        Command::Project {
            principal,
            monthly,
            rate,
            years,
        } => {
            let table = project_growth(GrowthParams {
                principal: *principal,
                monthly_contribution: *monthly,
                annual_rate_percent: *rate,
                years: *years,
            })?;
            serde_json::to_value(table)?
        }
    };
    Ok(output)
}

fn load_glossary(config: &Config) -> Result<GlossaryIndex> {
    let start = Instant::now();
    let index = GlossaryIndex::load_from_file(&config.glossary_path).with_context(|| {
        format!("load glossary from {}", config.glossary_path.display())
    })?;
    info!("glossary indexed in {} ms", start.elapsed().as_millis());
    Ok(index)
}

fn load_tables(config: &Config) -> Result<LocaleTables> {
    let start = Instant::now();
    let tables = LocaleTables::load_dir(&config.locales_dir)?;
    info!("locale tables loaded in {} ms", start.elapsed().as_millis());
    Ok(tables)
}

fn load_outline(config: &Config) -> Result<CurriculumOutline> {
    match &config.curriculum_path {
        Some(path) => CurriculumOutline::load_from_file(path),
        None => Ok(outline_from_tables(&load_tables(config)?)),
    }
}

fn load_content(path: &Path) -> Result<ContentNode> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn parse_category(name: &str) -> Result<ContentCategory> {
    ContentCategory::from_name(name).ok_or_else(|| {
        anyhow!("unknown content category {name:?}; expected modules, lessons, or steps")
    })
}

/// Modules in `order`, lessons grouped by their `moduleId` in table order.
fn outline_from_tables(tables: &LocaleTables) -> CurriculumOutline {
    let data = tables.default_data();
    let mut ordered: Vec<(u64, ModuleOutline)> = data
        .table(ContentCategory::Modules)
        .map(|modules| {
            modules
                .iter()
                .map(|(id, module)| {
                    let order = module
                        .get("order")
                        .and_then(Value::as_u64)
                        .unwrap_or(u64::MAX);
                    (
                        order,
                        ModuleOutline {
                            id: id.clone(),
                            lessons: Vec::new(),
                        },
                    )
                })
                .collect()
        })
        .unwrap_or_default();
    ordered.sort_by_key(|(order, _)| *order);
    let mut modules: Vec<ModuleOutline> = ordered.into_iter().map(|(_, m)| m).collect();

    if let Some(lessons) = data.table(ContentCategory::Lessons) {
        for (lesson_id, lesson) in lessons {
            let Some(module_id) = lesson.get("moduleId").and_then(Value::as_str) else {
                warn!("lesson {lesson_id:?} has no moduleId; left out of the outline");
                continue;
            };
            match modules.iter_mut().find(|m| m.id == module_id) {
                Some(module) => module.lessons.push(lesson_id.clone()),
                None => warn!("lesson {lesson_id:?} names unknown module {module_id:?}"),
            }
        }
    }

    CurriculumOutline { modules }
}
