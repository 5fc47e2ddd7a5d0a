use std::path::PathBuf;

use clap::{Parser, Subcommand};
use finlit_types::KnowledgeLevel;

const DEFAULT_GLOSSARY: &str = "data/glossary.json";
const DEFAULT_LOCALES_DIR: &str = "data/locales";
const DEFAULT_LANGUAGE: &str = "English";
const DEFAULT_LEVEL: &str = "intermediate";

#[derive(Parser, Debug)]
#[command(name = "finlit")]
#[command(about = "Inspect glossary linking, localized content, and curriculum data")]
pub struct Cli {
    /// Glossary JSON file (array of terms).
    #[arg(long, global = true, env = "FINLIT_GLOSSARY", default_value = DEFAULT_GLOSSARY)]
    pub glossary: PathBuf,

    /// Directory holding one sub-directory per locale code.
    #[arg(long, global = true, env = "FINLIT_LOCALES_DIR", default_value = DEFAULT_LOCALES_DIR)]
    pub locales: PathBuf,

    /// Curriculum outline JSON; derived from the locale tables when absent.
    #[arg(long, global = true, env = "FINLIT_CURRICULUM")]
    pub curriculum: Option<PathBuf>,

    /// Language preference as stored in settings ("English", "Dutch", "nl", ...).
    #[arg(long, global = true, env = "FINLIT_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Knowledge level used to pick term descriptions.
    #[arg(long, global = true, env = "FINLIT_LEVEL", default_value = DEFAULT_LEVEL)]
    pub level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split text into plain and glossary-linked segments.
    Link { text: String },
    /// Collect glossary term ids referenced by a lesson content JSON file.
    Terms { content: PathBuf },
    /// Show a term with the description for the configured level.
    Define { term_id: String },
    /// Resolve a language preference to a locale code.
    Locale { preference: String },
    /// Resolve a module, lesson, or steps entity for the configured language.
    Entity { category: String, id: String },
    /// Resolve a UI copy bundle for the configured language.
    Copy { category: String },
    /// Report how much of the default content a locale translates.
    Coverage { locale: String },
    /// Show the lessons around a lesson in curriculum order.
    NextLesson { lesson_id: String },
    /// Project compound growth for the visualization steps.
    Project {
        #[arg(long, default_value_t = 0.0)]
        principal: f64,
        #[arg(long, default_value_t = 0.0)]
        monthly: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        years: u32,
    },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub glossary_path: PathBuf,
    pub locales_dir: PathBuf,
    pub curriculum_path: Option<PathBuf>,
    pub language: String,
    pub level: KnowledgeLevel,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            glossary_path: self.glossary.clone(),
            locales_dir: self.locales.clone(),
            curriculum_path: self.curriculum.clone(),
            language: self.language.clone(),
            level: KnowledgeLevel::from_preference(&self.level),
        }
    }
}
