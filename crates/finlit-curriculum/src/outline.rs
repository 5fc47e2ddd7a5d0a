use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Ordered modules, each with ordered lesson ids.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CurriculumOutline {
    pub modules: Vec<ModuleOutline>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ModuleOutline {
    pub id: String,
    #[serde(default)]
    pub lessons: Vec<String>,
}

/// `(module, lesson)` indices into a [`CurriculumOutline`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct LessonPosition {
    pub module: usize,
    pub lesson: usize,
}

impl CurriculumOutline {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read curriculum outline {}", path.display()))?;
        let outline: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parse curriculum outline {}", path.display()))?;
        info!(
            "loaded curriculum with {} modules and {} lessons",
            outline.modules.len(),
            outline.lesson_count()
        );
        Ok(outline)
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    pub fn first_lesson(&self) -> Option<&str> {
        self.lessons().next().map(|(_, id)| id)
    }

    pub fn position(&self, lesson_id: &str) -> Option<LessonPosition> {
        self.lessons()
            .find(|(_, id)| *id == lesson_id)
            .map(|(pos, _)| pos)
    }

    pub fn lesson_at(&self, pos: LessonPosition) -> Option<&str> {
        self.modules
            .get(pos.module)
            .and_then(|m| m.lessons.get(pos.lesson))
            .map(String::as_str)
    }

    pub fn module_of(&self, lesson_id: &str) -> Option<&str> {
        self.position(lesson_id)
            .map(|pos| self.modules[pos.module].id.as_str())
    }

    /// Lesson after `lesson_id`, continuing into the next non-empty module.
    pub fn next_lesson(&self, lesson_id: &str) -> Option<&str> {
        let mut lessons = self.lessons().map(|(_, id)| id);
        lessons.find(|id| *id == lesson_id)?;
        lessons.next()
    }

    pub fn previous_lesson(&self, lesson_id: &str) -> Option<&str> {
        let mut previous = None;
        for (_, id) in self.lessons() {
            if id == lesson_id {
                return previous;
            }
            previous = Some(id);
        }
        None
    }

    fn lessons(&self) -> impl Iterator<Item = (LessonPosition, &str)> {
        self.modules.iter().enumerate().flat_map(|(module, m)| {
            m.lessons.iter().enumerate().map(move |(lesson, id)| {
                (LessonPosition { module, lesson }, id.as_str())
            })
        })
    }
}
