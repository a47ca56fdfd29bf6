use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson {0} appears more than once in the curriculum")]
    DuplicateLesson(LessonId),

    #[error("lesson {0} is not part of the curriculum")]
    UnknownLesson(LessonId),

    #[error("module title cannot be empty")]
    EmptyModuleTitle,

    #[error("lesson {0} has an empty title")]
    EmptyLessonTitle(LessonId),
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Video,
    Article,
    Interactive,
    Course,
    Workshop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub duration_minutes: u32,
    pub kind: LessonKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub lessons: Vec<Lesson>,
}

/// Ordered career modules, each a short list of lessons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Curriculum {
    modules: Vec<LearningModule>,
}

impl Curriculum {
    /// Build a curriculum, checking that lesson ids are unique across modules.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` for blank titles or duplicated lesson ids.
    pub fn new(modules: Vec<LearningModule>) -> Result<Self, LessonError> {
        let mut seen = HashSet::new();
        for module in &modules {
            if module.title.trim().is_empty() {
                return Err(LessonError::EmptyModuleTitle);
            }
            for lesson in &module.lessons {
                if lesson.title.trim().is_empty() {
                    return Err(LessonError::EmptyLessonTitle(lesson.id));
                }
                if !seen.insert(lesson.id) {
                    return Err(LessonError::DuplicateLesson(lesson.id));
                }
            }
        }
        Ok(Self { modules })
    }

    #[must_use]
    pub fn modules(&self) -> &[LearningModule] {
        &self.modules
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    #[must_use]
    pub fn contains(&self, id: LessonId) -> bool {
        self.lessons().any(|lesson| lesson.id == id)
    }

    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Lessons the learner has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LessonProgress {
    completed: BTreeSet<LessonId>,
}

impl LessonProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a lesson complete. Completing it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::UnknownLesson` if the lesson is not in `curriculum`.
    pub fn mark_complete(
        &mut self,
        curriculum: &Curriculum,
        id: LessonId,
    ) -> Result<bool, LessonError> {
        if !curriculum.contains(id) {
            return Err(LessonError::UnknownLesson(id));
        }
        Ok(self.completed.insert(id))
    }

    #[must_use]
    pub fn is_complete(&self, id: LessonId) -> bool {
        self.completed.contains(&id)
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<LessonId> {
        &self.completed
    }

    /// Share of the whole curriculum completed, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_percent(&self, curriculum: &Curriculum) -> f64 {
        let total = curriculum.total_lessons();
        if total == 0 {
            return 0.0;
        }
        let done = curriculum
            .lessons()
            .filter(|lesson| self.completed.contains(&lesson.id))
            .count();
        done as f64 / total as f64 * 100.0
    }

    /// `(completed, total)` for one module.
    #[must_use]
    pub fn module_progress(&self, module: &LearningModule) -> (usize, usize) {
        let done = module
            .lessons
            .iter()
            .filter(|lesson| self.completed.contains(&lesson.id))
            .count();
        (done, module.lessons.len())
    }
}
