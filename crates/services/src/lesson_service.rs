use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use quiz_core::content::ContentStore;
use quiz_core::model::{LessonId, LessonProgress};

use crate::error::LessonServiceError;

/// Completion counts for one learning module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleProgress {
    pub module_id: u32,
    pub completed: usize,
    pub total: usize,
}

/// Tracks which curriculum lessons the learner has finished this session.
pub struct LessonService {
    content: Arc<ContentStore>,
    progress: Mutex<LessonProgress>,
}

impl LessonService {
    #[must_use]
    pub fn new(content: Arc<ContentStore>) -> Self {
        Self {
            content,
            progress: Mutex::new(LessonProgress::new()),
        }
    }

    /// Mark a lesson complete. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError` if the lesson is not in the curriculum.
    pub fn complete_lesson(&self, id: LessonId) -> Result<bool, LessonServiceError> {
        let mut progress = self.lock()?;
        let newly = progress.mark_complete(self.content.curriculum(), id)?;
        if newly {
            debug!("lesson {id} completed");
        }
        Ok(newly)
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::ProgressPoisoned` if the progress lock is poisoned.
    pub fn progress(&self) -> Result<LessonProgress, LessonServiceError> {
        Ok(self.lock()?.clone())
    }

    /// Share of the curriculum completed, in percent.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::ProgressPoisoned` if the progress lock is poisoned.
    pub fn total_percent(&self) -> Result<f64, LessonServiceError> {
        Ok(self.lock()?.total_percent(self.content.curriculum()))
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::UnknownModule` if no module has this id.
    pub fn module_progress(&self, module_id: u32) -> Result<ModuleProgress, LessonServiceError> {
        let module = self
            .content
            .curriculum()
            .modules()
            .iter()
            .find(|module| module.id == module_id)
            .ok_or(LessonServiceError::UnknownModule(module_id))?;
        let (completed, total) = self.lock()?.module_progress(module);
        Ok(ModuleProgress {
            module_id,
            completed,
            total,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, LessonProgress>, LessonServiceError> {
        self.progress
            .lock()
            .map_err(|_| LessonServiceError::ProgressPoisoned)
    }
}
