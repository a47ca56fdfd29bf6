//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::content::ContentError;
use quiz_core::game::GameError;
use quiz_core::model::LessonError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `GameService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameServiceError {
    #[error("game session lock poisoned")]
    SessionPoisoned,
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error("lesson progress lock poisoned")]
    ProgressPoisoned,
    #[error("unknown learning module {0}")]
    UnknownModule(u32),
    #[error(transparent)]
    Lesson(#[from] LessonError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
