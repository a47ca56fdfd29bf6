mod category;
mod ids;
mod lesson;
mod progression;
mod question;

pub use ids::{CategoryId, LessonId, ParseIdError, QuestionId};

pub use category::{Category, CategoryDraft, CategoryError};
pub use lesson::{Curriculum, LearningModule, Lesson, LessonError, LessonKind, LessonProgress};
pub use progression::{POINTS_PER_LEVEL, ProgressionError, ProgressionState};
pub use question::{Difficulty, OPTION_COUNT, Question, QuestionDraft, QuestionError};
