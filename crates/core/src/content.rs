//! Static content store: question bank, categories and curriculum.
//!
//! Content is loaded once from JSON and validated up front so the game never
//! sees a malformed question.

use serde::Deserialize;
use thiserror::Error;

use crate::bank::{BankError, CategoryRegistry, QuestionBank};
use crate::model::{
    CategoryDraft, CategoryError, CategoryId, Curriculum, LearningModule, LessonError,
    QuestionDraft, QuestionError, QuestionId,
};

const BUILTIN_CONTENT: &str = include_str!("../data/content.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("invalid content document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error("question {question} references unknown category {category}")]
    UnknownCategory {
        question: QuestionId,
        category: CategoryId,
    },
}

#[derive(Debug, Deserialize)]
struct ContentDocument {
    #[serde(default)]
    categories: Vec<CategoryDraft>,
    #[serde(default)]
    questions: Vec<QuestionDraft>,
    #[serde(default)]
    modules: Vec<LearningModule>,
}

/// Immutable content loaded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStore {
    bank: QuestionBank,
    categories: CategoryRegistry,
    curriculum: Curriculum,
}

impl ContentStore {
    #[must_use]
    pub fn new(bank: QuestionBank, categories: CategoryRegistry, curriculum: Curriculum) -> Self {
        Self {
            bank,
            categories,
            curriculum,
        }
    }

    /// The content shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` if the embedded document is invalid.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_CONTENT)
    }

    /// Parse and validate a content document.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` for malformed JSON, invalid questions or
    /// categories, duplicate ids, or questions pointing at unknown categories.
    pub fn from_json(raw: &str) -> Result<Self, ContentError> {
        let document: ContentDocument = serde_json::from_str(raw)?;

        let categories = document
            .categories
            .into_iter()
            .map(CategoryDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        let categories = CategoryRegistry::new(categories)?;

        let mut questions = Vec::with_capacity(document.questions.len());
        for draft in document.questions {
            let question = draft.validate()?;
            if categories.get(question.category()).is_none() {
                return Err(ContentError::UnknownCategory {
                    question: question.id(),
                    category: question.category().clone(),
                });
            }
            questions.push(question);
        }

        Ok(Self {
            bank: QuestionBank::new(questions)?,
            categories,
            curriculum: Curriculum::new(document.modules)?,
        })
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }
}
