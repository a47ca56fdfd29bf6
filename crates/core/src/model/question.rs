use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CategoryId, QuestionId};

/// Every question is multiple choice with exactly this many options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has empty text")]
    EmptyText { id: QuestionId },

    #[error("question {id} must have exactly {OPTION_COUNT} options, got {len}")]
    WrongOptionCount { id: QuestionId, len: usize },

    #[error("question {id} has an empty option at index {index}")]
    EmptyOption { id: QuestionId, index: usize },

    #[error("question {id} correct index {index} is out of range")]
    CorrectIndexOutOfRange { id: QuestionId, index: usize },

    #[error("question {id} must be worth more than 0 points")]
    ZeroPoints { id: QuestionId },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in content files.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub category: CategoryId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub points: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub fun_fact: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is blank, the option
    /// count is not four, the correct index is out of range, or points are zero.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id;
        let text = self.text.trim().to_owned();
        if text.is_empty() {
            return Err(QuestionError::EmptyText { id });
        }

        if self.options.len() != OPTION_COUNT {
            return Err(QuestionError::WrongOptionCount {
                id,
                len: self.options.len(),
            });
        }

        let mut options = [const { String::new() }; OPTION_COUNT];
        for (index, option) in self.options.into_iter().enumerate() {
            let option = option.trim().to_owned();
            if option.is_empty() {
                return Err(QuestionError::EmptyOption { id, index });
            }
            options[index] = option;
        }

        if self.correct_index >= OPTION_COUNT {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id,
                index: self.correct_index,
            });
        }
        if self.points == 0 {
            return Err(QuestionError::ZeroPoints { id });
        }

        Ok(Question {
            id,
            category: self.category,
            text,
            options,
            correct_index: self.correct_index,
            points: self.points,
            difficulty: self.difficulty,
            hint: normalize_optional(self.hint),
            fun_fact: normalize_optional(self.fun_fact),
        })
    }
}

/// A multiple-choice quiz question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    category: CategoryId,
    text: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    points: u32,
    difficulty: Difficulty,
    hint: Option<String>,
    fun_fact: Option<String>,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &CategoryId {
        &self.category
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn fun_fact(&self) -> Option<&str> {
        self.fun_fact.as_deref()
    }

    /// True when `index` selects the correct option.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
