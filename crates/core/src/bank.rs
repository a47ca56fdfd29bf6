//! Read-only content collections: the question bank and the category registry.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Category, CategoryId, Question, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("duplicate question id {0}")]
    DuplicateQuestion(QuestionId),

    #[error("duplicate category id {0}")]
    DuplicateCategory(CategoryId),
}

//
// ─── QUESTION BANK ─────────────────────────────────────────────────────────────
//

/// Fixed, ordered collection of questions. Never mutates after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// # Errors
    ///
    /// Returns `BankError::DuplicateQuestion` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(BankError::DuplicateQuestion(question.id()));
            }
        }
        Ok(Self { questions })
    }

    #[must_use]
    pub fn all(&self) -> &[Question] {
        &self.questions
    }

    /// Questions in `category`, bank order preserved. Unknown categories yield nothing.
    pub fn in_category<'a, 'c>(
        &'a self,
        category: &'c CategoryId,
    ) -> impl Iterator<Item = &'a Question> + use<'a, 'c> {
        self.questions
            .iter()
            .filter(move |question| question.category() == category)
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

//
// ─── CATEGORY REGISTRY ─────────────────────────────────────────────────────────
//

/// Categories in fixed display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    /// # Errors
    ///
    /// Returns `BankError::DuplicateCategory` if two categories share an id.
    pub fn new(categories: Vec<Category>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(categories.len());
        for category in &categories {
            if !seen.insert(category.id().clone()) {
                return Err(BankError::DuplicateCategory(category.id().clone()));
            }
        }
        Ok(Self { categories })
    }

    #[must_use]
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == id)
    }

    /// Unknown categories are never unlocked.
    #[must_use]
    pub fn is_unlocked(&self, id: &CategoryId, cumulative_points: u32) -> bool {
        self.get(id)
            .is_some_and(|category| category.is_unlocked_at(cumulative_points))
    }

    /// Spin-eligible categories, in display order.
    #[must_use]
    pub fn unlocked(&self, cumulative_points: u32) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|category| category.is_unlocked_at(cumulative_points))
            .collect()
    }
}
