use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Points needed to advance one level.
pub const POINTS_PER_LEVEL: u32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error("points awarded must be greater than 0, got {0}")]
    InvalidPoints(u32),
}

/// Player progression for a session.
///
/// `cumulative_points` and `best_streak` survive round resets; everything
/// else belongs to the current round. Only answering questions mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    cumulative_points: u32,
    current_streak: u32,
    best_streak: u32,
    answered_question_ids: BTreeSet<QuestionId>,
    correct_count: u32,
}

impl ProgressionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cumulative_points(&self) -> u32 {
        self.cumulative_points
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub fn answered_question_ids(&self) -> &BTreeSet<QuestionId> {
        &self.answered_question_ids
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn is_answered(&self, id: QuestionId) -> bool {
        self.answered_question_ids.contains(&id)
    }

    /// `floor(points / 100) + 1`.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.cumulative_points / POINTS_PER_LEVEL + 1
    }

    /// Award points for a correct answer and extend the streak.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::InvalidPoints` when `points` is zero; the
    /// state is left untouched.
    pub fn record_correct_answer(&mut self, points: u32) -> Result<(), ProgressionError> {
        if points == 0 {
            return Err(ProgressionError::InvalidPoints(points));
        }
        self.cumulative_points = self.cumulative_points.saturating_add(points);
        self.current_streak = self.current_streak.saturating_add(1);
        self.best_streak = self.best_streak.max(self.current_streak);
        self.correct_count = self.correct_count.saturating_add(1);
        Ok(())
    }

    pub fn record_incorrect_answer(&mut self) {
        self.current_streak = 0;
    }

    /// Exhaust a question for the rest of the round.
    pub fn mark_answered(&mut self, id: QuestionId) {
        self.answered_question_ids.insert(id);
    }

    /// Clear round state, keeping points and best streak.
    pub fn reset_round(&mut self) {
        self.current_streak = 0;
        self.answered_question_ids.clear();
        self.correct_count = 0;
    }
}
