//! Read-only views handed to the presentation layer.

use serde::Serialize;

use crate::bank::{CategoryRegistry, QuestionBank};
use crate::model::{CategoryId, ProgressionState, Question};

use super::state::{DailyPhase, GameMode, GameState, SpinPhase, StreakPhase, UiState};

/// What is on screen for the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeSession {
    pub mode: GameMode,
    pub ui_state: UiState,
    pub current_question: Option<Question>,
    pub selected_answer_index: Option<usize>,
    pub answer_revealed: bool,
}

impl ModeSession {
    #[must_use]
    pub fn from_state(state: &GameState, bank: &QuestionBank) -> Self {
        let slot = state.slot();
        Self {
            mode: state.mode(),
            ui_state: state.ui_state(),
            current_question: slot.and_then(|s| bank.get(s.question_id())).cloned(),
            selected_answer_index: slot.and_then(|s| s.selected()),
            answer_revealed: slot.is_some_and(|s| s.is_revealed()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: CategoryId,
    pub display_name: String,
    pub unlock_threshold: u32,
    pub unlocked: bool,
}

/// Everything needed to render the game after a transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub session: ModeSession,
    pub progression: ProgressionState,
    pub level: u32,
    /// All categories in display order; locked ones stay listed.
    pub categories: Vec<CategoryView>,
    pub wheel_rotation: Option<f64>,
    pub spinning: bool,
    /// Category being played (spin question) or just finished (spin result).
    pub spin_category: Option<CategoryId>,
    /// `Some(true)` when today's daily challenge can no longer be started.
    pub daily_completed: Option<bool>,
    /// Length of the finished run on the streak result screen.
    pub streak_run: Option<u32>,
}

impl GameSnapshot {
    #[must_use]
    pub fn build(
        state: &GameState,
        progression: &ProgressionState,
        bank: &QuestionBank,
        categories: &CategoryRegistry,
    ) -> Self {
        let points = progression.cumulative_points();
        let spin_category = match state {
            GameState::Spin(
                SpinPhase::Question { category, .. } | SpinPhase::Result { category, .. },
            ) => Some(category.clone()),
            _ => None,
        };
        let daily_completed = match state {
            GameState::Daily(DailyPhase::Menu { completed, .. }) => Some(*completed),
            GameState::Daily(DailyPhase::Question { slot, .. }) => Some(slot.is_revealed()),
            _ => None,
        };
        let streak_run = match state {
            GameState::Streak(StreakPhase::Result { run }) => Some(*run),
            _ => None,
        };

        Self {
            session: ModeSession::from_state(state, bank),
            progression: progression.clone(),
            level: progression.level(),
            categories: categories
                .all()
                .iter()
                .map(|c| CategoryView {
                    id: c.id().clone(),
                    display_name: c.display_name().to_owned(),
                    unlock_threshold: c.unlock_threshold(),
                    unlocked: c.is_unlocked_at(points),
                })
                .collect(),
            wheel_rotation: state.wheel_rotation(),
            spinning: state.is_spinning(),
            spin_category,
            daily_completed,
            streak_run,
        }
    }
}
