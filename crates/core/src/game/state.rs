use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{CategoryId, QuestionId};
use crate::wheel::Wheel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Hub,
    Spin,
    Daily,
    Streak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UiState {
    Menu,
    Question,
    Result,
}

/// The question on screen and the answer picked for it, if any.
///
/// An answer is revealed exactly when one has been selected, so the two can
/// never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSlot {
    question_id: QuestionId,
    selected: Option<usize>,
}

impl QuestionSlot {
    #[must_use]
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            selected: None,
        }
    }

    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.selected.is_some()
    }

    pub(crate) fn reveal(&mut self, index: usize) {
        self.selected = Some(index);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinPhase {
    /// Choosing a category. `spinning` holds the wheel while a spin settles.
    Menu {
        rotation: f64,
        spinning: Option<Wheel>,
    },
    Question {
        rotation: f64,
        category: CategoryId,
        slot: QuestionSlot,
    },
    /// Every question in `category` has been answered this round.
    Result { rotation: f64, category: CategoryId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyPhase {
    Menu { date: NaiveDate, completed: bool },
    Question { date: NaiveDate, slot: QuestionSlot },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakPhase {
    Menu,
    Question { slot: QuestionSlot },
    /// The run ended; `run` is the number of correct answers in it.
    Result { run: u32 },
}

/// Where the player is. One variant per valid (mode, screen) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GameState {
    #[default]
    Hub,
    Spin(SpinPhase),
    Daily(DailyPhase),
    Streak(StreakPhase),
}

impl GameState {
    #[must_use]
    pub fn mode(&self) -> GameMode {
        match self {
            GameState::Hub => GameMode::Hub,
            GameState::Spin(_) => GameMode::Spin,
            GameState::Daily(_) => GameMode::Daily,
            GameState::Streak(_) => GameMode::Streak,
        }
    }

    #[must_use]
    pub fn ui_state(&self) -> UiState {
        match self {
            GameState::Hub
            | GameState::Spin(SpinPhase::Menu { .. })
            | GameState::Daily(DailyPhase::Menu { .. })
            | GameState::Streak(StreakPhase::Menu) => UiState::Menu,
            GameState::Spin(SpinPhase::Question { .. })
            | GameState::Daily(DailyPhase::Question { .. })
            | GameState::Streak(StreakPhase::Question { .. }) => UiState::Question,
            GameState::Spin(SpinPhase::Result { .. }) | GameState::Streak(StreakPhase::Result { .. }) => {
                UiState::Result
            }
        }
    }

    #[must_use]
    pub fn slot(&self) -> Option<&QuestionSlot> {
        match self {
            GameState::Spin(SpinPhase::Question { slot, .. })
            | GameState::Daily(DailyPhase::Question { slot, .. })
            | GameState::Streak(StreakPhase::Question { slot }) => Some(slot),
            _ => None,
        }
    }

    /// True while a spin is settling.
    #[must_use]
    pub fn is_spinning(&self) -> bool {
        matches!(
            self,
            GameState::Spin(SpinPhase::Menu {
                spinning: Some(_),
                ..
            })
        )
    }

    /// Accumulated wheel rotation in spin mode.
    #[must_use]
    pub fn wheel_rotation(&self) -> Option<f64> {
        match self {
            GameState::Spin(
                SpinPhase::Menu { rotation, .. }
                | SpinPhase::Question { rotation, .. }
                | SpinPhase::Result { rotation, .. },
            ) => Some(*rotation),
            _ => None,
        }
    }

    /// Short `mode/screen` label used in errors and logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GameState::Hub => "hub",
            GameState::Spin(SpinPhase::Menu { .. }) => "spin/menu",
            GameState::Spin(SpinPhase::Question { .. }) => "spin/question",
            GameState::Spin(SpinPhase::Result { .. }) => "spin/result",
            GameState::Daily(DailyPhase::Menu { .. }) => "daily/menu",
            GameState::Daily(DailyPhase::Question { .. }) => "daily/question",
            GameState::Streak(StreakPhase::Menu) => "streak/menu",
            GameState::Streak(StreakPhase::Question { .. }) => "streak/question",
            GameState::Streak(StreakPhase::Result { .. }) => "streak/result",
        }
    }
}
