use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RulesError {
    #[error("spin settle delay must be > 0")]
    InvalidSpinSettle,

    #[error("minimum spin turns must be >= 1")]
    InvalidMinTurns,

    #[error("minimum spin turns must be <= maximum spin turns")]
    InvalidTurnBounds,
}

/// What happens to a spin-mode question answered incorrectly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WrongAnswerPolicy {
    /// The question stays in the category pool and may come up again.
    #[default]
    Retry,
    /// The question is exhausted for the round, like a correct answer.
    Exhaust,
}

impl WrongAnswerPolicy {
    /// Parse `retry` or `exhaust` (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "retry" => Some(Self::Retry),
            "exhaust" => Some(Self::Exhaust),
            _ => None,
        }
    }
}

/// Tunables for the game engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRules {
    spin_settle: Duration,
    min_turns: u32,
    max_turns: u32,
    wrong_answer: WrongAnswerPolicy,
}

impl GameRules {
    /// Creates validated rules.
    ///
    /// # Errors
    ///
    /// Returns `RulesError` if the settle delay is zero or the turn bounds are invalid.
    pub fn new(
        spin_settle: Duration,
        min_turns: u32,
        max_turns: u32,
        wrong_answer: WrongAnswerPolicy,
    ) -> Result<Self, RulesError> {
        if spin_settle.is_zero() {
            return Err(RulesError::InvalidSpinSettle);
        }
        if min_turns == 0 {
            return Err(RulesError::InvalidMinTurns);
        }
        if min_turns > max_turns {
            return Err(RulesError::InvalidTurnBounds);
        }
        Ok(Self {
            spin_settle,
            min_turns,
            max_turns,
            wrong_answer,
        })
    }

    #[must_use]
    pub fn with_wrong_answer(mut self, policy: WrongAnswerPolicy) -> Self {
        self.wrong_answer = policy;
        self
    }

    /// Replace the settle delay, ignoring zero.
    #[must_use]
    pub fn with_spin_settle(mut self, spin_settle: Duration) -> Self {
        if !spin_settle.is_zero() {
            self.spin_settle = spin_settle;
        }
        self
    }

    /// Time between a spin starting and its category becoming selectable.
    #[must_use]
    pub fn spin_settle(&self) -> Duration {
        self.spin_settle
    }

    #[must_use]
    pub fn min_turns(&self) -> u32 {
        self.min_turns
    }

    #[must_use]
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    #[must_use]
    pub fn wrong_answer(&self) -> WrongAnswerPolicy {
        self.wrong_answer
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            spin_settle: Duration::from_millis(3_000),
            min_turns: 5,
            max_turns: 10,
            wrong_answer: WrongAnswerPolicy::Retry,
        }
    }
}
