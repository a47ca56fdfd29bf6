use chrono::NaiveDate;
use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use crate::bank::{CategoryRegistry, QuestionBank};
use crate::daily::{DailyKey, daily_question};
use crate::model::{
    CategoryId, OPTION_COUNT, ProgressionError, ProgressionState, Question, QuestionId,
};
use crate::rules::{GameRules, WrongAnswerPolicy};
use crate::wheel::{SpinRoll, Wheel};

use super::state::{DailyPhase, GameState, QuestionSlot, SpinPhase, StreakPhase};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected events. A rejected event never changes state or progression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("cannot {event} while in {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("a spin is already in progress")]
    SpinInProgress,

    #[error("no spin is waiting to settle")]
    NoSpinPending,

    #[error("no unlocked categories to spin for")]
    NoEligibleCategories,

    #[error("today's daily challenge has already been attempted")]
    DailyAlreadyCompleted,

    #[error("answer the current question before continuing")]
    AnswerPending,

    #[error("answer index {index} is out of range (0..{len})")]
    InvalidAnswerIndex { index: usize, len: usize },

    #[error("question {0} is not in the bank")]
    UnknownQuestion(QuestionId),

    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

//
// ─── EVENTS & STEPS ────────────────────────────────────────────────────────────
//

/// Player intents and timer callbacks fed to [`Game::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    EnterSpin,
    EnterStreak,
    /// `completed_today` comes from the daily completion gate.
    EnterDaily {
        date: NaiveDate,
        completed_today: bool,
    },
    /// Leave a streak or daily menu for the first question.
    Start,
    Spin,
    /// Fired once the spin settle delay has elapsed.
    SettleSpin,
    Answer(usize),
    Continue,
    PlayAgain,
    ReturnToHub,
}

impl GameEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::EnterSpin => "enter spin mode",
            GameEvent::EnterStreak => "enter streak mode",
            GameEvent::EnterDaily { .. } => "enter daily mode",
            GameEvent::Start => "start",
            GameEvent::Spin => "spin",
            GameEvent::SettleSpin => "settle spin",
            GameEvent::Answer(_) => "answer",
            GameEvent::Continue => "continue",
            GameEvent::PlayAgain => "play again",
            GameEvent::ReturnToHub => "return to hub",
        }
    }
}

/// Side effects the caller must carry out after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist that the daily challenge for this day was attempted.
    DailyCompleted(DailyKey),
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: GameState,
    pub progression: ProgressionState,
    pub effects: Vec<Effect>,
}

impl Step {
    fn new(state: GameState, progression: ProgressionState) -> Self {
        Self {
            state,
            progression,
            effects: Vec::new(),
        }
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Pure transition function over `(GameState, ProgressionState)`.
///
/// Content and rules are borrowed; state goes in by reference and comes back
/// in a [`Step`], so callers decide when to commit it.
#[derive(Debug, Clone, Copy)]
pub struct Game<'a> {
    bank: &'a QuestionBank,
    categories: &'a CategoryRegistry,
    rules: &'a GameRules,
}

impl<'a> Game<'a> {
    #[must_use]
    pub fn new(
        bank: &'a QuestionBank,
        categories: &'a CategoryRegistry,
        rules: &'a GameRules,
    ) -> Self {
        Self {
            bank,
            categories,
            rules,
        }
    }

    #[must_use]
    pub fn bank(&self) -> &'a QuestionBank {
        self.bank
    }

    #[must_use]
    pub fn categories(&self) -> &'a CategoryRegistry {
        self.categories
    }

    #[must_use]
    pub fn rules(&self) -> &'a GameRules {
        self.rules
    }

    /// Apply `event` to the current state.
    ///
    /// # Errors
    ///
    /// Returns `GameError` when the event is not valid in `state` or violates a
    /// precondition (answer index out of range, spin already running, daily
    /// already attempted). Nothing is mutated in that case.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        progression: &ProgressionState,
        event: GameEvent,
        rng: &mut R,
    ) -> Result<Step, GameError> {
        let mut progression = progression.clone();

        match (state, event) {
            (GameState::Spin(SpinPhase::Menu { spinning: Some(_), .. }), GameEvent::ReturnToHub) => {
                Err(GameError::SpinInProgress)
            }
            (_, GameEvent::ReturnToHub) => {
                progression.reset_round();
                Ok(Step::new(GameState::Hub, progression))
            }

            (GameState::Hub, GameEvent::EnterSpin) => {
                progression.reset_round();
                let state = GameState::Spin(SpinPhase::Menu {
                    rotation: 0.0,
                    spinning: None,
                });
                Ok(Step::new(state, progression))
            }
            (GameState::Hub, GameEvent::EnterStreak) => {
                progression.reset_round();
                Ok(Step::new(GameState::Streak(StreakPhase::Menu), progression))
            }
            (
                GameState::Hub,
                GameEvent::EnterDaily {
                    date,
                    completed_today,
                },
            ) => {
                let state = GameState::Daily(DailyPhase::Menu {
                    date,
                    completed: completed_today,
                });
                Ok(Step::new(state, progression))
            }

            (GameState::Spin(phase), _) => self.apply_spin(phase, progression, event, rng),
            (GameState::Daily(phase), _) => self.apply_daily(*phase, progression, event),
            (GameState::Streak(phase), _) => self.apply_streak(*phase, progression, event, rng),

            (GameState::Hub, _) => Err(invalid(state, event)),
        }
    }

    fn apply_spin<R: Rng + ?Sized>(
        &self,
        phase: &SpinPhase,
        mut progression: ProgressionState,
        event: GameEvent,
        rng: &mut R,
    ) -> Result<Step, GameError> {
        let current = GameState::Spin(phase.clone());
        match (phase, event) {
            (SpinPhase::Menu { spinning: Some(_), .. }, GameEvent::Spin) => {
                Err(GameError::SpinInProgress)
            }
            (
                SpinPhase::Menu {
                    rotation,
                    spinning: None,
                },
                GameEvent::Spin,
            ) => {
                let wheel = Wheel::new(self.categories.unlocked(progression.cumulative_points()));
                if wheel.is_empty() {
                    return Err(GameError::NoEligibleCategories);
                }
                let roll = SpinRoll::random(rng, self.rules);
                let state = GameState::Spin(SpinPhase::Menu {
                    rotation: rotation + roll.degrees(),
                    spinning: Some(wheel),
                });
                Ok(Step::new(state, progression))
            }
            (SpinPhase::Menu { spinning: None, .. }, GameEvent::SettleSpin) => {
                Err(GameError::NoSpinPending)
            }
            (
                SpinPhase::Menu {
                    rotation,
                    spinning: Some(wheel),
                },
                GameEvent::SettleSpin,
            ) => {
                let category = wheel
                    .resolve(*rotation)
                    .cloned()
                    .ok_or(GameError::NoEligibleCategories)?;
                let state = self.next_spin_state(*rotation, category, &progression, rng);
                Ok(Step::new(state, progression))
            }

            (
                SpinPhase::Question {
                    rotation,
                    category,
                    slot,
                },
                GameEvent::Answer(index),
            ) => {
                let mut slot = *slot;
                let Some(correct) = self.answer(&mut slot, &mut progression, index)? else {
                    return Ok(Step::new(current, progression));
                };
                if correct || self.rules.wrong_answer() == WrongAnswerPolicy::Exhaust {
                    progression.mark_answered(slot.question_id());
                }
                let state = GameState::Spin(SpinPhase::Question {
                    rotation: *rotation,
                    category: category.clone(),
                    slot,
                });
                Ok(Step::new(state, progression))
            }
            (
                SpinPhase::Question {
                    rotation,
                    category,
                    slot,
                },
                GameEvent::Continue,
            ) => {
                let state = if self.was_correct(slot)? {
                    self.next_spin_state(*rotation, category.clone(), &progression, rng)
                } else {
                    GameState::Spin(SpinPhase::Menu {
                        rotation: *rotation,
                        spinning: None,
                    })
                };
                Ok(Step::new(state, progression))
            }

            (SpinPhase::Result { rotation, .. }, GameEvent::PlayAgain) => {
                progression.reset_round();
                let state = GameState::Spin(SpinPhase::Menu {
                    rotation: *rotation,
                    spinning: None,
                });
                Ok(Step::new(state, progression))
            }

            _ => Err(invalid(&current, event)),
        }
    }

    fn apply_daily(
        &self,
        phase: DailyPhase,
        mut progression: ProgressionState,
        event: GameEvent,
    ) -> Result<Step, GameError> {
        match (phase, event) {
            (DailyPhase::Menu { completed: true, .. }, GameEvent::Start) => {
                Err(GameError::DailyAlreadyCompleted)
            }
            (DailyPhase::Menu { date, .. }, GameEvent::Start) => {
                let state = match daily_question(self.bank, date) {
                    Some(question) => GameState::Daily(DailyPhase::Question {
                        date,
                        slot: QuestionSlot::new(question.id()),
                    }),
                    None => GameState::Hub,
                };
                Ok(Step::new(state, progression))
            }
            (DailyPhase::Question { date, slot }, GameEvent::Answer(index)) => {
                let mut slot = slot;
                if self.answer(&mut slot, &mut progression, index)?.is_none() {
                    return Ok(Step::new(GameState::Daily(phase), progression));
                }
                // Right or wrong, the attempt uses up the day.
                let mut step = Step::new(
                    GameState::Daily(DailyPhase::Question { date, slot }),
                    progression,
                );
                step.effects
                    .push(Effect::DailyCompleted(DailyKey::for_date(date)));
                Ok(step)
            }
            (DailyPhase::Question { slot, .. }, GameEvent::Continue) => {
                if !slot.is_revealed() {
                    return Err(GameError::AnswerPending);
                }
                progression.reset_round();
                Ok(Step::new(GameState::Hub, progression))
            }
            _ => Err(invalid(&GameState::Daily(phase), event)),
        }
    }

    fn apply_streak<R: Rng + ?Sized>(
        &self,
        phase: StreakPhase,
        mut progression: ProgressionState,
        event: GameEvent,
        rng: &mut R,
    ) -> Result<Step, GameError> {
        match (phase, event) {
            (StreakPhase::Menu, GameEvent::Start) => {
                let state = self.next_streak_state(None, &progression, rng);
                Ok(Step::new(state, progression))
            }
            (StreakPhase::Question { slot }, GameEvent::Answer(index)) => {
                let mut slot = slot;
                self.answer(&mut slot, &mut progression, index)?;
                Ok(Step::new(
                    GameState::Streak(StreakPhase::Question { slot }),
                    progression,
                ))
            }
            (StreakPhase::Question { slot }, GameEvent::Continue) => {
                let state = if self.was_correct(&slot)? {
                    self.next_streak_state(Some(slot.question_id()), &progression, rng)
                } else {
                    GameState::Streak(StreakPhase::Result {
                        run: progression.correct_count(),
                    })
                };
                Ok(Step::new(state, progression))
            }
            (StreakPhase::Result { .. }, GameEvent::PlayAgain) => {
                progression.reset_round();
                Ok(Step::new(GameState::Streak(StreakPhase::Menu), progression))
            }
            _ => Err(invalid(&GameState::Streak(phase), event)),
        }
    }

    /// Score `index` against the slot's question.
    ///
    /// Returns `Ok(None)` when the slot was already answered (first answer is
    /// final), otherwise whether the answer was correct.
    fn answer(
        &self,
        slot: &mut QuestionSlot,
        progression: &mut ProgressionState,
        index: usize,
    ) -> Result<Option<bool>, GameError> {
        if slot.is_revealed() {
            return Ok(None);
        }
        let question = self.question(slot.question_id())?;
        if index >= OPTION_COUNT {
            return Err(GameError::InvalidAnswerIndex {
                index,
                len: OPTION_COUNT,
            });
        }

        let correct = question.is_correct(index);
        if correct {
            progression.record_correct_answer(question.points())?;
        } else {
            progression.record_incorrect_answer();
        }
        slot.reveal(index);
        Ok(Some(correct))
    }

    fn was_correct(&self, slot: &QuestionSlot) -> Result<bool, GameError> {
        let selected = slot.selected().ok_or(GameError::AnswerPending)?;
        Ok(self.question(slot.question_id())?.is_correct(selected))
    }

    fn question(&self, id: QuestionId) -> Result<&'a Question, GameError> {
        self.bank.get(id).ok_or(GameError::UnknownQuestion(id))
    }

    /// Next unanswered question in `category`, or the category-complete result.
    fn next_spin_state<R: Rng + ?Sized>(
        &self,
        rotation: f64,
        category: CategoryId,
        progression: &ProgressionState,
        rng: &mut R,
    ) -> GameState {
        let remaining: Vec<&Question> = self
            .bank
            .in_category(&category)
            .filter(|question| !progression.is_answered(question.id()))
            .collect();

        match remaining.choose(rng) {
            Some(question) => GameState::Spin(SpinPhase::Question {
                rotation,
                category,
                slot: QuestionSlot::new(question.id()),
            }),
            None => GameState::Spin(SpinPhase::Result { rotation, category }),
        }
    }

    /// Random question from the whole bank, avoiding an immediate repeat.
    fn next_streak_state<R: Rng + ?Sized>(
        &self,
        previous: Option<QuestionId>,
        progression: &ProgressionState,
        rng: &mut R,
    ) -> GameState {
        let all = self.bank.all();
        let pool: Vec<&Question> = if all.len() > 1 {
            all.iter().filter(|q| Some(q.id()) != previous).collect()
        } else {
            all.iter().collect()
        };

        match pool.choose(rng) {
            Some(question) => GameState::Streak(StreakPhase::Question {
                slot: QuestionSlot::new(question.id()),
            }),
            None => GameState::Streak(StreakPhase::Result {
                run: progression.correct_count(),
            }),
        }
    }
}

fn invalid(state: &GameState, event: GameEvent) -> GameError {
    GameError::InvalidTransition {
        state: state.label(),
        event: event.name(),
    }
}
