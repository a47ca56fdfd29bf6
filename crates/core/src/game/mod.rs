//! Game mode controller: hub, spin, daily and streak modes as one state machine.

mod engine;
mod state;
mod view;

pub use engine::{Effect, Game, GameError, GameEvent, Step};
pub use state::{DailyPhase, GameMode, GameState, QuestionSlot, SpinPhase, StreakPhase, UiState};
pub use view::{CategoryView, GameSnapshot, ModeSession};

#[cfg(test)]
mod tests;
