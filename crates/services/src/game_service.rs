use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use quiz_core::Clock;
use quiz_core::content::ContentStore;
use quiz_core::daily::DailyKey;
use quiz_core::game::{Effect, Game, GameEvent, GameSnapshot, GameState};
use quiz_core::model::ProgressionState;
use quiz_core::rules::GameRules;
use rand::rngs::StdRng;

use crate::daily_gate::DailyCompletionGate;
use crate::error::GameServiceError;

struct Session {
    state: GameState,
    progression: ProgressionState,
    rng: StdRng,
    /// Days whose daily question was answered in this session, stored or not.
    attempted_days: BTreeSet<DailyKey>,
    /// Bumped on every accepted spin so a stale settle timer can be told apart.
    spin_generation: u64,
}

/// Owns one player's game session and turns UI intents into reducer events.
///
/// The session sits behind a mutex that is never held across an `.await`, so
/// a second intent arriving while a spin settles sees the spinning state and
/// is rejected by the reducer instead of blocking.
pub struct GameService {
    clock: Clock,
    rules: GameRules,
    content: Arc<ContentStore>,
    daily: DailyCompletionGate,
    session: Mutex<Session>,
}

impl GameService {
    #[must_use]
    pub fn new(
        clock: Clock,
        rules: GameRules,
        content: Arc<ContentStore>,
        daily: DailyCompletionGate,
        rng: StdRng,
    ) -> Self {
        Self {
            clock,
            rules,
            content,
            daily,
            session: Mutex::new(Session {
                state: GameState::Hub,
                progression: ProgressionState::default(),
                rng,
                attempted_days: BTreeSet::new(),
                spin_generation: 0,
            }),
        }
    }

    #[must_use]
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    /// Current view of the session.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError::SessionPoisoned` if the session lock is poisoned.
    pub fn snapshot(&self) -> Result<GameSnapshot, GameServiceError> {
        let session = self.lock()?;
        Ok(self.build_snapshot(&session))
    }

    /// # Errors
    ///
    /// Returns `GameServiceError` if the hub is not showing.
    pub fn enter_spin(&self) -> Result<GameSnapshot, GameServiceError> {
        self.apply(GameEvent::EnterSpin).map(|(snapshot, _)| snapshot)
    }

    /// # Errors
    ///
    /// Returns `GameServiceError` if the hub is not showing.
    pub fn enter_streak(&self) -> Result<GameSnapshot, GameServiceError> {
        self.apply(GameEvent::EnterStreak).map(|(snapshot, _)| snapshot)
    }

    /// Open the daily menu for the clock's current date.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if the hub is not showing.
    pub async fn enter_daily(&self) -> Result<GameSnapshot, GameServiceError> {
        let date = self.clock.today();
        let key = DailyKey::for_date(date);
        let attempted = self.lock()?.attempted_days.contains(&key);
        let completed_today = attempted || self.daily.has_completed(&key).await;
        self.apply(GameEvent::EnterDaily {
            date,
            completed_today,
        })
        .map(|(snapshot, _)| snapshot)
    }

    /// Leave the streak or daily menu for the first question.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if no menu is showing or today's daily
    /// challenge was already attempted.
    pub fn start(&self) -> Result<GameSnapshot, GameServiceError> {
        self.apply(GameEvent::Start).map(|(snapshot, _)| snapshot)
    }

    /// Spin the wheel and wait for it to settle on a category.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if the spin menu is not showing, a spin is
    /// already running, or no category is unlocked.
    ///
    /// If the spin was already settled by [`Self::settle_spin`] by the time
    /// the delay ends, the current snapshot is returned unchanged.
    pub async fn spin(&self) -> Result<GameSnapshot, GameServiceError> {
        let generation = {
            let mut session = self.lock()?;
            self.apply_locked(&mut session, GameEvent::Spin)?;
            session.spin_generation
        };
        tokio::time::sleep(self.rules.spin_settle()).await;

        let mut session = self.lock()?;
        if session.spin_generation != generation || !session.state.is_spinning() {
            debug!("spin {generation} already settled");
            return Ok(self.build_snapshot(&session));
        }
        let (snapshot, _) = self.apply_locked(&mut session, GameEvent::SettleSpin)?;
        log_settled(&snapshot);
        Ok(snapshot)
    }

    /// Resolve a pending spin immediately.
    ///
    /// [`Self::spin`] does this after the settle delay; calling it directly
    /// recovers a session whose spin future was dropped mid-flight.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if no spin is pending.
    pub fn settle_spin(&self) -> Result<GameSnapshot, GameServiceError> {
        let (snapshot, _) = self.apply(GameEvent::SettleSpin)?;
        log_settled(&snapshot);
        Ok(snapshot)
    }

    /// Reveal an answer. Daily completion is written before returning.
    ///
    /// A failed write is logged and does not undo the revealed answer.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if no question is showing or the index is
    /// out of range.
    pub async fn answer(&self, index: usize) -> Result<GameSnapshot, GameServiceError> {
        let (snapshot, effects) = self.apply(GameEvent::Answer(index))?;
        for effect in effects {
            self.perform(effect).await;
        }
        Ok(snapshot)
    }

    /// Move past a revealed answer.
    ///
    /// # Errors
    ///
    /// Returns `GameServiceError` if the answer is not yet revealed or there is
    /// nothing to continue from.
    pub fn continue_play(&self) -> Result<GameSnapshot, GameServiceError> {
        self.apply(GameEvent::Continue).map(|(snapshot, _)| snapshot)
    }

    /// # Errors
    ///
    /// Returns `GameServiceError` if no result screen is showing.
    pub fn play_again(&self) -> Result<GameSnapshot, GameServiceError> {
        self.apply(GameEvent::PlayAgain).map(|(snapshot, _)| snapshot)
    }

    /// # Errors
    ///
    /// Returns `GameServiceError` if a spin is still settling.
    pub fn return_to_hub(&self) -> Result<GameSnapshot, GameServiceError> {
        self.apply(GameEvent::ReturnToHub).map(|(snapshot, _)| snapshot)
    }

    async fn perform(&self, effect: Effect) {
        match effect {
            Effect::DailyCompleted(key) => match self.daily.mark_completed(&key).await {
                Ok(()) => info!("daily challenge {key} marked completed"),
                Err(err) => warn!("failed to record daily completion for {key}: {err}"),
            },
        }
    }

    fn apply(&self, event: GameEvent) -> Result<(GameSnapshot, Vec<Effect>), GameServiceError> {
        let mut session = self.lock()?;
        self.apply_locked(&mut session, event)
    }

    fn apply_locked(
        &self,
        session: &mut Session,
        event: GameEvent,
    ) -> Result<(GameSnapshot, Vec<Effect>), GameServiceError> {
        let game = Game::new(
            self.content.bank(),
            self.content.categories(),
            &self.rules,
        );

        let from = session.state.label();
        let step = match game.apply(
            &session.state,
            &session.progression,
            event,
            &mut session.rng,
        ) {
            Ok(step) => step,
            Err(err) => {
                debug!("rejected {} in {from}: {err}", event.name());
                return Err(err.into());
            }
        };

        session.state = step.state;
        session.progression = step.progression;
        if event == GameEvent::Spin {
            session.spin_generation += 1;
        }
        for effect in &step.effects {
            match effect {
                Effect::DailyCompleted(key) => {
                    session.attempted_days.insert(key.clone());
                }
            }
        }
        debug!(
            "applied {} : {from} -> {} (points {})",
            event.name(),
            session.state.label(),
            session.progression.cumulative_points()
        );

        Ok((self.build_snapshot(session), step.effects))
    }

    fn build_snapshot(&self, session: &Session) -> GameSnapshot {
        GameSnapshot::build(
            &session.state,
            &session.progression,
            self.content.bank(),
            self.content.categories(),
        )
    }

    fn lock(&self) -> Result<MutexGuard<'_, Session>, GameServiceError> {
        self.session
            .lock()
            .map_err(|_| GameServiceError::SessionPoisoned)
    }
}

fn log_settled(snapshot: &GameSnapshot) {
    if let Some(category) = &snapshot.spin_category {
        info!("spin settled on category {category}");
    }
}
