use std::env;
use std::time::Duration;

use log::warn;
use quiz_core::rules::{GameRules, WrongAnswerPolicy};

/// Bootstrap settings for [`crate::AppServices`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServicesConfig {
    /// `SQLite` URL for daily completions; in-memory storage when `None`.
    pub db_url: Option<String>,
    /// Fixed RNG seed; the OS RNG seeds the session when `None`.
    pub rng_seed: Option<u64>,
    pub rules: GameRules,
}

impl ServicesConfig {
    /// Read `QUIZ_DB_URL`, `QUIZ_RNG_SEED`, `QUIZ_SPIN_SETTLE_MS` and
    /// `QUIZ_WRONG_ANSWER` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable lookup.
    ///
    /// Malformed values are skipped with a warning and the default is kept.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let db_url = read("QUIZ_DB_URL");

        let rng_seed = read("QUIZ_RNG_SEED").and_then(|raw| match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("ignoring QUIZ_RNG_SEED={raw:?}: not an unsigned integer");
                None
            }
        });

        let mut rules = GameRules::default();
        if let Some(raw) = read("QUIZ_SPIN_SETTLE_MS") {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => {
                    rules = rules.with_spin_settle(Duration::from_millis(ms));
                }
                _ => warn!("ignoring QUIZ_SPIN_SETTLE_MS={raw:?}: expected milliseconds > 0"),
            }
        }
        if let Some(raw) = read("QUIZ_WRONG_ANSWER") {
            match WrongAnswerPolicy::parse(&raw) {
                Some(policy) => rules = rules.with_wrong_answer(policy),
                None => warn!("ignoring QUIZ_WRONG_ANSWER={raw:?}: expected retry or exhaust"),
            }
        }

        Self {
            db_url,
            rng_seed,
            rules,
        }
    }
}
