use std::sync::Arc;

use log::info;
use quiz_core::content::ContentStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::Storage;

use crate::Clock;
use crate::config::ServicesConfig;
use crate::daily_gate::DailyCompletionGate;
use crate::error::AppServicesError;
use crate::game_service::GameService;
use crate::lesson_service::LessonService;

/// Assembles app-facing services around the built-in content.
#[derive(Clone)]
pub struct AppServices {
    content: Arc<ContentStore>,
    daily_gate: DailyCompletionGate,
    game: Arc<GameService>,
    lessons: Arc<LessonService>,
}

impl AppServices {
    /// Build services from configuration: `SQLite` when `db_url` is set,
    /// in-memory storage otherwise.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or content loading fails.
    pub async fn from_config(config: &ServicesConfig, clock: Clock) -> Result<Self, AppServicesError> {
        match config.db_url.as_deref() {
            Some(db_url) => Self::new_sqlite(db_url, config, clock).await,
            None => Self::in_memory(config, clock),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or content loading fails.
    pub async fn new_sqlite(
        db_url: &str,
        config: &ServicesConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        info!("daily completions stored in {db_url}");
        Self::assemble(storage, config, clock)
    }

    /// Build services with non-durable storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the built-in content fails to load.
    pub fn in_memory(config: &ServicesConfig, clock: Clock) -> Result<Self, AppServicesError> {
        Self::assemble(Storage::in_memory(), config, clock)
    }

    fn assemble(
        storage: Storage,
        config: &ServicesConfig,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let content = Arc::new(ContentStore::builtin()?);
        let daily_gate = DailyCompletionGate::new(clock, Arc::clone(&storage.daily_completions));
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let game = Arc::new(GameService::new(
            clock,
            config.rules.clone(),
            Arc::clone(&content),
            daily_gate.clone(),
            rng,
        ));
        let lessons = Arc::new(LessonService::new(Arc::clone(&content)));

        Ok(Self {
            content,
            daily_gate,
            game,
            lessons,
        })
    }

    #[must_use]
    pub fn content(&self) -> Arc<ContentStore> {
        Arc::clone(&self.content)
    }

    #[must_use]
    pub fn daily_gate(&self) -> DailyCompletionGate {
        self.daily_gate.clone()
    }

    #[must_use]
    pub fn game(&self) -> Arc<GameService> {
        Arc::clone(&self.game)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }
}
