#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod daily_gate;
pub mod error;
pub mod game_service;
pub mod lesson_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use config::ServicesConfig;
pub use daily_gate::DailyCompletionGate;
pub use error::{AppServicesError, GameServiceError, LessonServiceError};
pub use game_service::GameService;
pub use lesson_service::{LessonService, ModuleProgress};
