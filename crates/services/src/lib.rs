#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod dashboard_service;
pub mod error;
pub mod flashcards;
pub mod gateway;
pub mod quiz_service;
pub mod store;
pub mod study_service;

pub use study_core::Clock;

pub use app_services::AppServices;
pub use config::GatewayConfig;
pub use dashboard_service::{DashboardService, MaterialReport, UserReport};
pub use error::{ConfigError, GatewayError, QuizServiceError, StudyServiceError};
pub use flashcards::FlashcardDeck;
pub use gateway::{HttpStudyBackend, InMemoryBackend, StudyBackend};
pub use quiz_service::QuizService;
pub use store::{Action, AppSnapshot, QuizRun, Remote, RequestTicket, Screen, Store};
pub use study_service::StudyService;
