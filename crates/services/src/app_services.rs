use std::sync::Arc;

use study_core::model::UserId;

use crate::config::GatewayConfig;
use crate::dashboard_service::DashboardService;
use crate::gateway::{HttpStudyBackend, StudyBackend};
use crate::quiz_service::QuizService;
use crate::store::{AppSnapshot, Store};
use crate::study_service::StudyService;

/// Assembles app-facing services around one backend and one store.
#[derive(Clone)]
pub struct AppServices {
    user_id: UserId,
    store: Arc<Store>,
    study: Arc<StudyService>,
    quiz: Arc<QuizService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Services talking to the HTTP backend described by `config`.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        let backend: Arc<dyn StudyBackend> = Arc::new(HttpStudyBackend::new(config));
        Self::with_backend(config.user_id().clone(), backend)
    }

    #[must_use]
    pub fn with_backend(user_id: UserId, backend: Arc<dyn StudyBackend>) -> Self {
        let store = Arc::new(Store::new(AppSnapshot::new(user_id.clone())));
        Self {
            study: Arc::new(StudyService::new(user_id.clone(), Arc::clone(&backend))),
            quiz: Arc::new(QuizService::new(user_id.clone(), Arc::clone(&backend))),
            dashboard: Arc::new(DashboardService::new(user_id.clone(), backend)),
            store,
            user_id,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn store(&self) -> Arc<Store> {
        Arc::clone(&self.store)
    }

    #[must_use]
    pub fn study(&self) -> Arc<StudyService> {
        Arc::clone(&self.study)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}
