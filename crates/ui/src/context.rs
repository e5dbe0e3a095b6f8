use std::future::Future;
use std::sync::Arc;

use dioxus::prelude::*;
use services::{
    Action, AppSnapshot, DashboardService, QuizService, Screen, Store, StudyService,
};
use study_core::model::UserId;

use crate::platform::{LinkOpenerRef, SystemLinkOpener};

pub trait UiApp: Send + Sync {
    fn user_id(&self) -> UserId;

    fn store(&self) -> Arc<Store>;
    fn study(&self) -> Arc<StudyService>;
    fn quiz(&self) -> Arc<QuizService>;
    fn dashboard(&self) -> Arc<DashboardService>;

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(SystemLinkOpener)
    }
}

#[derive(Clone)]
pub struct AppContext {
    user_id: UserId,
    store: Arc<Store>,
    study: Arc<StudyService>,
    quiz: Arc<QuizService>,
    dashboard: Arc<DashboardService>,
    links: LinkOpenerRef,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            user_id: app.user_id(),
            store: app.store(),
            study: app.study(),
            quiz: app.quiz(),
            dashboard: app.dashboard(),
            links: app.link_opener(),
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

    #[must_use]
    pub fn links(&self) -> LinkOpenerRef {
        Arc::clone(&self.links)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: Arc<dyn UiApp>) -> AppContext {
    AppContext::new(&app)
}

// ─── Store handle ──────────────────────────────────────────────────────────────

/// Reactive view of the shared [`Store`].
///
/// Every change goes through the store first; the signal is then refreshed
/// with the new snapshot so subscribed components re-render.
#[derive(Clone)]
pub struct StoreHandle {
    store: Arc<Store>,
    snapshot: Signal<Arc<AppSnapshot>>,
}

impl StoreHandle {
    /// Current snapshot; subscribes the calling component.
    #[must_use]
    pub fn read(&self) -> Arc<AppSnapshot> {
        self.snapshot.read().clone()
    }

    /// Current snapshot without subscribing.
    #[must_use]
    pub fn peek(&self) -> Arc<AppSnapshot> {
        self.store.snapshot()
    }

    pub fn dispatch(&mut self, action: Action) {
        let next = self.store.dispatch(action);
        self.snapshot.set(next);
    }

    /// Run one request for `screen`. The resulting action is applied only if
    /// no newer request for the same screen started meanwhile.
    pub async fn fetch(
        &mut self,
        screen: Screen,
        request: impl Future<Output = Action>,
    ) -> bool {
        let ticket = self.store.begin(screen);
        self.sync();
        let action = request.await;
        let applied = self.store.complete(ticket, action);
        if applied {
            self.sync();
        }
        applied
    }

    /// [`StoreHandle::fetch`] on a background task.
    pub fn spawn_fetch(&self, screen: Screen, request: impl Future<Output = Action> + 'static) {
        let mut handle = self.clone();
        spawn(async move {
            handle.fetch(screen, request).await;
        });
    }

    fn sync(&mut self) {
        self.snapshot.set(self.store.snapshot());
    }
}

/// Provide a [`StoreHandle`] for `store` to every descendant component.
pub fn use_store_provider(store: Arc<Store>) -> StoreHandle {
    let initial = Arc::clone(&store);
    let snapshot = use_signal(move || initial.snapshot());
    use_context_provider(move || StoreHandle { store, snapshot })
}

#[must_use]
pub fn use_store() -> StoreHandle {
    use_context::<StoreHandle>()
}
