use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{
    Action, AppServices, DashboardService, InMemoryBackend, QuizService, Store, StudyBackend,
    StudyService,
};
use study_core::model::{AnswerSheet, AttemptMode, Flashcard, QuizQuestion, StudyMaterial, UserId};
use study_core::time::fixed_clock;

use crate::context::{UiApp, build_app_context, use_store_provider};
use crate::platform::{LinkOpener, LinkOpenerRef};
use crate::views::{DashboardView, HomeView, MaterialStatsView, MaterialView, QuizView};

struct NoopLinkOpener;

impl LinkOpener for NoopLinkOpener {
    fn open_url(&self, _url: &str) {}
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn user_id(&self) -> UserId {
        self.services.user_id().clone()
    }

    fn store(&self) -> Arc<Store> {
        self.services.store()
    }

    fn study(&self) -> Arc<StudyService> {
        self.services.study()
    }

    fn quiz(&self) -> Arc<QuizService> {
        self.services.quiz()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(NoopLinkOpener)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Material,
    Quiz,
    Dashboard,
    MaterialStats(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let context = use_context_provider(|| build_app_context(app));
    use_store_provider(context.store());
    use_context_provider(|| props.view.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Material => rsx! { MaterialView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
        ViewKind::MaterialStats(material_id) => rsx! { MaterialStatsView { material_id } },
    }
}

pub fn sample_material() -> StudyMaterial {
    let question = |q: &str, answer: &str| QuizQuestion {
        question: q.into(),
        options: vec!["Mitochondria".into(), "Ribosome".into(), "Nucleus".into()],
        answer: answer.into(),
        explanation: Some("See chapter 2.".into()),
    };
    StudyMaterial {
        summary: "## Cells\n\nThe **cell** is the basic unit of life.".into(),
        key_topics: vec!["Biology".into(), "Organelles".into()],
        key_points: vec!["Cells divide by mitosis".into()],
        flashcards: vec![Flashcard {
            front: "Powerhouse of the cell?".into(),
            back: "Mitochondria".into(),
        }],
        quiz: vec![
            question("Which organelle makes ATP?", "Mitochondria"),
            question("Where are proteins made?", "Ribosome"),
        ],
        ..StudyMaterial::default()
    }
}

/// Services over an in-memory backend, populated before a view is mounted.
pub struct TestBed {
    pub services: AppServices,
    pub backend: Option<Arc<InMemoryBackend>>,
}

impl TestBed {
    pub fn in_memory() -> Self {
        let backend = Arc::new(InMemoryBackend::new(sample_material(), fixed_clock()));
        let dyn_backend: Arc<dyn StudyBackend> = backend.clone();
        Self {
            services: AppServices::with_backend(user(), dyn_backend),
            backend: Some(backend),
        }
    }

    pub fn with_backend(backend: Arc<dyn StudyBackend>) -> Self {
        Self {
            services: AppServices::with_backend(user(), backend),
            backend: None,
        }
    }

    /// Upload the sample material and make it the current one.
    pub async fn load_material(&self) -> StudyMaterial {
        let material = self
            .services
            .study()
            .upload_text("Cells are the basic unit of life.", Some("Cells".into()))
            .await
            .expect("upload");
        self.services
            .store()
            .dispatch(Action::MaterialLoaded(material.clone()));
        material
    }

    /// Record one attempt answering only the first question, correctly.
    pub async fn submit_attempt(&self, material: &StudyMaterial) {
        let mut answers = AnswerSheet::for_indices(0..material.quiz.len());
        answers.select(0, "Mitochondria");
        self.services
            .quiz()
            .submit(material, AttemptMode::Normal, answers)
            .await
            .expect("submit");
    }

    pub fn mount(&self, view: ViewKind) -> ViewHarness {
        let app = Arc::new(TestApp {
            services: self.services.clone(),
        });
        let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
        ViewHarness { dom }
    }
}

fn user() -> UserId {
    UserId::new("test-user").expect("user id")
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending requests settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}
