//! Application state container.
//!
//! State lives in an immutable [`AppSnapshot`]. Changes go through the pure
//! [`reduce`] function; [`Store`] only swaps the current `Arc<AppSnapshot>`
//! and tracks which in-flight request of each screen is still wanted.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::debug;

use study_core::model::{AnswerSheet, AttemptMode, QuizQuestion, StudyMaterial, UserId};

use crate::dashboard_service::{MaterialReport, UserReport};
use crate::gateway::{DashboardOverview, Mindmap, MockTest, RevisionQuiz, SubmissionReceipt, Video};

// ─── State ─────────────────────────────────────────────────────────────────────

/// Independent request slots. Each slot has its own ticket sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Screen {
    Upload,
    Answer,
    Videos,
    Mindmap,
    MockTest,
    Submission,
    Revision,
    Overview,
    UserDashboard,
    MaterialStats,
}

/// Lifecycle of one remote value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Remote<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Remote<T> {
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Question shown in a quiz run, with its index in the material's full quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunQuestion {
    pub index: usize,
    pub question: QuizQuestion,
}

/// One pass through a quiz, from start until the result comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRun {
    pub mode: AttemptMode,
    pub questions: Vec<RunQuestion>,
    pub answers: AnswerSheet,
    pub result: Remote<SubmissionReceipt>,
}

impl QuizRun {
    #[must_use]
    pub fn new(mode: AttemptMode, questions: Vec<RunQuestion>) -> Self {
        let answers = AnswerSheet::for_indices(questions.iter().map(|q| q.index));
        Self {
            mode,
            questions,
            answers,
            result: Remote::Idle,
        }
    }

    /// Full quiz of a material, in order.
    #[must_use]
    pub fn normal(material: &StudyMaterial) -> Self {
        Self::new(
            AttemptMode::Normal,
            material
                .quiz
                .iter()
                .cloned()
                .enumerate()
                .map(|(index, question)| RunQuestion { index, question })
                .collect(),
        )
    }

    /// Revision questions paired with their original indices.
    #[must_use]
    pub fn revision(revision: &RevisionQuiz) -> Self {
        Self::new(
            AttemptMode::Revision,
            revision
                .indices
                .iter()
                .zip(revision.questions.iter().cloned())
                .map(|(&index, question)| RunQuestion { index, question })
                .collect(),
        )
    }

    /// Whether answers can still change.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.result, Remote::Idle | Remote::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub user_id: UserId,
    pub material: Remote<StudyMaterial>,
    pub answer: Remote<String>,
    pub videos: Remote<Vec<Video>>,
    pub mindmap: Remote<Mindmap>,
    pub mock_test: Remote<MockTest>,
    pub quiz: Option<QuizRun>,
    /// Revision fetch state; the questions themselves live in `quiz`.
    pub revision: Remote<()>,
    pub overview: Remote<DashboardOverview>,
    pub user_dashboard: Remote<UserReport>,
    pub material_stats: Remote<MaterialReport>,
}

impl AppSnapshot {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            material: Remote::Idle,
            answer: Remote::Idle,
            videos: Remote::Idle,
            mindmap: Remote::Idle,
            mock_test: Remote::Idle,
            quiz: None,
            revision: Remote::Idle,
            overview: Remote::Idle,
            user_dashboard: Remote::Idle,
            material_stats: Remote::Idle,
        }
    }

    #[must_use]
    pub fn current_material(&self) -> Option<&StudyMaterial> {
        self.material.ready()
    }
}

// ─── Actions and reducer ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Started(Screen),
    Failed(Screen, String),
    MaterialLoaded(StudyMaterial),
    MaterialCleared,
    AnswerLoaded(String),
    VideosLoaded(Vec<Video>),
    MindmapLoaded(Mindmap),
    MockTestLoaded(MockTest),
    QuizStarted,
    RevisionLoaded(RevisionQuiz),
    OptionSelected { index: usize, option: String },
    OptionCleared(usize),
    SubmissionRecorded(SubmissionReceipt),
    QuizClosed,
    OverviewLoaded(DashboardOverview),
    UserDashboardLoaded(UserReport),
    MaterialStatsLoaded(MaterialReport),
}

fn set_status(next: &mut AppSnapshot, screen: Screen, loading: bool, failure: Option<String>) {
    fn status<T>(loading: bool, failure: Option<String>, current: &mut Remote<T>) {
        *current = match failure {
            Some(message) => Remote::Failed(message),
            None if loading => Remote::Loading,
            None => return,
        };
    }

    match screen {
        Screen::Upload => status(loading, failure, &mut next.material),
        Screen::Answer => status(loading, failure, &mut next.answer),
        Screen::Videos => status(loading, failure, &mut next.videos),
        Screen::Mindmap => status(loading, failure, &mut next.mindmap),
        Screen::MockTest => status(loading, failure, &mut next.mock_test),
        Screen::Overview => status(loading, failure, &mut next.overview),
        Screen::UserDashboard => status(loading, failure, &mut next.user_dashboard),
        Screen::MaterialStats => status(loading, failure, &mut next.material_stats),
        Screen::Revision => status(loading, failure, &mut next.revision),
        Screen::Submission => {
            if let Some(run) = next.quiz.as_mut() {
                status(loading, failure, &mut run.result);
            }
        }
    }
}

/// Apply `action` to `state`, returning the next state.
#[must_use]
pub fn reduce(state: &AppSnapshot, action: Action) -> AppSnapshot {
    let mut next = state.clone();
    match action {
        Action::Started(screen) => set_status(&mut next, screen, true, None),
        Action::Failed(screen, message) => set_status(&mut next, screen, false, Some(message)),
        Action::MaterialLoaded(material) => {
            next = AppSnapshot {
                material: Remote::Ready(material),
                overview: next.overview,
                user_dashboard: next.user_dashboard,
                ..AppSnapshot::new(next.user_id)
            };
        }
        Action::MaterialCleared => {
            next = AppSnapshot {
                overview: next.overview,
                user_dashboard: next.user_dashboard,
                ..AppSnapshot::new(next.user_id)
            };
        }
        Action::AnswerLoaded(answer) => next.answer = Remote::Ready(answer),
        Action::VideosLoaded(videos) => next.videos = Remote::Ready(videos),
        Action::MindmapLoaded(mindmap) => next.mindmap = Remote::Ready(mindmap),
        Action::MockTestLoaded(test) => next.mock_test = Remote::Ready(test),
        Action::QuizStarted => {
            next.quiz = next.material.ready().map(QuizRun::normal);
            next.revision = Remote::Idle;
        }
        Action::RevisionLoaded(revision) => {
            next.revision = Remote::Ready(());
            next.quiz = (!revision.questions.is_empty()).then(|| QuizRun::revision(&revision));
        }
        Action::OptionSelected { index, option } => {
            if let Some(run) = next.quiz.as_mut().filter(|run| run.is_open()) {
                run.answers.select(index, option);
            }
        }
        Action::OptionCleared(index) => {
            if let Some(run) = next.quiz.as_mut().filter(|run| run.is_open()) {
                run.answers.clear(index);
            }
        }
        Action::SubmissionRecorded(receipt) => {
            if let Some(run) = next.quiz.as_mut() {
                run.result = Remote::Ready(receipt);
            }
            // Dashboards are stale once a new attempt exists.
            next.overview = Remote::Idle;
            next.user_dashboard = Remote::Idle;
            next.material_stats = Remote::Idle;
        }
        Action::QuizClosed => {
            next.quiz = None;
            next.revision = Remote::Idle;
        }
        Action::OverviewLoaded(overview) => next.overview = Remote::Ready(overview),
        Action::UserDashboardLoaded(report) => next.user_dashboard = Remote::Ready(report),
        Action::MaterialStatsLoaded(report) => next.material_stats = Remote::Ready(report),
    }
    next
}

/// Screens whose slots `action` resets; responses already in flight for them
/// belong to the state being replaced.
fn superseded_screens(action: &Action) -> &'static [Screen] {
    match action {
        Action::MaterialLoaded(_) | Action::MaterialCleared => &[
            Screen::Answer,
            Screen::Videos,
            Screen::Mindmap,
            Screen::MockTest,
            Screen::Submission,
            Screen::Revision,
            Screen::MaterialStats,
        ],
        Action::QuizStarted | Action::QuizClosed => &[Screen::Submission, Screen::Revision],
        Action::RevisionLoaded(_) => &[Screen::Submission],
        _ => &[],
    }
}

// ─── Store ─────────────────────────────────────────────────────────────────────

/// Proof that a request was started; only the newest ticket per screen may
/// complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    screen: Screen,
    seq: u64,
}

impl RequestTicket {
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }
}

struct Inner {
    snapshot: Arc<AppSnapshot>,
    latest: BTreeMap<Screen, u64>,
    next_seq: u64,
}

impl Inner {
    fn apply(&mut self, action: Action) {
        for screen in superseded_screens(&action) {
            if let Some(seq) = self.latest.remove(screen) {
                debug!("dropping in-flight {screen:?} request (ticket {seq})");
            }
        }
        self.snapshot = Arc::new(reduce(&self.snapshot, action));
    }
}

pub struct Store {
    inner: Mutex<Inner>,
}

impl Store {
    #[must_use]
    pub fn new(initial: AppSnapshot) -> Self {
        Self {
            inner: Mutex::new(Inner {
                snapshot: Arc::new(initial),
                latest: BTreeMap::new(),
                next_seq: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The reducer cannot panic mid-update, so a poisoned lock still holds a whole snapshot.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<AppSnapshot> {
        Arc::clone(&self.lock().snapshot)
    }

    /// Apply a local action immediately.
    pub fn dispatch(&self, action: Action) -> Arc<AppSnapshot> {
        let mut inner = self.lock();
        inner.apply(action);
        Arc::clone(&inner.snapshot)
    }

    /// Start a request for `screen`, superseding any request still in flight
    /// for it.
    pub fn begin(&self, screen: Screen) -> RequestTicket {
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.latest.insert(screen, seq);
        inner.snapshot = Arc::new(reduce(&inner.snapshot, Action::Started(screen)));
        RequestTicket { screen, seq }
    }

    /// Apply the outcome of a request if `ticket` is still the newest for
    /// its screen. Returns whether it was applied.
    pub fn complete(&self, ticket: RequestTicket, action: Action) -> bool {
        let mut inner = self.lock();
        if inner.latest.get(&ticket.screen) != Some(&ticket.seq) {
            debug!(
                "discarding stale {:?} response (ticket {})",
                ticket.screen, ticket.seq
            );
            return false;
        }
        inner.latest.remove(&ticket.screen);
        inner.apply(action);
        true
    }

    /// Whether a request for `screen` is in flight.
    #[must_use]
    pub fn is_pending(&self, screen: Screen) -> bool {
        self.lock().latest.contains_key(&screen)
    }
}
