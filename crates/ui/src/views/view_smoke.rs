use std::sync::Arc;

use services::gateway::{
    DashboardOverview, MaterialDashboard, Mindmap, MindmapRequest, MockTest, MockTestRequest,
    QuizSubmission, RevisionQuiz, SubmissionReceipt, UploadRequest, UserDashboard, Video,
    VideoQuery,
};
use services::{Action, GatewayError, StudyBackend};
use study_core::model::{MaterialId, StudyMaterial, UserId};

use super::test_harness::{TestBed, ViewKind};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_upload_form_and_empty_overview() {
    let bed = TestBed::in_memory();
    let mut harness = bed.mount(ViewKind::Home);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Upload study material"), "missing title in {html}");
    assert!(html.contains("Generate study material"), "missing button in {html}");
    assert!(html.contains("No quiz attempts yet"), "missing empty overview in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_lists_attempted_materials() {
    let bed = TestBed::in_memory();
    let material = bed.load_material().await;
    bed.submit_attempt(&material).await;

    let mut harness = bed.mount(ViewKind::Home);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("mem-1"), "missing material row in {html}");
    assert!(html.contains("1 attempt"), "missing attempt count in {html}");
    assert!(html.contains("/stats/mem-1"), "missing stats link in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn material_view_smoke_renders_summary_and_flashcards() {
    let bed = TestBed::in_memory();
    bed.load_material().await;

    let mut harness = bed.mount(ViewKind::Material);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("<strong>cell</strong>"), "summary not rendered in {html}");
    assert!(html.contains("Organelles"), "missing topic chip in {html}");
    assert!(html.contains("Powerhouse of the cell?"), "missing flashcard in {html}");
    assert!(html.contains("Take the quiz (2 questions)"), "missing quiz button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn material_view_smoke_without_material_points_to_upload() {
    let bed = TestBed::in_memory();
    let mut harness = bed.mount(ViewKind::Material);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No material loaded yet."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_open_questions() {
    let bed = TestBed::in_memory();
    bed.load_material().await;
    bed.services.store().dispatch(Action::QuizStarted);
    bed.services.store().dispatch(Action::OptionSelected {
        index: 0,
        option: "Ribosome".into(),
    });

    let mut harness = bed.mount(ViewKind::Quiz);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("1 of 2 answered"), "missing progress in {html}");
    assert!(html.contains("Which organelle makes ATP?"), "missing question in {html}");
    assert!(html.contains("Submit answers"), "missing submit button in {html}");
    assert!(!html.contains("See chapter 2."), "explanation leaked before submit in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_without_run() {
    let bed = TestBed::in_memory();
    let mut harness = bed.mount(ViewKind::Quiz);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No quiz in progress."), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_cards_and_trends() {
    let bed = TestBed::in_memory();
    let material = bed.load_material().await;
    bed.submit_attempt(&material).await;

    let mut harness = bed.mount(ViewKind::Dashboard);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Attempts"), "missing stat card in {html}");
    assert!(html.contains("Last attempt"), "missing donut in {html}");
    assert!(html.contains("Accuracy by day"), "missing daily trend in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_without_attempts() {
    let bed = TestBed::in_memory();
    let mut harness = bed.mount(ViewKind::Dashboard);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Take a quiz to start tracking"), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn material_stats_view_smoke_renders_report() {
    let bed = TestBed::in_memory();
    let material = bed.load_material().await;
    bed.submit_attempt(&material).await;

    let mut harness = bed.mount(ViewKind::MaterialStats("mem-1".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Biology"), "missing title in {html}");
    assert!(html.contains("Weakest questions"), "missing weak questions in {html}");
    assert!(html.contains("Where are proteins made?"), "question text not joined in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_error_after_backend_failure() {
    let bed = TestBed::in_memory();
    bed.backend
        .as_ref()
        .expect("in-memory backend")
        .fail_next("dashboard offline")
        .expect("arm failure");

    let mut harness = bed.mount(ViewKind::Home);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("dashboard offline"), "missing message in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

struct FailingBackend;

fn offline<T>() -> Result<T, GatewayError> {
    Err(GatewayError::Backend("fail".to_string()))
}

#[async_trait::async_trait]
impl StudyBackend for FailingBackend {
    async fn upload_material(&self, _request: UploadRequest) -> Result<StudyMaterial, GatewayError> {
        offline()
    }

    async fn ask_question(&self, _context: &str, _question: &str) -> Result<String, GatewayError> {
        offline()
    }

    async fn recommend_videos(&self, _query: &VideoQuery) -> Result<Vec<Video>, GatewayError> {
        offline()
    }

    async fn mindmap(&self, _request: &MindmapRequest) -> Result<Mindmap, GatewayError> {
        offline()
    }

    async fn mock_test(&self, _request: &MockTestRequest) -> Result<MockTest, GatewayError> {
        offline()
    }

    async fn submit_quiz(
        &self,
        _submission: &QuizSubmission,
    ) -> Result<SubmissionReceipt, GatewayError> {
        offline()
    }

    async fn revision_quiz(
        &self,
        _user_id: &UserId,
        _material_id: &MaterialId,
        _limit: usize,
    ) -> Result<RevisionQuiz, GatewayError> {
        offline()
    }

    async fn dashboard_overview(&self, _user_id: &UserId) -> Result<DashboardOverview, GatewayError> {
        offline()
    }

    async fn user_dashboard(&self, _user_id: &UserId) -> Result<UserDashboard, GatewayError> {
        offline()
    }

    async fn material_dashboard(
        &self,
        _user_id: &UserId,
        _material_id: &MaterialId,
    ) -> Result<MaterialDashboard, GatewayError> {
        offline()
    }
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_view_smoke_renders_error_state() {
    let bed = TestBed::with_backend(Arc::new(FailingBackend));
    let mut harness = bed.mount(ViewKind::Dashboard);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn material_stats_view_smoke_renders_error_state() {
    let bed = TestBed::with_backend(Arc::new(FailingBackend));
    let mut harness = bed.mount(ViewKind::MaterialStats("mem-9".into()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("fail"), "missing message in {html}");
}
