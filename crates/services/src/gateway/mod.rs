//! Remote gateway: one typed call per backend endpoint.

mod http;
mod in_memory;
pub mod types;
mod wire;

use async_trait::async_trait;

use study_core::model::{MaterialId, StudyMaterial, UserId};

use crate::error::GatewayError;

pub use http::HttpStudyBackend;
pub use in_memory::InMemoryBackend;
pub use types::{
    DEFAULT_MAX_VIDEOS, DailyActivity, DashboardOverview, MarkPattern, MaterialDashboard,
    MaterialOverview, Mindmap, MindmapRequest, MindmapStructure, MockQuestion, MockTest,
    MockTestRequest, QuizSubmission, RevisionQuiz, SubmissionReceipt, UploadRequest, UploadSource,
    UserDashboard, UserSummary, Video, VideoQuery,
};

/// Contract for talking to the study backend.
///
/// Calls are independent and never retried. Missing response fields decode
/// to empty or zero values; only transport failures, non-success statuses,
/// undecodable bodies and backend-reported errors surface as `Err`.
#[async_trait]
pub trait StudyBackend: Send + Sync {
    /// Upload a PDF or raw text and get generated study content back.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the backend rejects the document.
    async fn upload_material(&self, request: UploadRequest) -> Result<StudyMaterial, GatewayError>;

    /// Ask a free-form question about `context`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn ask_question(&self, context: &str, question: &str) -> Result<String, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn recommend_videos(&self, query: &VideoQuery) -> Result<Vec<Video>, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the backend cannot render the map.
    async fn mindmap(&self, request: &MindmapRequest) -> Result<Mindmap, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn mock_test(&self, request: &MockTestRequest) -> Result<MockTest, GatewayError>;

    /// Record one quiz attempt and return the refreshed stats for the material.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails or the attempt was not stored.
    async fn submit_quiz(&self, submission: &QuizSubmission)
    -> Result<SubmissionReceipt, GatewayError>;

    /// Questions the user should revisit, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn revision_quiz(
        &self,
        user_id: &UserId,
        material_id: &MaterialId,
        limit: usize,
    ) -> Result<RevisionQuiz, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn dashboard_overview(&self, user_id: &UserId) -> Result<DashboardOverview, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn user_dashboard(&self, user_id: &UserId) -> Result<UserDashboard, GatewayError>;

    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn material_dashboard(
        &self,
        user_id: &UserId,
        material_id: &MaterialId,
    ) -> Result<MaterialDashboard, GatewayError>;
}
