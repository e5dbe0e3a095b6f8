use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use study_core::model::{AttemptMode, MaterialId, StudyMaterial, UserId};

use super::types::{
    DashboardOverview, MaterialDashboard, Mindmap, MindmapRequest, MockTest, MockTestRequest,
    QuizSubmission, RevisionQuiz, SubmissionReceipt, UploadRequest, UploadSource, UserDashboard,
    Video, VideoQuery,
};
use super::wire::{
    self, AnswerDto, AskBody, MaterialDashboardDto, MaterialDto, MindmapBody, MindmapDto,
    MockTestBody, MockTestDto, OverviewDto, RevisionBody, RevisionDto, SubmissionBody,
    SubmissionDto, TextUploadBody, UserDashboardDto, VideosBody, VideosDto,
};
use super::StudyBackend;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// `StudyBackend` over HTTP+JSON.
#[derive(Clone, Debug)]
pub struct HttpStudyBackend {
    client: Client,
    base_url: Url,
    upload_timeout: Option<Duration>,
}

impl HttpStudyBackend {
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    #[must_use]
    pub fn with_client(client: Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.base_url().clone(),
            upload_timeout: config.upload_timeout(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` joined with `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                GatewayError::InvalidRequest(format!("{} cannot be used as a base url", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        label: &str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        debug!("{label}: sending request");
        let response = request.send().await.inspect_err(|err| {
            warn!("{label}: transport error: {err}");
        })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| wire::backend_error(&value))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
            warn!("{label}: server responded {status}: {message}");
            return Err(GatewayError::HttpStatus { status, message });
        }

        debug!("{label}: {status}, {} bytes", body.len());
        wire::decode(&body).inspect_err(|err| warn!("{label}: {err}"))
    }
}

#[async_trait]
impl StudyBackend for HttpStudyBackend {
    async fn upload_material(&self, request: UploadRequest) -> Result<StudyMaterial, GatewayError> {
        let url = self.endpoint(&["api", "study_material"])?;
        let mut builder = match request.source {
            UploadSource::Pdf { file_name, bytes } => {
                if bytes.is_empty() {
                    return Err(GatewayError::InvalidRequest(format!("{file_name} is empty")));
                }
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/pdf")?;
                let mut form = Form::new().part("file", part);
                if let Some(user_id) = &request.user_id {
                    form = form.text("user_id", user_id.as_str().to_owned());
                }
                if let Some(topic) = request.topic {
                    form = form.text("topic", topic);
                }
                self.client.post(url).multipart(form)
            }
            UploadSource::Text(text) => {
                if text.trim().is_empty() {
                    return Err(GatewayError::InvalidRequest("no text to upload".into()));
                }
                self.client.post(url).json(&TextUploadBody {
                    text: &text,
                    user_id: request.user_id.as_ref().map(UserId::as_str),
                    topic: request.topic.as_deref(),
                })
            }
        };
        if let Some(timeout) = self.upload_timeout {
            builder = builder.timeout(timeout);
        }
        let dto: MaterialDto = self.send("study_material", builder).await?;
        Ok(dto.into())
    }

    async fn ask_question(&self, context: &str, question: &str) -> Result<String, GatewayError> {
        if question.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("the question is empty".into()));
        }
        let url = self.endpoint(&["api", "ask_question"])?;
        let builder = self.client.post(url).json(&AskBody {
            text: context,
            question,
        });
        let dto: AnswerDto = self.send("ask_question", builder).await?;
        Ok(dto.answer.trim().to_owned())
    }

    async fn recommend_videos(&self, query: &VideoQuery) -> Result<Vec<Video>, GatewayError> {
        let url = self.endpoint(&["api", "recommend_videos"])?;
        let builder = self.client.post(url).json(&VideosBody {
            key_topics: &query.key_topics,
            key_points: &query.key_points,
            query: query.query.as_deref(),
            max_results: query.max_results,
        });
        let dto: VideosDto = self.send("recommend_videos", builder).await?;
        Ok(dto.into())
    }

    async fn mindmap(&self, request: &MindmapRequest) -> Result<Mindmap, GatewayError> {
        let url = self.endpoint(&["api", "mindmap"])?;
        let builder = self.client.post(url).json(&MindmapBody {
            summary: &request.summary,
            key_topics: &request.key_topics,
            key_points: &request.key_points,
        });
        let dto: MindmapDto = self.send("mindmap", builder).await?;
        Ok(dto.into())
    }

    async fn mock_test(&self, request: &MockTestRequest) -> Result<MockTest, GatewayError> {
        let url = self.endpoint(&["api", "mock_test"])?;
        let builder = self.client.post(url).json(&MockTestBody {
            text: &request.text,
            topic: request.topic.as_deref(),
            summary: &request.summary,
            key_points: &request.key_points,
            pattern: request.pattern.iter().map(Into::into).collect(),
        });
        let dto: MockTestDto = self.send("mock_test", builder).await?;
        Ok(dto.into())
    }

    async fn submit_quiz(
        &self,
        submission: &QuizSubmission,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let url = self.endpoint(&["api", "quiz_performance"])?;
        let answers = submission
            .answers
            .iter()
            .map(|(index, selected)| (index.to_string(), selected))
            .collect();
        let question_indices =
            (submission.mode == AttemptMode::Revision).then(|| submission.answers.indices());
        let builder = self.client.post(url).json(&SubmissionBody {
            user_id: submission.user_id.as_str(),
            material_id: submission.material_id.as_str(),
            answers,
            unsolved_questions: submission.answers.unsolved_questions(),
            mode: submission.mode.as_str(),
            question_indices,
        });
        let dto: SubmissionDto = self.send("quiz_performance", builder).await?;
        dto.into_receipt(&submission.material_id)
    }

    async fn revision_quiz(
        &self,
        user_id: &UserId,
        material_id: &MaterialId,
        limit: usize,
    ) -> Result<RevisionQuiz, GatewayError> {
        let url = self.endpoint(&["api", "revision_quiz"])?;
        let builder = self.client.post(url).json(&RevisionBody {
            user_id: user_id.as_str(),
            material_id: material_id.as_str(),
            limit,
        });
        let dto: RevisionDto = self.send("revision_quiz", builder).await?;
        Ok(dto.into_revision(material_id))
    }

    async fn dashboard_overview(&self, user_id: &UserId) -> Result<DashboardOverview, GatewayError> {
        let url = self.endpoint(&["api", "dashboard", "overview", user_id.as_str()])?;
        let dto: OverviewDto = self.send("dashboard_overview", self.client.get(url)).await?;
        Ok(dto.into())
    }

    async fn user_dashboard(&self, user_id: &UserId) -> Result<UserDashboard, GatewayError> {
        let url = self.endpoint(&["api", "dashboard", "user", user_id.as_str()])?;
        let dto: UserDashboardDto = self.send("user_dashboard", self.client.get(url)).await?;
        Ok(dto.into())
    }

    async fn material_dashboard(
        &self,
        user_id: &UserId,
        material_id: &MaterialId,
    ) -> Result<MaterialDashboard, GatewayError> {
        let url = self.endpoint(&[
            "api",
            "dashboard",
            "material",
            material_id.as_str(),
            user_id.as_str(),
        ])?;
        let dto: MaterialDashboardDto = self.send("material_dashboard", self.client.get(url)).await?;
        Ok(dto.into_dashboard(material_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpStudyBackend {
        HttpStudyBackend::new(&GatewayConfig::new(base, "u1").unwrap())
    }

    #[test]
    fn endpoints_join_under_base_path() {
        let backend = backend("https://study.example.com/backend");
        let url = backend.endpoint(&["api", "mindmap"]).unwrap();
        assert_eq!(url.as_str(), "https://study.example.com/backend/api/mindmap");
    }

    #[test]
    fn path_parameters_are_percent_encoded() {
        let backend = backend("http://localhost:8000");
        let url = backend
            .endpoint(&["api", "dashboard", "user", "ana maria/2"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/dashboard/user/ana%20maria%2F2"
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn blank_question_is_rejected_locally() {
        let backend = backend("http://localhost:8000");
        let err = backend.ask_question("context", "   ").await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn empty_pdf_is_rejected_locally() {
        let backend = backend("http://localhost:8000");
        let err = backend
            .upload_material(UploadRequest {
                source: UploadSource::Pdf {
                    file_name: "notes.pdf".into(),
                    bytes: Vec::new(),
                },
                user_id: None,
                topic: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }
}
