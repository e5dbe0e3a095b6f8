use std::path::Path;
use std::sync::Arc;

use log::info;

use study_core::model::{StudyMaterial, UserId};

use crate::error::StudyServiceError;
use crate::gateway::{
    MarkPattern, Mindmap, MindmapRequest, MockTest, MockTestRequest, StudyBackend, UploadRequest,
    UploadSource, Video, VideoQuery,
};

/// Uploads documents and fetches the extra study aids for a material.
#[derive(Clone)]
pub struct StudyService {
    user_id: UserId,
    backend: Arc<dyn StudyBackend>,
}

impl StudyService {
    #[must_use]
    pub fn new(user_id: UserId, backend: Arc<dyn StudyBackend>) -> Self {
        Self { user_id, backend }
    }

    /// Read a PDF from disk and upload it.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError` if no path was given, the file is not a
    /// `.pdf`, it cannot be read, or the upload fails.
    pub async fn upload_pdf(
        &self,
        path: &Path,
        topic: Option<String>,
    ) -> Result<StudyMaterial, StudyServiceError> {
        if path.as_os_str().is_empty() {
            return Err(StudyServiceError::NoFileSelected);
        }
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(StudyServiceError::NotPdf(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| StudyServiceError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "document.pdf".to_owned(), |name| name.to_string_lossy().into_owned());

        info!("uploading {file_name} ({} bytes)", bytes.len());
        let material = self
            .backend
            .upload_material(UploadRequest {
                source: UploadSource::Pdf { file_name, bytes },
                user_id: Some(self.user_id.clone()),
                topic: normalize(topic),
            })
            .await?;
        log_result(&material);
        Ok(material)
    }

    /// Upload pasted text instead of a file.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::EmptyText` for blank input, or the gateway error.
    pub async fn upload_text(
        &self,
        text: &str,
        topic: Option<String>,
    ) -> Result<StudyMaterial, StudyServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StudyServiceError::EmptyText);
        }
        let material = self
            .backend
            .upload_material(UploadRequest {
                source: UploadSource::Text(text.to_owned()),
                user_id: Some(self.user_id.clone()),
                topic: normalize(topic),
            })
            .await?;
        log_result(&material);
        Ok(material)
    }

    /// Ask a question answered from the material's summary and key points.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError` if the question is blank or the call fails.
    pub async fn ask(
        &self,
        material: &StudyMaterial,
        question: &str,
    ) -> Result<String, StudyServiceError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StudyServiceError::EmptyText);
        }
        let answer = self
            .backend
            .ask_question(&question_context(material), question)
            .await?;
        Ok(answer)
    }

    /// # Errors
    ///
    /// Returns `StudyServiceError::Gateway` if the call fails.
    pub async fn videos(
        &self,
        material: &StudyMaterial,
        query: Option<String>,
    ) -> Result<Vec<Video>, StudyServiceError> {
        let mut request =
            VideoQuery::for_topics(material.key_topics.clone(), material.key_points.clone());
        request.query = normalize(query);
        Ok(self.backend.recommend_videos(&request).await?)
    }

    /// # Errors
    ///
    /// Returns `StudyServiceError::Gateway` if the call fails.
    pub async fn mindmap(&self, material: &StudyMaterial) -> Result<Mindmap, StudyServiceError> {
        let request = MindmapRequest {
            summary: material.summary.clone(),
            key_topics: material.key_topics.clone(),
            key_points: material.key_points.clone(),
        };
        Ok(self.backend.mindmap(&request).await?)
    }

    /// Generate a written mock test. An empty `pattern` means the default paper.
    ///
    /// # Errors
    ///
    /// Returns `StudyServiceError::Gateway` if the call fails.
    pub async fn mock_test(
        &self,
        material: &StudyMaterial,
        pattern: Vec<MarkPattern>,
    ) -> Result<MockTest, StudyServiceError> {
        let pattern = if pattern.is_empty() {
            MarkPattern::default_paper()
        } else {
            pattern
        };
        let request = MockTestRequest {
            text: question_context(material),
            topic: Some(material.title().to_owned()),
            summary: material.summary.clone(),
            key_points: material.key_points.clone(),
            pattern,
        };
        Ok(self.backend.mock_test(&request).await?)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn log_result(material: &StudyMaterial) {
    match &material.material_id {
        Some(id) => info!(
            "material {id} ready: {} flashcards, {} quiz questions",
            material.flashcards.len(),
            material.quiz.len()
        ),
        None => info!("material ready but not saved; quiz results will not be tracked"),
    }
}

fn question_context(material: &StudyMaterial) -> String {
    let mut context = material.summary.clone();
    for point in &material.key_points {
        context.push_str("\n- ");
        context.push_str(point);
    }
    context
}
