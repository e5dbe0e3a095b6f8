use std::sync::Arc;

use log::info;

use study_core::analytics::DEFAULT_REVISION_LIMIT;
use study_core::model::{AnswerSheet, AttemptMode, MaterialId, StudyMaterial, UserId};

use crate::error::QuizServiceError;
use crate::gateway::{QuizSubmission, RevisionQuiz, StudyBackend, SubmissionReceipt};

/// Records quiz attempts and builds revision quizzes.
#[derive(Clone)]
pub struct QuizService {
    user_id: UserId,
    backend: Arc<dyn StudyBackend>,
}

impl QuizService {
    #[must_use]
    pub fn new(user_id: UserId, backend: Arc<dyn StudyBackend>) -> Self {
        Self { user_id, backend }
    }

    /// Submit one run of the quiz. Unanswered questions count as skipped.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Untracked` for materials the backend did not
    /// save, `EmptyQuiz` when the sheet covers no questions, or the gateway error.
    pub async fn submit(
        &self,
        material: &StudyMaterial,
        mode: AttemptMode,
        answers: AnswerSheet,
    ) -> Result<SubmissionReceipt, QuizServiceError> {
        let material_id = tracked_id(material)?;
        if answers.is_empty() || material.quiz.is_empty() {
            return Err(QuizServiceError::EmptyQuiz);
        }

        let submission = QuizSubmission {
            user_id: self.user_id.clone(),
            material_id: material_id.clone(),
            answers,
            mode,
        };
        let receipt = self.backend.submit_quiz(&submission).await?;
        info!(
            "recorded {} attempt #{} for {material_id}: {}/{} correct, {} skipped",
            mode.as_str(),
            receipt.attempt.attempt_number,
            receipt.attempt.correct,
            receipt.attempt.attempted,
            receipt.attempt.skipped
        );
        Ok(receipt)
    }

    /// Fetch the questions the user keeps missing.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Untracked` for unsaved materials, `EmptyQuiz`
    /// when the material has no quiz, or the gateway error.
    pub async fn revision(
        &self,
        material: &StudyMaterial,
        limit: Option<usize>,
    ) -> Result<RevisionQuiz, QuizServiceError> {
        let material_id = tracked_id(material)?;
        if material.quiz.is_empty() {
            return Err(QuizServiceError::EmptyQuiz);
        }
        let limit = limit.filter(|l| *l > 0).unwrap_or(DEFAULT_REVISION_LIMIT);
        let revision = self
            .backend
            .revision_quiz(&self.user_id, material_id, limit)
            .await?;
        Ok(revision)
    }
}

fn tracked_id(material: &StudyMaterial) -> Result<&MaterialId, QuizServiceError> {
    material
        .material_id
        .as_ref()
        .ok_or(QuizServiceError::Untracked)
}
