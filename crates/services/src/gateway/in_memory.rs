use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Duration;

use study_core::Clock;
use study_core::analytics::{compute_daily_trend, compute_overall_stats, revision_candidates};
use study_core::model::{
    AttemptRecord, MaterialId, PerQuestionStat, QuizStatsSnapshot, SourceType, StudyMaterial,
    UnsolvedQuestion, UserId,
};

use super::StudyBackend;
use super::types::{
    DailyActivity, DashboardOverview, MaterialDashboard, MaterialOverview, MockQuestion, MockTest,
    MockTestRequest, Mindmap, MindmapRequest, MindmapStructure, QuizSubmission, RevisionQuiz,
    SubmissionReceipt, UploadRequest, UploadSource, UserDashboard, UserSummary, Video, VideoQuery,
};
use crate::error::GatewayError;

struct StoredMaterial {
    owner: UserId,
    material: StudyMaterial,
    per_question: BTreeMap<usize, PerQuestionStat>,
    history: Vec<AttemptRecord>,
    last_unsolved: Vec<UnsolvedQuestion>,
}

impl StoredMaterial {
    fn snapshot(&self) -> QuizStatsSnapshot {
        QuizStatsSnapshot {
            history: self.history.clone(),
            per_question: self.per_question.clone(),
            last_unsolved: self.last_unsolved.clone(),
        }
    }
}

struct State {
    clock: Clock,
    template: StudyMaterial,
    materials: BTreeMap<MaterialId, StoredMaterial>,
    videos: Vec<Video>,
    mindmap: Option<Mindmap>,
    next_id: u32,
    pending_failure: Option<String>,
    calls: Vec<&'static str>,
}

impl State {
    /// Log the call and consume a scripted failure, if any.
    fn begin(&mut self, call: &'static str) -> Result<(), GatewayError> {
        self.calls.push(call);
        match self.pending_failure.take() {
            Some(message) => Err(GatewayError::Backend(message)),
            None => Ok(()),
        }
    }

    fn owned(&self, user_id: &UserId, material_id: &MaterialId) -> Result<&StoredMaterial, GatewayError> {
        self.materials
            .get(material_id)
            .filter(|stored| &stored.owner == user_id)
            .ok_or_else(|| GatewayError::Backend("Material not found".into()))
    }

    fn attempts_for(&self, user_id: &UserId) -> Vec<AttemptRecord> {
        let mut attempts: Vec<AttemptRecord> = self
            .materials
            .values()
            .filter(|stored| &stored.owner == user_id)
            .flat_map(|stored| stored.history.iter().cloned())
            .collect();
        attempts.sort_by_key(|attempt| attempt.created_at);
        attempts
    }
}

/// In-process `StudyBackend` for tests and offline runs.
///
/// Uploads return a copy of a template material; quiz submissions are graded
/// and aggregated locally, so dashboards reflect what was submitted.
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(StudyMaterial::default(), Clock::default())
    }
}

impl InMemoryBackend {
    #[must_use]
    pub fn new(template: StudyMaterial, clock: Clock) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                clock,
                template,
                materials: BTreeMap::new(),
                videos: Vec::new(),
                mindmap: None,
                next_id: 1,
                pending_failure: None,
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, GatewayError> {
        self.state
            .lock()
            .map_err(|e| GatewayError::Backend(e.to_string()))
    }

    /// Videos returned by `recommend_videos`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the state lock is poisoned.
    pub fn set_videos(&self, videos: Vec<Video>) -> Result<(), GatewayError> {
        self.lock()?.videos = videos;
        Ok(())
    }

    /// Map returned by `mindmap`; without one the call reports an error.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the state lock is poisoned.
    pub fn set_mindmap(&self, mindmap: Mindmap) -> Result<(), GatewayError> {
        self.lock()?.mindmap = Some(mindmap);
        Ok(())
    }

    /// Make the next call fail with a backend-reported `message`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the state lock is poisoned.
    pub fn fail_next(&self, message: impl Into<String>) -> Result<(), GatewayError> {
        self.lock()?.pending_failure = Some(message.into());
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the state lock is poisoned.
    pub fn advance_clock(&self, delta: Duration) -> Result<(), GatewayError> {
        self.lock()?.clock.advance(delta);
        Ok(())
    }

    /// Names of the calls made so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the state lock is poisoned.
    pub fn calls(&self) -> Result<Vec<&'static str>, GatewayError> {
        Ok(self.lock()?.calls.clone())
    }
}

fn percent(ratio: f64) -> f64 {
    ratio * 100.0
}

fn rebuild_last_unsolved(stored: &mut StoredMaterial) {
    stored.last_unsolved = stored
        .material
        .quiz
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            stored
                .per_question
                .get(index)
                .is_some_and(|stat| stat.attempts > 0 && stat.correct == 0)
        })
        .map(|(index, question)| UnsolvedQuestion {
            index,
            question: question.question.clone(),
            options: question.options.clone(),
            correct_answer: Some(question.answer.clone()),
        })
        .collect();
}

#[async_trait]
impl StudyBackend for InMemoryBackend {
    async fn upload_material(&self, request: UploadRequest) -> Result<StudyMaterial, GatewayError> {
        let mut state = self.lock()?;
        state.begin("upload_material")?;

        let mut material = state.template.clone();
        match request.source {
            UploadSource::Pdf { file_name, bytes } => {
                if bytes.is_empty() {
                    return Err(GatewayError::InvalidRequest(format!("{file_name} is empty")));
                }
                material.source_type = SourceType::Pdf;
                material.source_name = Some(file_name);
            }
            UploadSource::Text(text) => {
                if text.trim().is_empty() {
                    return Err(GatewayError::Backend("No PDF or text received.".into()));
                }
                material.source_type = SourceType::Text;
                material.source_name = request.topic.clone();
            }
        }

        // Only materials uploaded on behalf of a user are stored.
        material.material_id = None;
        if let Some(owner) = request.user_id {
            let id = MaterialId::new(format!("mem-{}", state.next_id))
                .map_err(|e| GatewayError::Backend(e.to_string()))?;
            state.next_id += 1;
            material.material_id = Some(id.clone());
            state.materials.insert(
                id,
                StoredMaterial {
                    owner,
                    material: material.clone(),
                    per_question: BTreeMap::new(),
                    history: Vec::new(),
                    last_unsolved: Vec::new(),
                },
            );
        }
        Ok(material)
    }

    async fn ask_question(&self, context: &str, question: &str) -> Result<String, GatewayError> {
        self.lock()?.begin("ask_question")?;
        if question.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("the question is empty".into()));
        }
        let excerpt: String = context.chars().take(80).collect();
        Ok(format!("From your notes: {excerpt}"))
    }

    async fn recommend_videos(&self, query: &VideoQuery) -> Result<Vec<Video>, GatewayError> {
        let mut state = self.lock()?;
        state.begin("recommend_videos")?;
        Ok(state.videos.iter().take(query.max_results).cloned().collect())
    }

    async fn mindmap(&self, request: &MindmapRequest) -> Result<Mindmap, GatewayError> {
        let mut state = self.lock()?;
        state.begin("mindmap")?;
        if let Some(mindmap) = &state.mindmap {
            return Ok(mindmap.clone());
        }
        let root = request
            .key_topics
            .first()
            .cloned()
            .ok_or_else(|| GatewayError::Backend("No topics to map".into()))?;
        Ok(Mindmap {
            topic: root.clone(),
            structure: MindmapStructure {
                root,
                topics: request.key_topics.clone(),
                points_by_topic: BTreeMap::new(),
            },
            ..Mindmap::default()
        })
    }

    async fn mock_test(&self, request: &MockTestRequest) -> Result<MockTest, GatewayError> {
        self.lock()?.begin("mock_test")?;
        let mut questions = Vec::new();
        for pattern in &request.pattern {
            for n in 0..pattern.count {
                let prompt = request
                    .key_points
                    .get(questions.len() % request.key_points.len().max(1))
                    .map_or("the material", String::as_str);
                questions.push(MockQuestion {
                    question: format!("Q{} ({} marks): explain {prompt}", n + 1, pattern.marks),
                    marks: pattern.marks,
                    answer: None,
                });
            }
        }
        Ok(MockTest {
            title: request.topic.clone().unwrap_or_else(|| "Mock test".into()),
            total_marks: questions.iter().map(|q| q.marks).fold(0, u32::saturating_add),
            total_questions: u32::try_from(questions.len()).unwrap_or(u32::MAX),
            questions,
        })
    }

    async fn submit_quiz(
        &self,
        submission: &QuizSubmission,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let mut state = self.lock()?;
        state.begin("submit_quiz")?;
        let now = state.clock.now();
        state.owned(&submission.user_id, &submission.material_id)?;
        let stored = state
            .materials
            .get_mut(&submission.material_id)
            .ok_or_else(|| GatewayError::Backend("Material not found".into()))?;

        let quiz_len = stored.material.quiz.len();
        if submission.answers.indices().iter().all(|index| *index >= quiz_len) {
            return Err(GatewayError::Backend("No valid question indices".into()));
        }

        for (index, selected) in submission.answers.iter() {
            let Some(question) = stored.material.quiz.get(index) else {
                continue;
            };
            let stat = stored.per_question.entry(index).or_default();
            stat.attempts += 1;
            match selected {
                None => stat.skipped += 1,
                Some(choice) if question.is_correct(choice) => stat.correct += 1,
                Some(_) => {}
            }
        }

        let (correct, wrong, skipped) = submission.answers.tally(&stored.material.quiz);
        let number = u32::try_from(stored.history.len() + 1).unwrap_or(u32::MAX);
        let attempt = AttemptRecord::from_counts(
            number,
            submission.material_id.clone(),
            now,
            correct,
            wrong,
            skipped,
        )
        .with_mode(submission.mode);
        stored.history.push(attempt.clone());
        rebuild_last_unsolved(stored);

        Ok(SubmissionReceipt {
            attempt,
            stats: stored.snapshot(),
        })
    }

    async fn revision_quiz(
        &self,
        user_id: &UserId,
        material_id: &MaterialId,
        limit: usize,
    ) -> Result<RevisionQuiz, GatewayError> {
        let mut state = self.lock()?;
        state.begin("revision_quiz")?;
        let stored = state.owned(user_id, material_id)?;
        let quiz = &stored.material.quiz;
        let indices = revision_candidates(&stored.per_question, quiz.len(), limit);
        Ok(RevisionQuiz {
            questions: indices.iter().map(|&index| quiz[index].clone()).collect(),
            indices,
            stats: stored.snapshot(),
        })
    }

    async fn dashboard_overview(&self, user_id: &UserId) -> Result<DashboardOverview, GatewayError> {
        let mut state = self.lock()?;
        state.begin("dashboard_overview")?;

        let materials: Vec<MaterialOverview> = state
            .materials
            .iter()
            .filter(|(_, stored)| &stored.owner == user_id && !stored.history.is_empty())
            .map(|(id, stored)| {
                let stats = compute_overall_stats(&stored.history);
                MaterialOverview {
                    material_id: id.clone(),
                    total_attempts: u32::try_from(stats.total_attempts).unwrap_or(u32::MAX),
                    avg_accuracy_pct: percent(stats.avg_accuracy),
                    last_attempt_at: stored.history.iter().map(|a| a.created_at).max(),
                }
            })
            .collect();
        let all = compute_overall_stats(&state.attempts_for(user_id));

        Ok(DashboardOverview {
            total_materials: u32::try_from(materials.len()).unwrap_or(u32::MAX),
            total_attempts: u32::try_from(all.total_attempts).unwrap_or(u32::MAX),
            avg_accuracy_pct: percent(all.avg_accuracy),
            materials,
        })
    }

    async fn user_dashboard(&self, user_id: &UserId) -> Result<UserDashboard, GatewayError> {
        let mut state = self.lock()?;
        state.begin("user_dashboard")?;

        let attempts = state.attempts_for(user_id);
        let stats = compute_overall_stats(&attempts);
        let distinct: BTreeSet<&MaterialId> = attempts.iter().map(|a| &a.material_id).collect();
        let by_date = compute_daily_trend(&attempts)
            .into_iter()
            .map(|day| DailyActivity {
                date: day.date,
                attempts: u32::try_from(day.attempts_count).unwrap_or(u32::MAX),
                avg_score: day.avg_score,
                avg_accuracy_pct: percent(day.avg_accuracy),
            })
            .collect();

        Ok(UserDashboard {
            summary: UserSummary {
                total_attempts: u32::try_from(stats.total_attempts).unwrap_or(u32::MAX),
                distinct_materials: u32::try_from(distinct.len()).unwrap_or(u32::MAX),
                overall_accuracy_pct: percent(stats.overall_accuracy()),
                avg_score: stats.avg_score,
                avg_accuracy_pct: percent(stats.avg_accuracy),
                best_score: f64::from(stats.best_score),
                best_accuracy_pct: percent(stats.best_accuracy()),
            },
            attempts,
            by_date,
        })
    }

    async fn material_dashboard(
        &self,
        user_id: &UserId,
        material_id: &MaterialId,
    ) -> Result<MaterialDashboard, GatewayError> {
        let mut state = self.lock()?;
        state.begin("material_dashboard")?;
        let stored = state.owned(user_id, material_id)?;
        Ok(MaterialDashboard {
            material_id: material_id.clone(),
            topic: stored.material.key_topics.first().cloned(),
            source_name: stored.material.source_name.clone(),
            stats: stored.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::{AnswerSheet, AttemptMode, QuizQuestion};
    use study_core::time::fixed_clock;

    fn template() -> StudyMaterial {
        let question = |q: &str, answer: &str| QuizQuestion {
            question: q.into(),
            options: vec!["a".into(), "b".into()],
            answer: answer.into(),
            explanation: None,
        };
        StudyMaterial {
            summary: "Cells".into(),
            key_topics: vec!["Biology".into()],
            quiz: vec![question("Q1", "a"), question("Q2", "b"), question("Q3", "a")],
            ..StudyMaterial::default()
        }
    }

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    async fn upload(backend: &InMemoryBackend) -> MaterialId {
        backend
            .upload_material(UploadRequest {
                source: UploadSource::Pdf {
                    file_name: "cells.pdf".into(),
                    bytes: vec![1, 2, 3],
                },
                user_id: Some(user()),
                topic: None,
            })
            .await
            .unwrap()
            .material_id
            .unwrap()
    }

    fn submission(material_id: &MaterialId, picks: &[(usize, &str)]) -> QuizSubmission {
        let mut answers = AnswerSheet::for_indices(0..3);
        for (index, choice) in picks {
            answers.select(*index, *choice);
        }
        QuizSubmission {
            user_id: user(),
            material_id: material_id.clone(),
            answers,
            mode: AttemptMode::Normal,
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn anonymous_uploads_are_not_tracked() {
        let backend = InMemoryBackend::new(template(), fixed_clock());
        let material = backend
            .upload_material(UploadRequest {
                source: UploadSource::Text("some notes".into()),
                user_id: None,
                topic: Some("Cells".into()),
            })
            .await
            .unwrap();
        assert!(material.material_id.is_none());
        assert_eq!(material.source_type, SourceType::Text);
        assert_eq!(material.source_name.as_deref(), Some("Cells"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn submissions_are_graded_and_accumulated() {
        let backend = InMemoryBackend::new(template(), fixed_clock());
        let id = upload(&backend).await;

        let first = backend
            .submit_quiz(&submission(&id, &[(0, "a"), (1, "a")]))
            .await
            .unwrap();
        assert_eq!(
            (first.attempt.correct, first.attempt.wrong, first.attempt.skipped),
            (1, 1, 1)
        );
        assert_eq!(first.attempt.attempt_number, 1);
        assert_eq!(first.stats.last_unsolved.len(), 2);

        backend.advance_clock(Duration::days(1)).unwrap();
        let second = backend
            .submit_quiz(&submission(&id, &[(0, "a"), (1, "b"), (2, "a")]))
            .await
            .unwrap();
        assert_eq!(second.attempt.attempt_number, 2);
        assert_eq!(second.stats.history.len(), 2);
        assert_eq!(second.stats.per_question[&1], PerQuestionStat::new(2, 1, 0));
        assert!(second.stats.last_unsolved.is_empty());

        let dashboard = backend.user_dashboard(&user()).await.unwrap();
        assert_eq!(dashboard.summary.total_attempts, 2);
        assert_eq!(dashboard.summary.distinct_materials, 1);
        assert_eq!(dashboard.by_date.len(), 2);
        assert!((dashboard.summary.best_accuracy_pct - 100.0).abs() < 1e-9);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn revision_picks_struggling_questions() {
        let backend = InMemoryBackend::new(template(), fixed_clock());
        let id = upload(&backend).await;
        backend
            .submit_quiz(&submission(&id, &[(0, "a"), (1, "a")]))
            .await
            .unwrap();

        let revision = backend.revision_quiz(&user(), &id, 10).await.unwrap();
        assert_eq!(revision.indices, vec![1, 2]);
        assert_eq!(revision.questions[0].question, "Q2");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn other_users_cannot_read_a_material() {
        let backend = InMemoryBackend::new(template(), fixed_clock());
        let id = upload(&backend).await;
        let stranger = UserId::new("u2").unwrap();
        let err = backend.material_dashboard(&stranger, &id).await.unwrap_err();
        assert_eq!(err.to_string(), "Material not found");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn scripted_failure_applies_once() {
        let backend = InMemoryBackend::default();
        backend.fail_next("quota exceeded").unwrap();
        assert!(backend.dashboard_overview(&user()).await.is_err());
        let overview = backend.dashboard_overview(&user()).await.unwrap();
        assert!(overview.materials.is_empty());
        assert_eq!(
            backend.calls().unwrap(),
            vec!["dashboard_overview", "dashboard_overview"]
        );
    }
}
