use std::sync::Arc;

use study_core::analytics::{
    AttemptTrendPoint, DEFAULT_REVISION_LIMIT, DEFAULT_WEAK_QUESTIONS, DailyTrendPoint,
    OverallStats, QuizReport, compute_attempt_trend, compute_daily_trend, compute_overall_stats,
};
use study_core::model::{MaterialId, QuizQuestion, QuizStatsSnapshot, UserId};

use crate::error::GatewayError;
use crate::gateway::{DashboardOverview, MaterialDashboard, StudyBackend, UserDashboard};

/// Everything the user dashboard shows.
///
/// `overall`, `daily` and `attempts` are recomputed from the raw attempt
/// rows so they follow the same rules as the per-material report; the
/// backend's own summary is kept alongside for the headline tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct UserReport {
    pub dashboard: UserDashboard,
    pub overall: OverallStats,
    pub daily: Vec<DailyTrendPoint>,
    pub attempts: Vec<AttemptTrendPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialReport {
    pub dashboard: MaterialDashboard,
    pub report: QuizReport,
}

impl MaterialReport {
    /// Heading for the report: topic, then file name, then the id.
    #[must_use]
    pub fn title(&self) -> String {
        self.dashboard
            .topic
            .clone()
            .or_else(|| self.dashboard.source_name.clone())
            .unwrap_or_else(|| self.dashboard.material_id.to_string())
    }
}

/// Loads dashboards and runs the analytics over them.
#[derive(Clone)]
pub struct DashboardService {
    user_id: UserId,
    backend: Arc<dyn StudyBackend>,
}

impl DashboardService {
    #[must_use]
    pub fn new(user_id: UserId, backend: Arc<dyn StudyBackend>) -> Self {
        Self { user_id, backend }
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the call fails.
    pub async fn overview(&self) -> Result<DashboardOverview, GatewayError> {
        self.backend.dashboard_overview(&self.user_id).await
    }

    /// # Errors
    ///
    /// Returns `GatewayError` if the call fails.
    pub async fn user_report(&self) -> Result<UserReport, GatewayError> {
        let dashboard = self.backend.user_dashboard(&self.user_id).await?;
        Ok(UserReport {
            overall: compute_overall_stats(&dashboard.attempts),
            daily: compute_daily_trend(&dashboard.attempts),
            attempts: compute_attempt_trend(&dashboard.attempts),
            dashboard,
        })
    }

    /// Stats for one material.
    ///
    /// `quiz` is the material's full question list when it is loaded. Without
    /// it, question text comes from the unsolved list and other questions get
    /// a numbered placeholder.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the call fails.
    pub async fn material_report(
        &self,
        material_id: &MaterialId,
        quiz: Option<&[QuizQuestion]>,
    ) -> Result<MaterialReport, GatewayError> {
        let dashboard = self
            .backend
            .material_dashboard(&self.user_id, material_id)
            .await?;
        let fallback;
        let questions = match quiz {
            Some(quiz) if !quiz.is_empty() => quiz,
            _ => {
                fallback = placeholder_quiz(&dashboard.stats);
                fallback.as_slice()
            }
        };
        let report = QuizReport::build(
            &dashboard.stats,
            questions,
            DEFAULT_WEAK_QUESTIONS,
            DEFAULT_REVISION_LIMIT,
        );
        Ok(MaterialReport { dashboard, report })
    }
}

fn placeholder_quiz(stats: &QuizStatsSnapshot) -> Vec<QuizQuestion> {
    let len = stats
        .per_question
        .keys()
        .copied()
        .chain(stats.last_unsolved.iter().map(|q| q.index))
        .max()
        .map_or(0, |max| max + 1);
    let mut quiz: Vec<QuizQuestion> = (0..len)
        .map(|index| QuizQuestion {
            question: format!("Question {}", index + 1),
            ..QuizQuestion::default()
        })
        .collect();
    for unsolved in &stats.last_unsolved {
        if let Some(slot) = quiz.get_mut(unsolved.index) {
            slot.question.clone_from(&unsolved.question);
            slot.options.clone_from(&unsolved.options);
            slot.answer = unsolved.correct_answer.clone().unwrap_or_default();
        }
    }
    quiz
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use study_core::model::{PerQuestionStat, UnsolvedQuestion};

    #[test]
    fn placeholder_quiz_covers_every_known_index() {
        let mut per_question = BTreeMap::new();
        per_question.insert(0, PerQuestionStat::new(2, 2, 0));
        per_question.insert(3, PerQuestionStat::new(1, 0, 0));
        let stats = QuizStatsSnapshot {
            last_unsolved: vec![UnsolvedQuestion {
                index: 3,
                question: "What is ATP?".into(),
                options: vec!["Energy".into()],
                correct_answer: Some("Energy".into()),
            }],
            ..QuizStatsSnapshot::new(Vec::new(), per_question)
        };

        let quiz = placeholder_quiz(&stats);
        assert_eq!(quiz.len(), 4);
        assert_eq!(quiz[1].question, "Question 2");
        assert_eq!(quiz[3].question, "What is ATP?");
        assert_eq!(quiz[3].answer, "Energy");
    }

    #[test]
    fn placeholder_quiz_is_empty_without_stats() {
        assert!(placeholder_quiz(&QuizStatsSnapshot::default()).is_empty());
    }
}
