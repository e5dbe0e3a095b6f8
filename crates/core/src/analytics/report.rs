use crate::analytics::{
    AttemptTrendPoint, DailyTrendPoint, DonutBreakdown, OverallStats, WeakQuestion,
    compute_attempt_trend, compute_daily_trend, compute_donut_breakdown, compute_overall_stats,
    rank_weakest_questions, revision_candidates,
};
use crate::model::{QuizQuestion, QuizStatsSnapshot};

/// Everything the material dashboard renders, derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizReport {
    pub overall: OverallStats,
    /// Breakdown of the most recent attempt, if any.
    pub last_breakdown: Option<DonutBreakdown>,
    pub weakest: Vec<WeakQuestion>,
    pub daily: Vec<DailyTrendPoint>,
    pub attempts: Vec<AttemptTrendPoint>,
    pub revision_indices: Vec<usize>,
}

impl QuizReport {
    /// Run every aggregation over `snapshot`.
    #[must_use]
    pub fn build(
        snapshot: &QuizStatsSnapshot,
        quiz: &[QuizQuestion],
        top_n: usize,
        revision_limit: usize,
    ) -> Self {
        Self {
            overall: compute_overall_stats(&snapshot.history),
            last_breakdown: snapshot.last_attempt().map(compute_donut_breakdown),
            weakest: rank_weakest_questions(&snapshot.per_question, quiz, top_n),
            daily: compute_daily_trend(&snapshot.history),
            attempts: compute_attempt_trend(&snapshot.history),
            revision_indices: revision_candidates(&snapshot.per_question, quiz.len(), revision_limit),
        }
    }

    #[must_use]
    pub fn has_attempts(&self) -> bool {
        self.overall.total_attempts > 0
    }
}
