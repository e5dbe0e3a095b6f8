use crate::model::AttemptRecord;

/// Outcome split of a single attempt, for the donut chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DonutBreakdown {
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
    pub base: u32,
}

impl DonutBreakdown {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base == 0
    }
}

/// Take the outcome counters straight from one attempt; nothing is combined
/// across attempts.
#[must_use]
pub fn compute_donut_breakdown(attempt: &AttemptRecord) -> DonutBreakdown {
    DonutBreakdown {
        correct: attempt.correct,
        wrong: attempt.wrong,
        skipped: attempt.skipped,
        base: attempt
            .correct
            .saturating_add(attempt.wrong)
            .saturating_add(attempt.skipped),
    }
}
