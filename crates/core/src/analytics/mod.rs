//! Pure aggregations over quiz attempt history and per-question statistics.
//!
//! Nothing here returns an error. Malformed counters are clamped and empty
//! inputs produce zeroed results.

mod donut;
mod overall;
mod report;
mod revision;
mod trend;
mod weak;

pub use donut::{DonutBreakdown, compute_donut_breakdown};
pub use overall::{OverallStats, compute_overall_stats};
pub use report::QuizReport;
pub use revision::{DEFAULT_REVISION_LIMIT, needs_revision, revision_candidates};
pub use trend::{AttemptTrendPoint, DailyTrendPoint, compute_attempt_trend, compute_daily_trend};
pub use weak::{DEFAULT_WEAK_QUESTIONS, WeakQuestion, rank_weakest_questions};

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, Utc};

    use crate::model::{AttemptRecord, MaterialId};
    use crate::time::fixed_now;

    /// Attempt `number` submitted `number` minutes after the fixed test instant.
    pub fn attempt(number: u32, correct: u32, wrong: u32, skipped: u32) -> AttemptRecord {
        attempt_at(
            number,
            fixed_now() + Duration::minutes(i64::from(number)),
            correct,
            wrong,
            skipped,
        )
    }

    pub fn attempt_at(
        number: u32,
        created_at: DateTime<Utc>,
        correct: u32,
        wrong: u32,
        skipped: u32,
    ) -> AttemptRecord {
        AttemptRecord::from_counts(
            number,
            MaterialId::new("material-1").expect("valid id"),
            created_at,
            correct,
            wrong,
            skipped,
        )
    }
}
