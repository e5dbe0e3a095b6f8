use chrono::{DateTime, NaiveDate, Utc};

use crate::model::AttemptRecord;

/// One bucket of the daily activity chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    /// Every attempt submitted that day.
    pub attempts_count: usize,
    pub avg_score: f64,
    pub avg_accuracy: f64,
}

/// One bar of the per-attempt chart.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptTrendPoint {
    pub attempt_number: u32,
    pub created_at: DateTime<Utc>,
    pub correct: u32,
    pub attempted: u32,
    /// 0 when nothing was answered.
    pub accuracy: f64,
}

#[derive(Default)]
struct DayAccumulator {
    attempts: usize,
    scored: usize,
    score: u64,
    accuracy: f64,
}

/// Group attempts by the UTC calendar date they were submitted on.
///
/// Buckets appear in order of first occurrence. Only attempts with
/// `attempted > 0` feed the averages, as in
/// [`compute_overall_stats`](crate::analytics::compute_overall_stats).
#[must_use]
pub fn compute_daily_trend(history: &[AttemptRecord]) -> Vec<DailyTrendPoint> {
    let mut days: Vec<(NaiveDate, DayAccumulator)> = Vec::new();

    for record in history {
        let date = record.created_at.date_naive();
        let slot = match days.iter().position(|(day, _)| *day == date) {
            Some(pos) => pos,
            None => {
                days.push((date, DayAccumulator::default()));
                days.len() - 1
            }
        };
        let acc = &mut days[slot].1;
        acc.attempts += 1;
        if let Some(accuracy) = record.accuracy() {
            acc.scored += 1;
            acc.score += u64::from(record.correct);
            acc.accuracy += accuracy;
        }
    }

    days.into_iter()
        .map(|(date, acc)| {
            #[allow(clippy::cast_precision_loss)]
            let (avg_score, avg_accuracy) = if acc.scored == 0 {
                (0.0, 0.0)
            } else {
                let n = acc.scored as f64;
                (acc.score as f64 / n, acc.accuracy / n)
            };
            DailyTrendPoint {
                date,
                attempts_count: acc.attempts,
                avg_score,
                avg_accuracy,
            }
        })
        .collect()
}

/// One point per attempt, in history order.
#[must_use]
pub fn compute_attempt_trend(history: &[AttemptRecord]) -> Vec<AttemptTrendPoint> {
    history
        .iter()
        .map(|record| AttemptTrendPoint {
            attempt_number: record.attempt_number,
            created_at: record.created_at,
            correct: record.correct,
            attempted: record.attempted,
            accuracy: record.accuracy().unwrap_or(0.0),
        })
        .collect()
}
