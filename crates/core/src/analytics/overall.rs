use crate::model::AttemptRecord;

/// Headline numbers across a material's (or user's) attempt history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverallStats {
    /// Every record in the history, including ones where nothing was answered.
    pub total_attempts: usize,
    /// Records with `attempted > 0`; the denominator for both averages.
    pub scored_attempts: usize,
    pub avg_score: f64,
    /// Mean of per-attempt accuracy, in `[0, 1]` for well-formed input.
    pub avg_accuracy: f64,
    /// `correct` of the most accurate attempt.
    pub best_score: u32,
    /// `attempted` of the most accurate attempt.
    pub best_base: u32,
    pub total_correct: u64,
    pub total_attempted: u64,
    pub last_attempt: Option<AttemptRecord>,
}

impl OverallStats {
    /// Best attempt's accuracy, 0 when no attempt was scored.
    #[must_use]
    pub fn best_accuracy(&self) -> f64 {
        ratio(u64::from(self.best_score), u64::from(self.best_base))
    }

    /// Pooled accuracy: every answered question weighted equally.
    #[must_use]
    pub fn overall_accuracy(&self) -> f64 {
        ratio(self.total_correct, self.total_attempted)
    }
}

/// Summarise an attempt history.
///
/// Attempts where nothing was answered are counted in `total_attempts` but
/// contribute nothing to the averages or the best attempt.
#[must_use]
pub fn compute_overall_stats(history: &[AttemptRecord]) -> OverallStats {
    let mut scored = 0_usize;
    let mut total_score = 0_u64;
    let mut total_accuracy = 0.0_f64;
    let mut total_correct = 0_u64;
    let mut total_attempted = 0_u64;
    let mut best: Option<(f64, u32, u32)> = None;

    for record in history {
        let Some(accuracy) = record.accuracy() else {
            continue;
        };
        scored += 1;
        total_score += u64::from(record.correct);
        total_accuracy += accuracy;
        total_correct += u64::from(record.correct);
        total_attempted += u64::from(record.attempted);

        if best.is_none_or(|(best_accuracy, _, _)| accuracy > best_accuracy) {
            best = Some((accuracy, record.correct, record.attempted));
        }
    }

    let (avg_score, avg_accuracy) = if scored == 0 {
        (0.0, 0.0)
    } else {
        #[allow(clippy::cast_precision_loss)]
        let denominator = scored as f64;
        #[allow(clippy::cast_precision_loss)]
        let score = total_score as f64 / denominator;
        (score, total_accuracy / denominator)
    };
    let (best_score, best_base) = best.map_or((0, 0), |(_, correct, base)| (correct, base));

    OverallStats {
        total_attempts: history.len(),
        scored_attempts: scored,
        avg_score,
        avg_accuracy,
        best_score,
        best_base,
        total_correct,
        total_attempted,
        last_attempt: history.last().cloned(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, base: u64) -> f64 {
    if base == 0 {
        return 0.0;
    }
    part as f64 / base as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::attempt;

    #[test]
    fn empty_history_is_all_zero() {
        let stats = compute_overall_stats(&[]);
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.scored_attempts, 0);
        assert!(stats.avg_score.abs() < f64::EPSILON);
        assert!(stats.avg_accuracy.abs() < f64::EPSILON);
        assert!(!stats.avg_accuracy.is_nan());
        assert_eq!((stats.best_score, stats.best_base), (0, 0));
        assert_eq!(stats.total_correct, 0);
        assert!(stats.last_attempt.is_none());
        assert!(stats.best_accuracy().abs() < f64::EPSILON);
    }

    #[test]
    fn single_attempt_reports_its_accuracy_and_best() {
        let history = vec![attempt(1, 8, 1, 1)];
        let stats = compute_overall_stats(&history);
        assert!((stats.avg_accuracy - 8.0 / 9.0).abs() < 1e-9);
        assert!((stats.avg_score - 8.0).abs() < 1e-9);
        assert_eq!(stats.best_score, 8);
        assert_eq!(stats.best_base, 9);
        assert_eq!(stats.last_attempt.as_ref().map(|a| a.attempt_number), Some(1));
    }

    #[test]
    fn unanswered_attempt_is_excluded_from_averages() {
        let history = vec![attempt(1, 3, 1, 0), attempt(2, 0, 0, 4), attempt(3, 1, 1, 2)];
        let stats = compute_overall_stats(&history);

        let expected = (3.0 / 4.0 + 1.0 / 2.0) / 2.0;
        assert!((stats.avg_accuracy - expected).abs() < 1e-9);
        assert!((stats.avg_score - 2.0).abs() < 1e-9);
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.scored_attempts, 2);
        assert_eq!(stats.total_correct, 4);
        assert_eq!(stats.total_attempted, 6);
        assert_eq!(stats.last_attempt.map(|a| a.attempt_number), Some(3));
    }

    #[test]
    fn best_attempt_ties_keep_the_earliest() {
        let history = vec![attempt(1, 1, 1, 0), attempt(2, 2, 2, 0), attempt(3, 3, 0, 0)];
        let stats = compute_overall_stats(&history);
        assert_eq!((stats.best_score, stats.best_base), (3, 3));

        let tied = vec![attempt(1, 1, 1, 0), attempt(2, 2, 2, 0)];
        let stats = compute_overall_stats(&tied);
        assert_eq!((stats.best_score, stats.best_base), (1, 2));
    }

    #[test]
    fn avg_accuracy_stays_in_unit_range() {
        let history = vec![
            attempt(1, 0, 5, 0),
            attempt(2, 5, 0, 0),
            attempt(3, 2, 3, 5),
            attempt(4, 0, 0, 0),
        ];
        let stats = compute_overall_stats(&history);
        assert!((0.0..=1.0).contains(&stats.avg_accuracy));
        assert!((stats.overall_accuracy() - 7.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let history = vec![attempt(1, 4, 2, 1), attempt(2, 6, 0, 1)];
        assert_eq!(compute_overall_stats(&history), compute_overall_stats(&history));
    }
}
