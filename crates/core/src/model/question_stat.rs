use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::AttemptRecord;

/// Cumulative counters for one quiz question across every attempt of a material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerQuestionStat {
    pub attempts: u32,
    pub correct: u32,
    pub skipped: u32,
}

impl PerQuestionStat {
    #[must_use]
    pub fn new(attempts: u32, correct: u32, skipped: u32) -> Self {
        Self {
            attempts,
            correct,
            skipped,
        }
    }

    /// `attempts - correct - skipped`, floored at zero.
    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.attempts
            .saturating_sub(self.correct)
            .saturating_sub(self.skipped)
    }

    /// Times the question was actually answered (right or wrong).
    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct.saturating_add(self.wrong())
    }

    /// `correct / answered`; a question that was never answered scores 0.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        let answered = self.answered();
        if answered == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(answered)
    }
}

/// A question the user has seen but never answered correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsolvedQuestion {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: Option<String>,
}

/// Everything the analytics layer needs about one material's quiz.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizStatsSnapshot {
    /// Chronological, oldest first.
    pub history: Vec<AttemptRecord>,
    pub per_question: BTreeMap<usize, PerQuestionStat>,
    pub last_unsolved: Vec<UnsolvedQuestion>,
}

impl QuizStatsSnapshot {
    #[must_use]
    pub fn new(history: Vec<AttemptRecord>, per_question: BTreeMap<usize, PerQuestionStat>) -> Self {
        Self {
            history,
            per_question,
            last_unsolved: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.per_question.is_empty()
    }

    #[must_use]
    pub fn last_attempt(&self) -> Option<&AttemptRecord> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_is_clamped_at_zero() {
        let stat = PerQuestionStat::new(2, 2, 1);
        assert_eq!(stat.wrong(), 0);
        assert_eq!(stat.answered(), 2);
    }

    #[test]
    fn only_skipped_question_has_zero_accuracy() {
        let stat = PerQuestionStat::new(4, 0, 4);
        assert_eq!(stat.answered(), 0);
        assert!(stat.accuracy().abs() < f64::EPSILON);
    }

    #[test]
    fn accuracy_excludes_skips_from_denominator() {
        let stat = PerQuestionStat::new(5, 3, 1);
        assert_eq!(stat.wrong(), 1);
        assert!((stat.accuracy() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let stat: PerQuestionStat = serde_json::from_str(r#"{"attempts": 2}"#).unwrap();
        assert_eq!(stat, PerQuestionStat::new(2, 0, 0));
    }
}
