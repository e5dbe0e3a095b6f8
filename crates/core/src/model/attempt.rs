use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::MaterialId;

//
// ─── ATTEMPT MODE ─────────────────────────────────────────────────────────────
//

/// Which quiz produced an attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptMode {
    /// The full quiz of a material.
    #[default]
    Normal,
    /// A revision quiz made of previously missed questions.
    Revision,
}

impl AttemptMode {
    /// Lenient parse of the backend's mode tag. Anything unrecognised is `Normal`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("revision") {
            Self::Revision
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AttemptMode::Normal => "normal",
            AttemptMode::Revision => "revision",
        }
    }
}

//
// ─── ATTEMPT RECORD ───────────────────────────────────────────────────────────
//

/// One completed quiz submission, as recorded by the quiz-performance backend.
///
/// Records are created server-side and are read-only here. The counters are
/// expected to satisfy `correct + wrong + skipped == total_questions` and
/// `correct + wrong == attempted`; [`AttemptRecord::is_consistent`] reports
/// whether they do, but nothing in the client rejects a record that doesn't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt_number: u32,
    pub material_id: MaterialId,
    pub created_at: DateTime<Utc>,
    pub mode: AttemptMode,
    pub total_questions: u32,
    pub attempted: u32,
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
}

impl AttemptRecord {
    /// Build a record from the three outcome counters, deriving
    /// `attempted` and `total_questions`.
    #[must_use]
    pub fn from_counts(
        attempt_number: u32,
        material_id: MaterialId,
        created_at: DateTime<Utc>,
        correct: u32,
        wrong: u32,
        skipped: u32,
    ) -> Self {
        let attempted = correct.saturating_add(wrong);
        Self {
            attempt_number,
            material_id,
            created_at,
            mode: AttemptMode::Normal,
            total_questions: attempted.saturating_add(skipped),
            attempted,
            correct,
            wrong,
            skipped,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: AttemptMode) -> Self {
        self.mode = mode;
        self
    }

    /// `correct / attempted`, or `None` when nothing was answered.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        if self.attempted == 0 {
            return None;
        }
        Some(f64::from(self.correct) / f64::from(self.attempted))
    }

    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let answered = u64::from(self.correct) + u64::from(self.wrong);
        answered == u64::from(self.attempted)
            && answered + u64::from(self.skipped) == u64::from(self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn material() -> MaterialId {
        MaterialId::new("m-1").unwrap()
    }

    #[test]
    fn from_counts_derives_totals() {
        let record = AttemptRecord::from_counts(1, material(), fixed_now(), 8, 1, 1);
        assert_eq!(record.attempted, 9);
        assert_eq!(record.total_questions, 10);
        assert!(record.is_consistent());
        assert_eq!(record.mode, AttemptMode::Normal);
    }

    #[test]
    fn accuracy_is_none_when_nothing_answered() {
        let record = AttemptRecord::from_counts(1, material(), fixed_now(), 0, 0, 5);
        assert_eq!(record.accuracy(), None);
    }

    #[test]
    fn inconsistent_counters_are_reported_not_rejected() {
        let mut record = AttemptRecord::from_counts(2, material(), fixed_now(), 3, 1, 0);
        record.attempted = 7;
        assert!(!record.is_consistent());
        assert_eq!(record.accuracy(), Some(3.0 / 7.0));
    }

    #[test]
    fn mode_tag_parsing_is_lenient() {
        assert_eq!(AttemptMode::from_tag("Revision"), AttemptMode::Revision);
        assert_eq!(AttemptMode::from_tag("quiz"), AttemptMode::Normal);
        assert_eq!(AttemptMode::from_tag(""), AttemptMode::Normal);
    }
}
