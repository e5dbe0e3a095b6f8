use std::collections::BTreeMap;

use crate::model::PerQuestionStat;

/// Default size of a revision quiz.
pub const DEFAULT_REVISION_LIMIT: usize = 10;

/// Whether a question belongs in a revision quiz: seen but never answered
/// correctly, or seen at least three times with under half of the
/// presentations correct. Skips count against the question here.
#[must_use]
pub fn needs_revision(stat: &PerQuestionStat) -> bool {
    if stat.attempts == 0 {
        return false;
    }
    if stat.correct == 0 {
        return true;
    }
    stat.attempts >= 3 && f64::from(stat.correct) / f64::from(stat.attempts) < 0.5
}

/// Indices a revision quiz would contain, ascending, at most `limit`.
/// Indices past the end of the quiz are dropped.
#[must_use]
pub fn revision_candidates(
    per_question: &BTreeMap<usize, PerQuestionStat>,
    quiz_len: usize,
    limit: usize,
) -> Vec<usize> {
    per_question
        .iter()
        .filter(|(index, stat)| **index < quiz_len && needs_revision(stat))
        .map(|(index, _)| *index)
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_questions_never_need_revision() {
        assert!(!needs_revision(&PerQuestionStat::default()));
    }

    #[test]
    fn never_correct_needs_revision_after_one_attempt() {
        assert!(needs_revision(&PerQuestionStat::new(1, 0, 1)));
    }

    #[test]
    fn low_accuracy_needs_three_attempts() {
        assert!(!needs_revision(&PerQuestionStat::new(2, 1, 0)));
        assert!(needs_revision(&PerQuestionStat::new(3, 1, 0)));
        assert!(!needs_revision(&PerQuestionStat::new(4, 2, 0)));
    }

    #[test]
    fn candidates_respect_quiz_length_and_limit() {
        let per_question: BTreeMap<usize, PerQuestionStat> = [
            (0, PerQuestionStat::new(1, 0, 0)),
            (1, PerQuestionStat::new(2, 2, 0)),
            (2, PerQuestionStat::new(3, 0, 3)),
            (3, PerQuestionStat::new(5, 1, 0)),
            (9, PerQuestionStat::new(1, 0, 0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(revision_candidates(&per_question, 4, 10), vec![0, 2, 3]);
        assert_eq!(revision_candidates(&per_question, 4, 2), vec![0, 2]);
        assert!(revision_candidates(&per_question, 0, 10).is_empty());
    }
}
