use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::{PerQuestionStat, QuizQuestion};

/// How many weak questions the dashboard shows by default.
pub const DEFAULT_WEAK_QUESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct WeakQuestion {
    pub index: usize,
    pub attempts: u32,
    pub correct: u32,
    pub skipped: u32,
    pub wrong: u32,
    pub accuracy: f64,
    pub question_text: String,
}

/// Rank the questions the user struggles with most.
///
/// Stats for indices the quiz no longer has are dropped. Order is accuracy
/// ascending, then attempts descending, then index ascending. Questions that
/// were only ever skipped have accuracy 0 and therefore come first.
#[must_use]
pub fn rank_weakest_questions(
    per_question: &BTreeMap<usize, PerQuestionStat>,
    quiz_questions: &[QuizQuestion],
    top_n: usize,
) -> Vec<WeakQuestion> {
    let mut ranked: Vec<WeakQuestion> = per_question
        .iter()
        .filter_map(|(&index, stat)| {
            let question = quiz_questions.get(index)?;
            Some(WeakQuestion {
                index,
                attempts: stat.attempts,
                correct: stat.correct,
                skipped: stat.skipped,
                wrong: stat.wrong(),
                accuracy: stat.accuracy(),
                question_text: question.question.clone(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.accuracy
            .partial_cmp(&b.accuracy)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.attempts.cmp(&a.attempts))
    });
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(len: usize) -> Vec<QuizQuestion> {
        (0..len)
            .map(|i| QuizQuestion {
                question: format!("Question {i}"),
                options: vec!["a".into(), "b".into()],
                answer: "a".into(),
                explanation: None,
            })
            .collect()
    }

    fn stats(entries: &[(usize, u32, u32, u32)]) -> BTreeMap<usize, PerQuestionStat> {
        entries
            .iter()
            .map(|&(idx, attempts, correct, skipped)| {
                (idx, PerQuestionStat::new(attempts, correct, skipped))
            })
            .collect()
    }

    #[test]
    fn top_one_returns_the_never_correct_question() {
        let per_question = stats(&[(0, 3, 0, 0), (1, 3, 3, 0)]);
        let ranked = rank_weakest_questions(&per_question, &quiz(2), 1);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 0);
        assert!(ranked[0].accuracy.abs() < f64::EPSILON);
        assert_eq!(ranked[0].wrong, 3);
        assert_eq!(ranked[0].question_text, "Question 0");
    }

    #[test]
    fn stale_indices_are_discarded() {
        let per_question = stats(&[(0, 2, 2, 0), (7, 5, 0, 0)]);
        let ranked = rank_weakest_questions(&per_question, &quiz(2), DEFAULT_WEAK_QUESTIONS);
        assert_eq!(ranked.iter().map(|w| w.index).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn ties_prefer_more_attempts_then_lower_index() {
        let per_question = stats(&[(0, 2, 1, 0), (1, 4, 2, 0), (2, 4, 2, 0), (3, 4, 4, 0)]);
        let ranked = rank_weakest_questions(&per_question, &quiz(4), 10);
        assert_eq!(
            ranked.iter().map(|w| w.index).collect::<Vec<_>>(),
            vec![1, 2, 0, 3]
        );
    }

    #[test]
    fn output_is_bounded_and_sorted() {
        let per_question = stats(&[
            (0, 5, 4, 0),
            (1, 5, 1, 1),
            (2, 2, 0, 2),
            (3, 6, 3, 0),
            (4, 1, 1, 0),
        ]);
        let ranked = rank_weakest_questions(&per_question, &quiz(5), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].index, 2);
        for pair in ranked.windows(2) {
            assert!(pair[0].accuracy <= pair[1].accuracy);
            if (pair[0].accuracy - pair[1].accuracy).abs() < f64::EPSILON {
                assert!(pair[0].attempts >= pair[1].attempts);
            }
        }
    }

    #[test]
    fn negative_wrong_is_clamped() {
        let per_question = stats(&[(0, 1, 1, 1)]);
        let ranked = rank_weakest_questions(&per_question, &quiz(1), 1);
        assert_eq!(ranked[0].wrong, 0);
        assert!((ranked[0].accuracy - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_top_n_is_empty() {
        let per_question = stats(&[(0, 1, 0, 0)]);
        assert!(rank_weakest_questions(&per_question, &quiz(1), 0).is_empty());
    }
}
