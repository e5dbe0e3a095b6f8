use std::collections::BTreeMap;

use crate::model::QuizQuestion;

/// Answers picked during one quiz run, keyed by question index.
///
/// Every question in the run has an entry; `None` means it was skipped. This
/// is the `answers` payload the quiz-performance endpoint grades.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<usize, Option<String>>,
}

impl AnswerSheet {
    /// An empty sheet covering the given question indices.
    #[must_use]
    pub fn for_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            answers: indices.into_iter().map(|idx| (idx, None)).collect(),
        }
    }

    /// Record a selection. Indices outside the sheet are ignored.
    pub fn select(&mut self, index: usize, option: impl Into<String>) {
        if let Some(slot) = self.answers.get_mut(&index) {
            *slot = Some(option.into());
        }
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.answers.get_mut(&index) {
            *slot = None;
        }
    }

    #[must_use]
    pub fn selected(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).and_then(|slot| slot.as_deref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|slot| slot.is_some()).count()
    }

    /// Indices with no selection, ascending.
    #[must_use]
    pub fn unsolved_questions(&self) -> Vec<usize> {
        self.answers
            .iter()
            .filter(|(_, slot)| slot.is_none())
            .map(|(idx, _)| *idx)
            .collect()
    }

    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.answers.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<&str>)> {
        self.answers
            .iter()
            .map(|(idx, slot)| (*idx, slot.as_deref()))
    }

    /// Local `(correct, wrong, skipped)` tally against the quiz's answer key.
    /// Indices without a matching question count as skipped.
    #[must_use]
    pub fn tally(&self, quiz: &[QuizQuestion]) -> (u32, u32, u32) {
        let mut correct = 0_u32;
        let mut wrong = 0_u32;
        let mut skipped = 0_u32;
        for (idx, selected) in self.iter() {
            match (selected, quiz.get(idx)) {
                (Some(choice), Some(question)) if question.is_correct(choice) => {
                    correct = correct.saturating_add(1);
                }
                (Some(_), Some(_)) => wrong = wrong.saturating_add(1),
                _ => skipped = skipped.saturating_add(1),
            }
        }
        (correct, wrong, skipped)
    }
}
