use services::{Action, QuizRun, Remote};
use study_core::analytics::compute_donut_breakdown;
use study_core::model::AttemptMode;

use crate::vm::format::{percent_headline, share_width, width_style};
use crate::vm::stats_vm::{DonutVm, map_donut};

/// Local edits to a quiz run. Submission goes through the quiz service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Select { index: usize, option: String },
    Clear(usize),
    Close,
}

impl QuizIntent {
    #[must_use]
    pub fn into_action(self) -> Action {
        match self {
            QuizIntent::Select { index, option } => Action::OptionSelected { index, option },
            QuizIntent::Clear(index) => Action::OptionCleared(index),
            QuizIntent::Close => Action::QuizClosed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionState {
    Neutral,
    Selected,
    Correct,
    Incorrect,
}

impl OptionState {
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            OptionState::Neutral => "option",
            OptionState::Selected => "option selected",
            OptionState::Correct => "option correct",
            OptionState::Incorrect => "option incorrect",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizQuestionVm {
    pub index: usize,
    pub number_label: String,
    pub text: String,
    pub options: Vec<QuizOptionVm>,
    pub selected: Option<String>,
    /// Shown once the run is graded.
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizResultVm {
    pub score_str: String,
    pub accuracy_str: String,
    pub donut: DonutVm,
    pub unsolved_count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    pub heading: &'static str,
    pub progress_str: String,
    pub progress_style: String,
    pub questions: Vec<QuizQuestionVm>,
    pub can_submit: bool,
    pub is_submitting: bool,
    pub error: Option<String>,
    pub result: Option<QuizResultVm>,
}

impl From<&QuizRun> for QuizVm {
    fn from(run: &QuizRun) -> Self {
        let graded = matches!(run.result, Remote::Ready(_));
        let questions = run
            .questions
            .iter()
            .map(|item| {
                let selected = run.answers.selected(item.index);
                let options = item
                    .question
                    .options
                    .iter()
                    .map(|option| {
                        let is_selected = selected == Some(option.as_str());
                        let state = match (graded, is_selected) {
                            (true, _) if item.question.is_correct(option) => OptionState::Correct,
                            (true, true) => OptionState::Incorrect,
                            (false, true) => OptionState::Selected,
                            _ => OptionState::Neutral,
                        };
                        QuizOptionVm {
                            text: option.clone(),
                            state,
                        }
                    })
                    .collect();
                QuizQuestionVm {
                    index: item.index,
                    number_label: format!("Question {}", item.index + 1),
                    text: item.question.question.clone(),
                    options,
                    selected: selected.map(str::to_owned),
                    explanation: item.question.explanation.clone().filter(|_| graded),
                }
            })
            .collect();

        let total = run.answers.len();
        let answered = run.answers.answered_count();
        #[allow(clippy::cast_precision_loss)]
        let progress = share_width(answered as f64, total as f64);

        let result = run.result.ready().map(|receipt| {
            let attempt = &receipt.attempt;
            let breakdown = compute_donut_breakdown(attempt);
            QuizResultVm {
                score_str: format!("{}/{}", attempt.correct, breakdown.base),
                accuracy_str: percent_headline(attempt.accuracy().unwrap_or(0.0)),
                donut: map_donut(Some(&breakdown)),
                unsolved_count: receipt.stats.last_unsolved.len(),
            }
        });

        Self {
            heading: match run.mode {
                AttemptMode::Normal => "Quiz",
                AttemptMode::Revision => "Revision quiz",
            },
            progress_str: format!("{answered} of {total} answered"),
            progress_style: width_style(progress),
            questions,
            can_submit: run.is_open() && total > 0,
            is_submitting: run.result.is_loading(),
            error: run.result.error().map(str::to_owned),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use services::gateway::{RevisionQuiz, SubmissionReceipt};
    use study_core::model::{
        AttemptRecord, MaterialId, QuizQuestion, QuizStatsSnapshot, StudyMaterial,
    };
    use study_core::time::fixed_now;

    fn material() -> StudyMaterial {
        let question = |text: &str| QuizQuestion {
            question: text.into(),
            options: vec!["yes".into(), "no".into()],
            answer: "yes".into(),
            explanation: Some("because".into()),
        };
        StudyMaterial {
            quiz: vec![question("Q1"), question("Q2")],
            ..StudyMaterial::default()
        }
    }

    #[test]
    fn open_run_shows_selection_and_progress() {
        let mut run = QuizRun::normal(&material());
        run.answers.select(0, "no");
        let vm = QuizVm::from(&run);
        assert_eq!(vm.heading, "Quiz");
        assert_eq!(vm.progress_str, "1 of 2 answered");
        assert_eq!(vm.progress_style, "width: 50.0%");
        assert_eq!(vm.questions[0].options[1].state, OptionState::Selected);
        assert_eq!(vm.questions[0].explanation, None);
        assert!(vm.can_submit);
        assert!(vm.result.is_none());
    }

    #[test]
    fn graded_run_marks_options() {
        let mut run = QuizRun::normal(&material());
        run.answers.select(0, "no");
        let attempt =
            AttemptRecord::from_counts(1, MaterialId::new("m-1").unwrap(), fixed_now(), 0, 1, 1);
        run.result = Remote::Ready(SubmissionReceipt {
            attempt: attempt.clone(),
            stats: QuizStatsSnapshot::new(vec![attempt], BTreeMap::new()),
        });

        let vm = QuizVm::from(&run);
        let states: Vec<OptionState> = vm.questions[0].options.iter().map(|o| o.state).collect();
        assert_eq!(states, vec![OptionState::Correct, OptionState::Incorrect]);
        assert_eq!(vm.questions[1].options[0].state, OptionState::Correct);
        assert_eq!(vm.questions[0].explanation.as_deref(), Some("because"));
        assert!(!vm.can_submit);
        let result = vm.result.unwrap();
        assert_eq!(result.score_str, "0/2");
        assert_eq!(result.accuracy_str, "0%");
    }

    #[test]
    fn revision_run_numbers_by_original_index() {
        let run = QuizRun::revision(&RevisionQuiz {
            questions: vec![material().quiz[1].clone()],
            indices: vec![1],
            stats: QuizStatsSnapshot::default(),
        });
        let vm = QuizVm::from(&run);
        assert_eq!(vm.heading, "Revision quiz");
        assert_eq!(vm.questions[0].number_label, "Question 2");
    }

    #[test]
    fn intents_map_to_actions() {
        assert_eq!(
            QuizIntent::Select {
                index: 1,
                option: "no".into()
            }
            .into_action(),
            Action::OptionSelected {
                index: 1,
                option: "no".into()
            }
        );
        assert_eq!(QuizIntent::Clear(1).into_action(), Action::OptionCleared(1));
        assert_eq!(QuizIntent::Close.into_action(), Action::QuizClosed);
    }
}
