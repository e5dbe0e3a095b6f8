use std::sync::Arc;

use dioxus::prelude::*;
use dioxus_router::Link;
use services::{Action, QuizService, Screen};

use crate::context::{AppContext, StoreHandle, use_store};
use crate::routes::Route;
use crate::views::charts::Donut;
use crate::vm::{QuizIntent, QuizQuestionVm, QuizResultVm, QuizVm};

#[component]
pub fn QuizView() -> Element {
    let store = use_store();
    let snapshot = store.read();
    let revision_error = snapshot.revision.error().map(str::to_owned);

    let Some(run) = snapshot.quiz.as_ref() else {
        let message = if snapshot.revision.is_loading() {
            "Collecting the questions you missed..."
        } else if snapshot.revision.ready().is_some() {
            "Nothing needs revision right now. Nice work."
        } else {
            "No quiz in progress."
        };
        return rsx! {
            div { class: "page quiz-page",
                p { "{message}" }
                if let Some(error) = revision_error {
                    p { class: "form-error", "{error}" }
                }
                Link { class: "btn btn-secondary", to: Route::Material {}, "Back to material" }
            }
        };
    };

    let vm = QuizVm::from(run);

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "{vm.heading}" }
                p { class: "view-subtitle", "{vm.progress_str}" }
                div { class: "progress-track",
                    div { class: "progress-fill", style: "{vm.progress_style}" }
                }
            }
            div { class: "view-divider" }

            if let Some(result) = vm.result.clone() {
                QuizResult { result }
            }

            for question in vm.questions.iter() {
                QuestionCard { question: question.clone(), locked: !vm.can_submit }
            }

            if let Some(error) = vm.error.as_ref() {
                p { class: "form-error", "{error}" }
            }
            if let Some(error) = revision_error {
                p { class: "form-error", "{error}" }
            }
            QuizActions { can_submit: vm.can_submit, is_submitting: vm.is_submitting }
        }
    }
}

#[component]
fn QuestionCard(question: QuizQuestionVm, locked: bool) -> Element {
    let store = use_store();
    let index = question.index;

    rsx! {
        article { class: "quiz-question",
            span { class: "quiz-number", "{question.number_label}" }
            p { class: "quiz-text", "{question.text}" }
            div { class: "quiz-options",
                for option in question.options.iter() {
                    button {
                        class: option.state.class(),
                        r#type: "button",
                        disabled: locked,
                        onclick: {
                            let mut store = store.clone();
                            let text = option.text.clone();
                            let selected = question.selected.clone();
                            move |_| {
                                let intent = if selected.as_deref() == Some(text.as_str()) {
                                    QuizIntent::Clear(index)
                                } else {
                                    QuizIntent::Select { index, option: text.clone() }
                                };
                                store.dispatch(intent.into_action());
                            }
                        },
                        "{option.text}"
                    }
                }
            }
            if let Some(explanation) = question.explanation.as_ref() {
                p { class: "quiz-explanation", "{explanation}" }
            }
        }
    }
}

#[component]
fn QuizResult(result: QuizResultVm) -> Element {
    rsx! {
        section { class: "quiz-result",
            h3 { "Score {result.score_str} ({result.accuracy_str})" }
            Donut { donut: result.donut.clone() }
            if result.unsolved_count > 0 {
                p { class: "view-hint",
                    "{result.unsolved_count} question(s) have never been answered correctly."
                }
            }
        }
    }
}

#[component]
fn QuizActions(can_submit: bool, is_submitting: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let quiz = ctx.quiz();

    let submit = {
        let store = store.clone();
        let quiz = quiz.clone();
        move |_| {
            let snapshot = store.peek();
            let (Some(material), Some(run)) = (snapshot.current_material(), snapshot.quiz.as_ref())
            else {
                return;
            };
            let quiz = quiz.clone();
            let material = material.clone();
            let mode = run.mode;
            let answers = run.answers.clone();
            store.spawn_fetch(Screen::Submission, async move {
                match quiz.submit(&material, mode, answers).await {
                    Ok(receipt) => Action::SubmissionRecorded(receipt),
                    Err(err) => Action::Failed(Screen::Submission, err.to_string()),
                }
            });
        }
    };

    let revise = {
        let store = store.clone();
        move |_| start_revision(&store, &quiz)
    };

    let mut close_store = store;

    rsx! {
        div { class: "quiz-actions",
            if can_submit {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: is_submitting,
                    onclick: submit,
                    if is_submitting { "Submitting..." } else { "Submit answers" }
                }
            } else {
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: revise,
                    "Practise missed questions"
                }
            }
            button {
                class: "btn btn-ghost",
                r#type: "button",
                onclick: move |_| close_store.dispatch(QuizIntent::Close.into_action()),
                "Close quiz"
            }
        }
    }
}

/// Fetch a revision quiz for the loaded material; the quiz view picks it up.
pub(crate) fn start_revision(store: &StoreHandle, quiz: &Arc<QuizService>) {
    let Some(material) = store.peek().current_material().cloned() else {
        return;
    };
    let quiz = Arc::clone(quiz);
    store.spawn_fetch(Screen::Revision, async move {
        match quiz.revision(&material, None).await {
            Ok(revision) => Action::RevisionLoaded(revision),
            Err(err) => Action::Failed(Screen::Revision, err.to_string()),
        }
    });
}
