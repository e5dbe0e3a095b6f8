use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::{Action, Screen};
use study_core::model::{MaterialId, QuizQuestion};

use crate::context::{AppContext, use_store};
use crate::routes::Route;
use crate::views::charts::{Donut, ErrorPanel, StatCards, TrendChart, WeakQuestions};
use crate::views::quiz::start_revision;
use crate::views::{ViewError, ViewState, view_state_from_remote};
use crate::vm::{MaterialStatsVm, RevisionBannerVm};

#[component]
pub fn MaterialStatsView(material_id: String) -> Element {
    let Ok(id) = MaterialId::new(material_id.clone()) else {
        return rsx! {
            div { class: "page stats-page",
                ErrorPanel {
                    error: ViewError::Request("This material has no id.".to_string()),
                    on_retry: move |()| {},
                }
            }
        };
    };

    rsx! {
        MaterialStatsBody { key: "{material_id}", material_id: id }
    }
}

#[component]
fn MaterialStatsBody(material_id: MaterialId) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let dashboard = ctx.dashboard();

    let store_for_fetch = store.clone();
    let id_for_fetch = material_id.clone();
    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let mut store = store_for_fetch.clone();
        let material_id = id_for_fetch.clone();
        // Question texts are only known when the same material is loaded.
        let quiz: Option<Vec<QuizQuestion>> = store
            .peek()
            .current_material()
            .filter(|material| material.material_id.as_ref() == Some(&material_id))
            .map(|material| material.quiz.clone());
        async move {
            store
                .fetch(Screen::MaterialStats, async move {
                    match dashboard.material_report(&material_id, quiz.as_deref()).await {
                        Ok(report) => Action::MaterialStatsLoaded(report),
                        Err(err) => Action::Failed(Screen::MaterialStats, err.to_string()),
                    }
                })
                .await;
        }
    });

    let snapshot = store.read();
    let is_current = snapshot
        .current_material()
        .and_then(|material| material.material_id.as_ref())
        == Some(&material_id);
    let state = view_state_from_remote(&snapshot.material_stats, |report| {
        MaterialStatsVm::from(report)
    });

    rsx! {
        div { class: "page stats-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(error) => rsx! {
                    ErrorPanel {
                        error,
                        on_retry: move |()| {
                            let mut resource = resource;
                            resource.restart();
                        },
                    }
                },
                ViewState::Ready(vm) => rsx! {
                    header { class: "view-header",
                        h2 { class: "view-title", "{vm.title}" }
                        p { class: "view-subtitle", "Quiz statistics for this material." }
                    }
                    div { class: "view-divider" }
                    StatCards { cards: vm.cards.clone() }
                    if let Some(banner) = vm.revision.clone() {
                        RevisionBanner { banner, can_start: is_current }
                    }
                    if vm.has_attempts {
                        div { class: "dashboard-grid",
                            section { class: "dashboard-card",
                                h3 { "Last attempt" }
                                Donut { donut: vm.last_donut.clone() }
                            }
                            WeakQuestions { rows: vm.weakest.clone() }
                            TrendChart {
                                title: "Score per attempt".to_string(),
                                bars: vm.attempts.clone(),
                                empty_message: "No attempts yet.".to_string(),
                            }
                            TrendChart {
                                title: "Accuracy by day".to_string(),
                                bars: vm.daily.clone(),
                                empty_message: "No daily activity yet.".to_string(),
                            }
                        }
                    } else {
                        p { class: "view-hint", "No attempts recorded for this material yet." }
                    }
                },
            }
        }
    }
}

#[component]
fn RevisionBanner(banner: RevisionBannerVm, can_start: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let navigator = use_navigator();

    rsx! {
        div { class: "revision-banner",
            p { "{banner.message}" }
            if can_start {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| {
                        start_revision(&store, &ctx.quiz());
                        let _ = navigator.push(Route::Quiz {});
                    },
                    "Start revision"
                }
            } else {
                p { class: "view-hint", "Open this material to start a revision quiz." }
            }
        }
    }
}
