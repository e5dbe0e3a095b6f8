use dioxus::prelude::*;
use services::{Action, Screen};

use crate::context::{AppContext, use_store};
use crate::views::charts::{Donut, ErrorPanel, StatCards, TrendChart};
use crate::views::{ViewState, view_state_from_remote};
use crate::vm::UserDashboardVm;

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let dashboard = ctx.dashboard();

    let store_for_fetch = store.clone();
    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let mut store = store_for_fetch.clone();
        async move {
            store
                .fetch(Screen::UserDashboard, async move {
                    match dashboard.user_report().await {
                        Ok(report) => Action::UserDashboardLoaded(report),
                        Err(err) => Action::Failed(Screen::UserDashboard, err.to_string()),
                    }
                })
                .await;
        }
    });

    let snapshot = store.read();
    let state = view_state_from_remote(&snapshot.user_dashboard, |report| {
        UserDashboardVm::from(report)
    });

    rsx! {
        div { class: "page dashboard-page",
            header { class: "view-header",
                h2 { class: "view-title", "Progress" }
                p { class: "view-subtitle", "How your quiz attempts add up across every material." }
            }
            div { class: "view-divider" }
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
                    StatCards { cards: vm.cards.clone() }
                    if vm.has_attempts() {
                        div { class: "dashboard-grid",
                            section { class: "dashboard-card",
                                h3 { "Last attempt" }
                                Donut { donut: vm.last_donut.clone() }
                            }
                            TrendChart {
                                title: "Accuracy by day".to_string(),
                                bars: vm.daily.clone(),
                                empty_message: "No daily activity yet.".to_string(),
                            }
                            TrendChart {
                                title: "Recent attempts".to_string(),
                                bars: vm.attempts.clone(),
                                empty_message: "No attempts yet.".to_string(),
                            }
                        }
                    } else {
                        p { class: "view-hint", "Take a quiz to start tracking your progress." }
                    }
                },
            }
        }
    }
}
