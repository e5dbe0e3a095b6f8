use std::path::PathBuf;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::{Action, Screen};

use crate::context::{AppContext, use_store};
use crate::routes::Route;
use crate::views::charts::{ErrorPanel, StatCards};
use crate::views::{ViewState, view_state_from_remote};
use crate::vm::{MaterialOverviewRowVm, OverviewVm};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceKind {
    Pdf,
    Text,
}

#[component]
pub fn HomeView() -> Element {
    rsx! {
        div { class: "page home-page",
            header { class: "view-header",
                h2 { class: "view-title", "Upload study material" }
                p { class: "view-subtitle",
                    "Pick a PDF or paste notes to get a summary, flashcards and a quiz."
                }
            }
            div { class: "view-divider" }
            UploadForm {}
            OverviewPanel {}
        }
    }
}

#[component]
fn UploadForm() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let navigator = use_navigator();
    let mut kind = use_signal(|| SourceKind::Pdf);
    let mut path = use_signal(String::new);
    let mut text = use_signal(String::new);
    let mut topic = use_signal(String::new);

    let snapshot = store.read();
    let uploading = snapshot.material.is_loading();
    let error = snapshot.material.error().map(str::to_owned);

    let upload = move |_| {
        let study = ctx.study();
        let mut store = store.clone();
        let source = kind();
        let path = PathBuf::from(path().trim());
        let text = text();
        let topic = Some(topic());
        spawn(async move {
            let applied = store
                .fetch(Screen::Upload, async move {
                    let result = match source {
                        SourceKind::Pdf => study.upload_pdf(&path, topic).await,
                        SourceKind::Text => study.upload_text(&text, topic).await,
                    };
                    match result {
                        Ok(material) => Action::MaterialLoaded(material),
                        Err(err) => Action::Failed(Screen::Upload, err.to_string()),
                    }
                })
                .await;
            if applied && store.peek().current_material().is_some() {
                let _ = navigator.push(Route::Material {});
            }
        });
    };

    rsx! {
        section { class: "upload-form",
            div { class: "segmented",
                button {
                    class: if kind() == SourceKind::Pdf { "segment active" } else { "segment" },
                    r#type: "button",
                    onclick: move |_| kind.set(SourceKind::Pdf),
                    "PDF file"
                }
                button {
                    class: if kind() == SourceKind::Text { "segment active" } else { "segment" },
                    r#type: "button",
                    onclick: move |_| kind.set(SourceKind::Text),
                    "Paste text"
                }
            }
            match kind() {
                SourceKind::Pdf => rsx! {
                    label { class: "field",
                        span { "PDF path" }
                        input {
                            r#type: "text",
                            placeholder: "/path/to/notes.pdf",
                            value: "{path}",
                            oninput: move |evt| path.set(evt.value()),
                        }
                    }
                },
                SourceKind::Text => rsx! {
                    label { class: "field",
                        span { "Notes" }
                        textarea {
                            rows: "8",
                            value: "{text}",
                            oninput: move |evt| text.set(evt.value()),
                        }
                    }
                },
            }
            label { class: "field",
                span { "Topic (optional)" }
                input {
                    r#type: "text",
                    value: "{topic}",
                    oninput: move |evt| topic.set(evt.value()),
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                disabled: uploading,
                onclick: upload,
                if uploading { "Generating..." } else { "Generate study material" }
            }
            if let Some(message) = error {
                p { class: "form-error", "{message}" }
            }
        }
    }
}

#[component]
fn OverviewPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let dashboard = ctx.dashboard();

    let store_for_fetch = store.clone();
    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let mut store = store_for_fetch.clone();
        async move {
            store
                .fetch(Screen::Overview, async move {
                    match dashboard.overview().await {
                        Ok(overview) => Action::OverviewLoaded(overview),
                        Err(err) => Action::Failed(Screen::Overview, err.to_string()),
                    }
                })
                .await;
        }
    });

    let snapshot = store.read();
    let state = view_state_from_remote(&snapshot.overview, |overview| OverviewVm::from(overview));

    rsx! {
        section { class: "overview",
            h3 { "Your materials" }
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
                    if vm.rows.is_empty() {
                        p { class: "view-hint", "No quiz attempts yet. Upload something and take a quiz." }
                    } else {
                        ul { class: "overview-list",
                            for row in vm.rows.iter() {
                                OverviewRow { row: row.clone() }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn OverviewRow(row: MaterialOverviewRowVm) -> Element {
    rsx! {
        li { class: "overview-row",
            Link {
                class: "overview-link",
                to: Route::MaterialStats { material_id: row.material_id.to_string() },
                span { class: "overview-label", "{row.label}" }
                span { class: "overview-attempts", "{row.attempts_str}" }
            }
            div { class: "progress-track",
                div { class: "progress-fill", style: "{row.bar_style}; background: {row.color}" }
            }
            span { class: "view-hint", "{row.accuracy_str} · last attempt {row.last_attempt_str}" }
        }
    }
}
