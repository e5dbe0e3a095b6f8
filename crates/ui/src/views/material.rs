use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use services::{Action, FlashcardDeck, Remote, Screen};
use study_core::model::{Flashcard, StudyMaterial};

use crate::context::{AppContext, use_store};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_remote};
use crate::vm::{
    FlashcardVm, MaterialVm, MindmapVm, MockTestVm, map_answer_html, map_videos,
    parse_mark_pattern,
};

#[component]
pub fn MaterialView() -> Element {
    let store = use_store();
    let snapshot = store.read();

    rsx! {
        div { class: "page material-page",
            match &snapshot.material {
                Remote::Ready(material) => rsx! {
                    MaterialBody { material: material.clone() }
                },
                Remote::Loading => rsx! {
                    p { "Generating study material..." }
                },
                Remote::Failed(message) => rsx! {
                    p { class: "form-error", "{message}" }
                    Link { class: "btn btn-secondary", to: Route::Home {}, "Back to upload" }
                },
                Remote::Idle => rsx! {
                    p { "No material loaded yet." }
                    Link { class: "btn btn-primary", to: Route::Home {}, "Upload something" }
                },
            }
        }
    }
}

#[component]
fn MaterialBody(material: StudyMaterial) -> Element {
    let mut store = use_store();
    let navigator = use_navigator();
    let vm = MaterialVm::from(&material);
    let stats_id = material.material_id.as_ref().map(ToString::to_string);

    rsx! {
        header { class: "view-header",
            h2 { class: "view-title", "{vm.title}" }
            p { class: "view-subtitle", "{vm.source_label}" }
            div { class: "view-actions",
                if vm.quiz_count > 0 {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| {
                            store.dispatch(Action::QuizStarted);
                            let _ = navigator.push(Route::Quiz {});
                        },
                        "Take the quiz ({vm.quiz_count} questions)"
                    }
                }
                if let Some(material_id) = stats_id {
                    Link { class: "btn btn-secondary", to: Route::MaterialStats { material_id }, "Quiz stats" }
                }
            }
            if !vm.is_trackable {
                p { class: "view-hint", "This material was not saved, so quiz results will not be recorded." }
            }
        }
        div { class: "view-divider" }

        section { class: "summary",
            h3 { "Summary" }
            div { class: "markdown", dangerous_inner_html: "{vm.summary_html}" }
        }
        if !vm.key_topics.is_empty() {
            section { class: "key-topics",
                h3 { "Key topics" }
                div { class: "chips",
                    for topic in vm.key_topics.iter() {
                        span { class: "chip", "{topic}" }
                    }
                }
            }
        }
        if !vm.key_points.is_empty() {
            section { class: "key-points",
                h3 { "Key points" }
                ul {
                    for point in vm.key_points.iter() {
                        li { "{point}" }
                    }
                }
            }
        }

        FlashcardsPanel { cards: material.flashcards.clone() }
        AskPanel { material: material.clone() }
        VideosPanel { material: material.clone() }
        MindmapPanel { material: material.clone() }
        MockTestPanel { material }
    }
}

#[component]
fn FlashcardsPanel(cards: Vec<Flashcard>) -> Element {
    let mut deck = use_signal(|| FlashcardDeck::new(cards));
    let card = FlashcardVm::from_deck(&deck.read());

    rsx! {
        section { class: "flashcards",
            h3 { "Flashcards" }
            match card {
                None => rsx! {
                    p { class: "view-hint", "No flashcards for this material." }
                },
                Some(card) => rsx! {
                    button {
                        class: if card.is_flipped { "flashcard flipped" } else { "flashcard" },
                        r#type: "button",
                        onclick: move |_| deck.write().flip(),
                        span { class: "flashcard-side", "{card.side_label}" }
                        p { class: "flashcard-text", "{card.text}" }
                    }
                    div { class: "flashcard-controls",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| deck.write().previous(),
                            "Previous"
                        }
                        span { class: "flashcard-position", "{card.position_label}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| deck.write().next(),
                            "Next"
                        }
                        button {
                            class: "btn btn-ghost",
                            r#type: "button",
                            onclick: move |_| deck.write().shuffle(),
                            "Shuffle"
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn AskPanel(material: StudyMaterial) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let mut question = use_signal(String::new);
    let snapshot = store.read();
    let state = view_state_from_remote(&snapshot.answer, |answer| map_answer_html(answer));
    let busy = matches!(state, ViewState::Loading);

    let ask = move |_| {
        let study = ctx.study();
        let material = material.clone();
        let asked = question();
        store.spawn_fetch(Screen::Answer, async move {
            match study.ask(&material, &asked).await {
                Ok(answer) => Action::AnswerLoaded(answer),
                Err(err) => Action::Failed(Screen::Answer, err.to_string()),
            }
        });
    };

    rsx! {
        section { class: "ask",
            h3 { "Ask about this material" }
            div { class: "ask-row",
                input {
                    r#type: "text",
                    placeholder: "What is the role of the mitochondria?",
                    value: "{question}",
                    oninput: move |evt| question.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy,
                    onclick: ask,
                    "Ask"
                }
            }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Thinking..." }
                },
                ViewState::Ready(html) => rsx! {
                    div { class: "markdown answer", dangerous_inner_html: "{html}" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn VideosPanel(material: StudyMaterial) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let links = ctx.links();
    let mut query = use_signal(String::new);
    let snapshot = store.read();
    let state = view_state_from_remote(&snapshot.videos, |videos| map_videos(videos));

    let search = move |_| {
        let study = ctx.study();
        let material = material.clone();
        let query = Some(query());
        store.spawn_fetch(Screen::Videos, async move {
            match study.videos(&material, query).await {
                Ok(videos) => Action::VideosLoaded(videos),
                Err(err) => Action::Failed(Screen::Videos, err.to_string()),
            }
        });
    };

    rsx! {
        section { class: "videos",
            h3 { "Videos" }
            div { class: "ask-row",
                input {
                    r#type: "text",
                    placeholder: "Optional search terms",
                    value: "{query}",
                    oninput: move |evt| query.set(evt.value()),
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: matches!(state, ViewState::Loading),
                    onclick: search,
                    "Find videos"
                }
            }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Searching..." }
                },
                ViewState::Error(ref err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(ref cards) if cards.is_empty() => rsx! {
                    p { class: "view-hint", "No videos found." }
                },
                ViewState::Ready(ref cards) => rsx! {
                    ul { class: "video-list",
                        for card in cards {
                            li { class: "video-card",
                                if let Some(src) = card.thumbnail.as_ref() {
                                    img { class: "video-thumb", src: "{src}", alt: "" }
                                }
                                div { class: "video-meta",
                                    p { class: "video-title", "{card.title}" }
                                    p { class: "view-hint",
                                        "{card.channel}"
                                        if let Some(duration) = card.duration_str.as_ref() {
                                            " · {duration}"
                                        }
                                        if let Some(views) = card.views_str.as_ref() {
                                            " · {views}"
                                        }
                                    }
                                    button {
                                        class: "btn btn-ghost",
                                        r#type: "button",
                                        onclick: {
                                            let links = links.clone();
                                            let url = card.url.clone();
                                            move |_| links.open_url(&url)
                                        },
                                        "Watch"
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn MindmapPanel(material: StudyMaterial) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let snapshot = store.read();
    let state = view_state_from_remote(&snapshot.mindmap, |map| MindmapVm::from(map));

    let draw = move |_| {
        let study = ctx.study();
        let material = material.clone();
        store.spawn_fetch(Screen::Mindmap, async move {
            match study.mindmap(&material).await {
                Ok(map) => Action::MindmapLoaded(map),
                Err(err) => Action::Failed(Screen::Mindmap, err.to_string()),
            }
        });
    };

    rsx! {
        section { class: "mindmap",
            h3 { "Mind map" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                disabled: matches!(state, ViewState::Loading),
                onclick: draw,
                "Draw mind map"
            }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Drawing..." }
                },
                ViewState::Error(ref err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(ref map) => rsx! {
                    h4 { "{map.title}" }
                    if let Some(src) = map.image_src.as_ref() {
                        img { class: "mindmap-image", src: "{src}", alt: "Mind map of {map.title}" }
                    }
                    ul { class: "mindmap-branches",
                        for branch in map.branches.iter() {
                            li { style: "border-left-color: {branch.color}",
                                strong { "{branch.topic}" }
                                if !branch.points.is_empty() {
                                    ul {
                                        for point in branch.points.iter() {
                                            li { "{point}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn MockTestPanel(material: StudyMaterial) -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_store();
    let mut pattern = use_signal(String::new);
    let mut pattern_error = use_signal(|| None::<ViewError>);
    let mut show_answers = use_signal(|| false);
    let snapshot = store.read();
    let state = view_state_from_remote(&snapshot.mock_test, |test| MockTestVm::from(test));

    let generate = move |_| {
        let layout = match parse_mark_pattern(&pattern()) {
            Ok(layout) => layout,
            Err(message) => {
                pattern_error.set(Some(ViewError::Request(message)));
                return;
            }
        };
        pattern_error.set(None);
        let study = ctx.study();
        let material = material.clone();
        store.spawn_fetch(Screen::MockTest, async move {
            match study.mock_test(&material, layout).await {
                Ok(test) => Action::MockTestLoaded(test),
                Err(err) => Action::Failed(Screen::MockTest, err.to_string()),
            }
        });
    };

    rsx! {
        section { class: "mock-test",
            h3 { "Mock test" }
            div { class: "ask-row",
                input {
                    r#type: "text",
                    placeholder: "Paper layout, e.g. 10x3, 5x4 (blank for the default)",
                    value: "{pattern}",
                    oninput: move |evt| pattern.set(evt.value()),
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: matches!(state, ViewState::Loading),
                    onclick: generate,
                    "Generate"
                }
            }
            if let Some(err) = pattern_error() {
                p { class: "form-error", "{err.message()}" }
            }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "Writing questions..." }
                },
                ViewState::Error(ref err) => rsx! {
                    p { class: "form-error", "{err.message()}" }
                },
                ViewState::Ready(ref test) => rsx! {
                    h4 { "{test.title}" }
                    p { class: "view-hint", "{test.totals_str}" }
                    label { class: "toggle",
                        input {
                            r#type: "checkbox",
                            checked: show_answers(),
                            onchange: move |evt| show_answers.set(evt.checked()),
                        }
                        "Show model answers"
                    }
                    for section in test.sections.iter() {
                        div { class: "mock-section",
                            h5 { "{section.heading}" }
                            for question in section.questions.iter() {
                                div { class: "mock-question",
                                    p { "{question.number}. {question.text}" }
                                    if show_answers() {
                                        if let Some(answer) = question.answer.as_ref() {
                                            p { class: "mock-answer", "{answer}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
