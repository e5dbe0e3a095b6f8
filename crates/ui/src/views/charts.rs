use dioxus::prelude::*;

use crate::views::ViewError;
use crate::vm::{DONUT_RADIUS, DonutVm, StatCardVm, TrendBarVm, WeakQuestionRowVm};

#[component]
pub fn StatCards(cards: Vec<StatCardVm>) -> Element {
    rsx! {
        div { class: "stat-cards",
            for card in cards {
                div { class: "stat-card",
                    span { class: "stat-label", "{card.label}" }
                    span { class: "stat-value", "{card.value}" }
                    if let Some(detail) = card.detail.as_ref() {
                        span { class: "stat-detail", "{detail}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn Donut(donut: DonutVm) -> Element {
    if donut.is_empty() {
        return rsx! {
            div { class: "donut donut--empty",
                p { class: "view-hint", "{donut.caption}" }
            }
        };
    }

    rsx! {
        div { class: "donut",
            svg { class: "donut-chart", view_box: "0 0 42 42",
                circle {
                    class: "donut-track",
                    cx: "21",
                    cy: "21",
                    r: DONUT_RADIUS,
                    fill: "transparent",
                    stroke_width: "6",
                }
                for segment in donut.segments.iter() {
                    circle {
                        cx: "21",
                        cy: "21",
                        r: DONUT_RADIUS,
                        fill: "transparent",
                        stroke: segment.color,
                        stroke_width: "6",
                        stroke_dasharray: "{segment.dash_array}",
                        stroke_dashoffset: "{segment.dash_offset}",
                    }
                }
                text { class: "donut-center", x: "21", y: "23", text_anchor: "middle",
                    "{donut.center_label}"
                }
            }
            ul { class: "donut-legend",
                for segment in donut.segments.iter() {
                    li {
                        span { class: "legend-swatch", style: "background: {segment.color}" }
                        "{segment.label}: {segment.count} ({segment.percent_str})"
                    }
                }
            }
            p { class: "view-hint", "{donut.caption}" }
        }
    }
}

#[component]
pub fn TrendChart(title: String, bars: Vec<TrendBarVm>, empty_message: String) -> Element {
    rsx! {
        section { class: "trend",
            h3 { "{title}" }
            if bars.is_empty() {
                p { class: "view-hint", "{empty_message}" }
            } else {
                div { class: "trend-bars",
                    for bar in bars {
                        div { class: "trend-column", title: "{bar.tooltip}",
                            span { class: "trend-value", "{bar.value_str}" }
                            div { class: "trend-track",
                                div {
                                    class: "trend-fill",
                                    style: "{bar.bar_style}; background: {bar.color}",
                                }
                            }
                            span { class: "trend-label", "{bar.label}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn WeakQuestions(rows: Vec<WeakQuestionRowVm>) -> Element {
    rsx! {
        section { class: "weak-questions",
            h3 { "Weakest questions" }
            if rows.is_empty() {
                p { class: "view-hint", "No question statistics yet." }
            } else {
                ul {
                    for row in rows {
                        li { class: "weak-row",
                            div { class: "weak-header",
                                span { class: "weak-number", "{row.number_label}" }
                                span { class: "weak-text", "{row.question}" }
                                span { class: "weak-accuracy", "{row.accuracy_str}" }
                            }
                            div { class: "progress-track",
                                div {
                                    class: "progress-fill",
                                    style: "{row.bar_style}; background: {row.color}",
                                }
                            }
                            span { class: "view-hint", "{row.counts_str}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn ErrorPanel(error: ViewError, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "error-panel",
            p { class: "error-title", "Something went wrong" }
            p { class: "error-message", "{error.message()}" }
            button {
                class: "btn btn-secondary",
                r#type: "button",
                onclick: move |_| on_retry.call(()),
                "Retry"
            }
        }
    }
}
