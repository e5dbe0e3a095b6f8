use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::use_store;
use crate::views::{DashboardView, HomeView, MaterialStatsView, MaterialView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/material", MaterialView)] Material {},
        #[route("/quiz", QuizView)] Quiz {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/stats/:material_id", MaterialStatsView)] MaterialStats { material_id: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let store = use_store();
    let snapshot = store.read();
    let has_material = snapshot.current_material().is_some();
    let has_quiz = snapshot.quiz.is_some();

    rsx! {
        nav { class: "sidebar",
            h1 { "Study" }
            ul {
                li { Link { to: Route::Home {}, "Upload" } }
                if has_material {
                    li { Link { to: Route::Material {}, "Material" } }
                }
                if has_quiz {
                    li { Link { to: Route::Quiz {}, "Quiz" } }
                }
                li { Link { to: Route::Dashboard {}, "Progress" } }
            }
            p { class: "sidebar-user", "{snapshot.user_id}" }
        }
    }
}
