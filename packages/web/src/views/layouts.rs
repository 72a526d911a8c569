use dioxus::prelude::*;
use ui::components::Spinner;
use ui::{use_auth, Navbar};

use crate::guard::{self, Access};
use crate::Route;

/// Frame of the login, sign-up and recovery pages.
#[component]
pub fn PublicLayout() -> Element {
    let auth = use_auth();
    let route = use_route::<Route>();
    let nav = use_navigator();

    if let Access::Redirect(target) = guard::public_only(auth.read().status(), &route) {
        nav.replace(target);
        return rsx! {};
    }

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { class: "auth-brand", "Agito" }
                p { class: "auth-tagline", "Descubra eventos e compre ingressos" }
                Outlet::<Route> {}
            }
        }
    }
}

/// Frame of every signed-in page.
#[component]
pub fn AppLayout() -> Element {
    let auth = use_auth();
    let route = use_route::<Route>();
    let nav = use_navigator();

    let access = guard::protected(auth.read().status(), &route);
    match access {
        Access::Wait => rsx! {
            div { class: "page-loading", Spinner {} }
        },
        Access::Redirect(target) => {
            tracing::debug!(requested = %route, "not signed in, redirecting to login");
            nav.replace(target);
            rsx! {}
        }
        Access::Allow => rsx! {
            Navbar {}
            main { class: "page", Outlet::<Route> {} }
        },
    }
}
