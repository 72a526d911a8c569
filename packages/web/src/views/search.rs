use std::time::Duration;

use api::services::profiles;
use dioxus::prelude::*;
use ui::components::{ErrorBanner, Input, Spinner};
use ui::{format, use_backend, Avatar};

use crate::Route;

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[component]
pub fn UserSearch() -> Element {
    let backend = use_backend();
    let mut term = use_signal(String::new);

    let results = use_resource(move || {
        let backend = backend.clone();
        let term = term();
        async move {
            if term.trim().is_empty() {
                return Ok(Vec::new());
            }
            ui::sleep(SEARCH_DEBOUNCE).await;
            profiles::search(&backend, &term).await
        }
    });

    rsx! {
        h1 { "Buscar pessoas" }
        Input {
            r#type: "search",
            placeholder: "Nome ou @usuário",
            value: term(),
            oninput: move |evt: FormEvent| term.set(evt.value()),
        }
        match &*results.read() {
            None => rsx! { Spinner {} },
            Some(Err(e)) => {
                tracing::error!("user search failed: {e}");
                rsx! { ErrorBanner { message: Some(format::backend_error(e)) } }
            }
            Some(Ok(list)) if list.is_empty() && !term.read().trim().is_empty() => rsx! {
                p { class: "empty", "Ninguém encontrado." }
            },
            Some(Ok(list)) => rsx! {
                ul { class: "list",
                    for person in list.iter().cloned() {
                        li { key: "{person.id}", class: "list-item",
                            Link { to: Route::ProfileView { id: person.id }, class: "list-item-main",
                                Avatar { url: person.avatar_url.clone(), name: person.display_name().to_string(), size: 40 }
                                div {
                                    strong { "{person.display_name()}" }
                                    if let Some(username) = &person.username {
                                        p { class: "muted", "@{username}" }
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
