//! The shared backend handle.

use api::{Backend, BackendConfig};
use dioxus::prelude::*;

/// The backend handle provided by [`BackendProvider`].
pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Builds the [`Backend`] from the environment and provides it to `children`.
///
/// A missing configuration renders an explanation instead of the app.
#[component]
pub fn BackendProvider(children: Element) -> Element {
    let backend = use_hook(|| match BackendConfig::from_env() {
        Ok(config) => {
            tracing::info!(url = %config.url, "backend configured");
            Ok(Backend::new(config))
        }
        Err(e) => {
            tracing::error!("backend configuration missing: {e}");
            Err(e.to_string())
        }
    });

    match backend {
        Ok(backend) => {
            use_context_provider(|| backend);
            rsx! {
                {children}
            }
        }
        Err(message) => rsx! {
            div { class: "config-error",
                h1 { "Agito" }
                p { "Não foi possível conectar ao servidor." }
                pre { "{message}" }
            }
        },
    }
}
