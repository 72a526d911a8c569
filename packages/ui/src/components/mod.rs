//! Form controls and toasts shared by every page.

mod button;
pub use button::{Button, ButtonVariant};

mod input;
pub use input::Input;

mod label;
pub use label::Label;

mod textarea;
pub use textarea::Textarea;

pub use dioxus_primitives::toast::{use_toast, ToastOptions, ToastProvider};

mod spinner;
pub use spinner::{ErrorBanner, Spinner};

#[cfg(test)]
mod tests {
    use super::*;
    use dioxus::prelude::*;

    #[component]
    fn Consumer() -> Element {
        let _toast = use_toast();
        let _options = ToastOptions::new();
        rsx! { span { "ok" } }
    }

    fn app() -> Element {
        rsx! {
            ToastProvider { Consumer {} }
        }
    }

    #[test]
    fn test_provider_supplies_toast_handle() {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }
}
