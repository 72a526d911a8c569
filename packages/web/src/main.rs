use dioxus::prelude::*;
use uuid::Uuid;

use ui::components::ToastProvider;
use ui::{AuthProvider, BackendProvider, NotificationsProvider};
use views::checkout::{CheckoutConfirmation, CheckoutHolder, CheckoutLayout, CheckoutPayment, CheckoutTickets};
use views::settings::{SettingsAccount, SettingsIndex, SettingsNotifications, SettingsPrivacy, SettingsProfile};
use views::{
    AppLayout, EventCreate, EventDetail, EventEdit, EventList, EventMap, Favorites, Feed, Followers,
    Following, ForgotPassword, Login, MyTickets, NotFound, Notifications, PostCreate, ProfileView,
    PublicLayout, Register, ResetPassword, TicketDetail, UserSearch,
};

mod guard;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(PublicLayout)]
        #[route("/?:redirect")]
        Login { redirect: String },
        #[route("/cadastro")]
        Register {},
        #[route("/esqueceu-senha")]
        ForgotPassword {},
    #[end_layout]

    // Reached from the recovery e-mail with a one-off session in the URL fragment
    #[route("/redefinir-senha")]
    ResetPassword {},

    #[layout(AppLayout)]
        #[route("/eventos")]
        EventList {},
        #[route("/eventos/novo")]
        EventCreate {},
        #[route("/eventos/:id")]
        EventDetail { id: Uuid },
        #[route("/eventos/:id/editar")]
        EventEdit { id: Uuid },
        #[route("/favoritos")]
        Favorites {},
        #[route("/feed")]
        Feed {},
        #[route("/feed/novo")]
        PostCreate {},
        #[route("/mapa")]
        EventMap {},
        #[route("/buscar")]
        UserSearch {},
        #[route("/perfil/:id")]
        ProfileView { id: Uuid },
        #[route("/perfil/:id/seguidores")]
        Followers { id: Uuid },
        #[route("/perfil/:id/seguindo")]
        Following { id: Uuid },
        #[route("/notificacoes")]
        Notifications {},
        #[route("/meus-ingressos")]
        MyTickets {},
        #[route("/meus-ingressos/:id")]
        TicketDetail { id: Uuid },

        #[nest("/compra-ingresso/:event_id")]
            #[layout(CheckoutLayout)]
                #[route("/")]
                CheckoutTickets { event_id: Uuid },
                #[route("/dados")]
                CheckoutHolder { event_id: Uuid },
                #[route("/pagamento")]
                CheckoutPayment { event_id: Uuid },
                #[route("/confirmacao")]
                CheckoutConfirmation { event_id: Uuid },
            #[end_layout]
        #[end_nest]

        #[nest("/configuracoes")]
            #[route("/")]
            SettingsIndex {},
            #[route("/perfil")]
            SettingsProfile {},
            #[route("/conta")]
            SettingsAccount {},
            #[route("/notificacoes")]
            SettingsNotifications {},
            #[route("/privacidade")]
            SettingsPrivacy {},
        #[end_nest]
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

impl Route {
    /// Pages for signed-out visitors; a signed-in user is sent on from them.
    pub fn is_public_only(&self) -> bool {
        matches!(
            self,
            Route::Login { .. } | Route::Register {} | Route::ForgotPassword {}
        )
    }
}

const FAVICON: Asset = asset!("/assets/favicon.svg");
const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    if let Err(e) = dioxus::logger::init(tracing::Level::INFO) {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::error_1(&format!("logger init failed: {e}").into());
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("logger init failed: {e}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: ui::UI_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Title { "Agito" }

        BackendProvider {
            ToastProvider {
                AuthProvider {
                    NotificationsProvider {
                        Router::<Route> {}
                    }
                }
            }
        }
    }
}
