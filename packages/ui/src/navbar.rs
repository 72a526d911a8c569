use dioxus::prelude::*;

use crate::icons::{FaCalendarDays, FaGear, FaHeart, FaMagnifyingGlass, FaMap, FaNewspaper, FaTicket, FaUser};
use crate::{use_auth, Icon, NotificationBell};

/// Top navigation for signed-in pages.
#[component]
pub fn Navbar() -> Element {
    let auth = use_auth();
    let profile_href = auth
        .read()
        .user_id()
        .map(|id| format!("/perfil/{id}"))
        .unwrap_or_else(|| "/".to_string());

    rsx! {
        nav { class: "navbar",
            Link { to: "/eventos", class: "navbar-brand", "Agito" }
            div { class: "navbar-links",
                Link { to: "/eventos", class: "nav-icon", title: "Eventos",
                    Icon { icon: FaCalendarDays, width: 18, height: 18 }
                    span { class: "nav-label", "Eventos" }
                }
                Link { to: "/feed", class: "nav-icon", title: "Feed",
                    Icon { icon: FaNewspaper, width: 18, height: 18 }
                    span { class: "nav-label", "Feed" }
                }
                Link { to: "/mapa", class: "nav-icon", title: "Mapa",
                    Icon { icon: FaMap, width: 18, height: 18 }
                    span { class: "nav-label", "Mapa" }
                }
                Link { to: "/buscar", class: "nav-icon", title: "Buscar",
                    Icon { icon: FaMagnifyingGlass, width: 18, height: 18 }
                    span { class: "nav-label", "Buscar" }
                }
                Link { to: "/favoritos", class: "nav-icon", title: "Favoritos",
                    Icon { icon: FaHeart, width: 18, height: 18 }
                    span { class: "nav-label", "Favoritos" }
                }
                Link { to: "/meus-ingressos", class: "nav-icon", title: "Meus ingressos",
                    Icon { icon: FaTicket, width: 18, height: 18 }
                    span { class: "nav-label", "Ingressos" }
                }
            }
            div { class: "navbar-actions",
                NotificationBell {}
                Link { to: "{profile_href}", class: "nav-icon", title: "Perfil",
                    Icon { icon: FaUser, width: 18, height: 18 }
                }
                Link { to: "/configuracoes", class: "nav-icon", title: "Configurações",
                    Icon { icon: FaGear, width: 18, height: 18 }
                }
            }
        }
    }
}
