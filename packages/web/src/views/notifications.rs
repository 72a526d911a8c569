//! The notifications page. Every action updates the shared list first and puts
//! it back when the backend call fails.

use api::models::{Notification, NotificationKind};
use api::services::notifications;
use chrono::Utc;
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{use_toast, Button, ButtonVariant, ToastOptions};
use ui::icons::{FaBell, FaCalendarDays, FaHeart, FaTicket, FaTrash, FaUserPlus};
use ui::{format, use_auth, use_backend, use_notifications, Icon};

use crate::Route;

/// Where a notification leads when clicked.
fn target(notification: &Notification) -> Option<Route> {
    match notification.kind {
        NotificationKind::Follow => notification.sender_id.map(|id| Route::ProfileView { id }),
        NotificationKind::Ticket => Some(Route::MyTickets {}),
        _ => notification
            .event_id
            .map(|id| Route::EventDetail { id })
            .or_else(|| notification.sender_id.map(|id| Route::ProfileView { id })),
    }
}

#[component]
fn KindIcon(kind: NotificationKind) -> Element {
    match kind {
        NotificationKind::Follow => rsx! { Icon { icon: FaUserPlus, width: 16, height: 16 } },
        NotificationKind::Like => rsx! { Icon { icon: FaHeart, width: 16, height: 16 } },
        NotificationKind::Ticket => rsx! { Icon { icon: FaTicket, width: 16, height: 16 } },
        NotificationKind::Event => rsx! { Icon { icon: FaCalendarDays, width: 16, height: 16 } },
        NotificationKind::System => rsx! { Icon { icon: FaBell, width: 16, height: 16 } },
    }
}

#[component]
pub fn Notifications() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();
    let nav = use_navigator();
    let mut list = use_notifications();

    let open = use_callback({
        let backend = backend.clone();
        move |notification: Notification| {
            let id = notification.id;
            if list.write().mark_read(id) {
                let backend = backend.clone();
                spawn(async move {
                    if let Err(e) = notifications::mark_read(&backend, id).await {
                        tracing::warn!(notification = %id, "failed to mark read: {e}");
                        list.write().set_read(id, false);
                    }
                });
            }
            if let Some(route) = target(&notification) {
                nav.push(route);
            }
        }
    });

    let delete = use_callback({
        let backend = backend.clone();
        move |id: Uuid| {
            let Some(removed) = list.write().remove(id) else {
                return;
            };
            let backend = backend.clone();
            spawn(async move {
                if let Err(e) = notifications::delete(&backend, id).await {
                    tracing::error!(notification = %id, "failed to delete notification: {e}");
                    list.write().restore(removed);
                    toast.error(format::backend_error(&e), ToastOptions::new());
                }
            });
        }
    });

    let mark_all = move |_: MouseEvent| {
        let Some(me) = auth.peek().user_id() else {
            return;
        };
        let ids = list.write().mark_all_read();
        if ids.is_empty() {
            return;
        }
        let backend = backend.clone();
        spawn(async move {
            if let Err(e) = notifications::mark_all_read(&backend, me).await {
                tracing::error!("failed to mark all read: {e}");
                let mut list = list.write();
                for id in ids {
                    list.set_read(id, false);
                }
                toast.error(format::backend_error(&e), ToastOptions::new());
            }
        });
    };

    let now = Utc::now();
    let unread = list.read().unread_count();
    let items = list.read().items().to_vec();

    rsx! {
        div { class: "page-header",
            h1 { "Notificações" }
            if unread > 0 {
                Button { variant: ButtonVariant::Ghost, onclick: mark_all, "Marcar todas como lidas" }
            }
        }
        if items.is_empty() {
            p { class: "empty", "Nenhuma notificação por aqui." }
        } else {
            ul { class: "list notifications",
                for notification in items {
                    li {
                        key: "{notification.id}",
                        class: if notification.read { "list-item notification" } else { "list-item notification unread" },
                        button {
                            class: "list-item-main",
                            onclick: {
                                let notification = notification.clone();
                                move |_| open.call(notification.clone())
                            },
                            span { class: "notification-icon", KindIcon { kind: notification.kind } }
                            div {
                                p { "{notification.message}" }
                                p { class: "muted", "{format::relative_time(notification.created_at, now)}" }
                            }
                        }
                        button {
                            class: "icon-button",
                            title: "Excluir notificação",
                            onclick: move |_| delete.call(notification.id),
                            Icon { icon: FaTrash, width: 14, height: 14 }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(kind: &str, sender: Option<Uuid>, event: Option<Uuid>) -> Notification {
        serde_json::from_value(json!({
            "id": Uuid::from_u128(1),
            "type": kind,
            "message": "oi",
            "sender_id": sender,
            "recipient_id": Uuid::from_u128(2),
            "event_id": event,
            "created_at": "2026-03-14T12:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_target() {
        let sender = Uuid::from_u128(7);
        let event = Uuid::from_u128(9);
        assert_eq!(
            target(&notification("follow", Some(sender), None)),
            Some(Route::ProfileView { id: sender })
        );
        assert_eq!(
            target(&notification("like", Some(sender), Some(event))),
            Some(Route::EventDetail { id: event })
        );
        assert_eq!(target(&notification("ticket", None, Some(event))), Some(Route::MyTickets {}));
        assert_eq!(target(&notification("anything", None, None)), None);
    }
}
