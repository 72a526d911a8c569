//! Notification list context with realtime updates.
//!
//! [`NotificationsProvider`] loads the signed-in user's notifications and keeps a
//! realtime channel open for rows addressed to them. The subscription follows the
//! user: signing out or switching accounts drops the old channel and opens a new
//! one.

use api::models::{Notification, NotificationList};
use api::services::notifications;
use api::BackendError;
use dioxus::prelude::*;

use crate::icons::FaBell;
use crate::{use_auth, use_backend, Icon};

/// The signed-in user's notifications, newest first.
pub fn use_notifications() -> Signal<NotificationList> {
    use_context::<Signal<NotificationList>>()
}

/// Provides [`use_notifications`]; must sit inside `AuthProvider`.
#[component]
pub fn NotificationsProvider(children: Element) -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let mut list = use_signal(NotificationList::default);
    let user_id = use_memo(move || auth().user_id());

    let _ = use_resource(move || {
        let backend = backend.clone();
        async move {
            let Some(me) = user_id() else {
                list.set(NotificationList::default());
                return;
            };

            match notifications::list(&backend, me).await {
                Ok(items) => list.set(NotificationList::new(items)),
                Err(e) => tracing::error!("failed to load notifications: {e}"),
            }

            let mut channel = match backend
                .subscribe::<Notification>(&format!("notifications:{me}"), &[notifications::changes_for(me)])
                .await
            {
                Ok(channel) => channel,
                Err(BackendError::Unsupported(what)) => {
                    tracing::debug!("{what} not available on this target");
                    return;
                }
                Err(e) => {
                    tracing::warn!("notifications will not update live: {e}");
                    return;
                }
            };

            while let Some(next) = channel.next().await {
                if *user_id.peek() != Some(me) {
                    break;
                }
                match next {
                    Ok(change) => list.write().apply(change),
                    Err(e) => tracing::warn!("dropped realtime frame: {e}"),
                }
            }
            channel.unsubscribe().await;
        }
    });

    use_context_provider(|| list);

    rsx! {
        {children}
    }
}

/// Bell icon linking to the notifications page, with the unread count.
#[component]
pub fn NotificationBell() -> Element {
    let list = use_notifications();
    let unread = list.read().unread_count();

    rsx! {
        Link {
            to: "/notificacoes",
            class: "nav-icon",
            Icon { icon: FaBell, width: 18, height: 18 }
            span { class: "sr-only", "Notificações" }
            if unread > 0 {
                span { class: "badge", if unread > 99 { "99+" } else { "{unread}" } }
            }
        }
    }
}
