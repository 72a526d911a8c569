//! Profile pages and follower lists.

use api::models::{EventFilter, FollowState, ProfileSummary};
use api::services::{events, follows, posts, profiles};
use dioxus::prelude::*;
use uuid::Uuid;
use ui::components::{ErrorBanner, Spinner};
use ui::icons::FaLock;
use ui::{format, use_auth, use_backend, Avatar, EventCard, FollowButton, Icon};

use super::feed::PostList;
use crate::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Posts,
    Events,
}

#[component]
pub fn ProfileView(id: Uuid) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let mut follow = use_signal(FollowState::default);
    let mut tab = use_signal(|| Tab::Posts);

    let profile = use_resource(use_reactive!(|id| {
        let backend = backend.clone();
        async move {
            let profile = profiles::get(&backend, id).await?;
            let following = match auth.peek().user_id() {
                Some(me) if me != id => follows::is_following(&backend, me, id).await?,
                _ => false,
            };
            follow.set(FollowState::new(following, profile.followers_count));
            Ok::<_, api::BackendError>(profile)
        }
    }));

    let profile = match &*profile.read() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            tracing::error!(profile = %id, "failed to load profile: {e}");
            return rsx! { ErrorBanner { message: Some(format::backend_error(e)) } };
        }
        Some(Ok(profile)) => profile.clone(),
    };

    let is_me = auth.read().user_id() == Some(id);
    let hidden = profile.is_private && !is_me && !follow.read().following;
    let followers = follow.read().followers;

    rsx! {
        section { class: "profile-header",
            Avatar { url: profile.avatar_url.clone(), name: profile.display_name().to_string(), size: 96 }
            div { class: "profile-info",
                h1 {
                    "{profile.display_name()}"
                    if profile.is_private {
                        span { class: "muted", title: "Conta privada", " " Icon { icon: FaLock, width: 14, height: 14 } }
                    }
                }
                if let Some(username) = &profile.username {
                    p { class: "muted", "@{username}" }
                }
                div { class: "profile-counts",
                    Link { to: Route::Followers { id }, {format::plural(followers, "seguidor", "seguidores")} }
                    Link { to: Route::Following { id }, "{profile.following_count} seguindo" }
                }
                if let Some(bio) = &profile.bio {
                    p { class: "profile-bio", "{bio}" }
                }
                if is_me {
                    Link { to: Route::SettingsProfile {}, class: "btn btn-outline", "Editar perfil" }
                } else {
                    FollowButton { profile_id: id, state: follow }
                }
            }
        }

        if hidden {
            div { class: "private-notice",
                Icon { icon: FaLock, width: 20, height: 20 }
                p { "Esta conta é privada. Siga para ver as publicações e eventos." }
            }
        } else {
            nav { class: "tabs",
                button {
                    class: if tab() == Tab::Posts { "tab active" } else { "tab" },
                    onclick: move |_| tab.set(Tab::Posts),
                    "Publicações"
                }
                button {
                    class: if tab() == Tab::Events { "tab active" } else { "tab" },
                    onclick: move |_| tab.set(Tab::Events),
                    "Eventos"
                }
            }
            match tab() {
                Tab::Posts => rsx! { UserPosts { key: "{id}", id } },
                Tab::Events => rsx! { OrganizedEvents { key: "{id}", id } },
            }
        }
    }
}

#[component]
fn UserPosts(id: Uuid) -> Element {
    let backend = use_backend();
    let list = use_resource(use_reactive!(|id| {
        let backend = backend.clone();
        async move { posts::by_user(&backend, id).await }
    }));

    let view = match &*list.read() {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! { ErrorBanner { message: Some(format::backend_error(e)) } },
        Some(Ok(items)) if items.is_empty() => rsx! { p { class: "empty", "Nenhuma publicação." } },
        Some(Ok(items)) => rsx! { PostList { posts: items.clone() } },
    };
    view
}

#[component]
fn OrganizedEvents(id: Uuid) -> Element {
    let backend = use_backend();
    let list = use_resource(use_reactive!(|id| {
        let backend = backend.clone();
        async move {
            let filter = EventFilter {
                organizer: Some(id),
                ..Default::default()
            };
            events::list(&backend, &filter).await
        }
    }));

    let view = match &*list.read() {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! { ErrorBanner { message: Some(format::backend_error(e)) } },
        Some(Ok(items)) if items.is_empty() => rsx! { p { class: "empty", "Nenhum evento organizado." } },
        Some(Ok(items)) => rsx! {
            div { class: "event-grid",
                for event in items.iter().cloned() {
                    EventCard { key: "{event.id}", event }
                }
            }
        },
    };
    view
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Followers,
    Following,
}

#[component]
pub fn Followers(id: Uuid) -> Element {
    rsx! { PeopleList { id, direction: Direction::Followers } }
}

#[component]
pub fn Following(id: Uuid) -> Element {
    rsx! { PeopleList { id, direction: Direction::Following } }
}

#[component]
fn PeopleList(id: Uuid, direction: Direction) -> Element {
    let backend = use_backend();
    let people = use_resource(use_reactive!(|id, direction| {
        let backend = backend.clone();
        async move {
            match direction {
                Direction::Followers => follows::followers(&backend, id).await,
                Direction::Following => follows::following(&backend, id).await,
            }
        }
    }));

    let title = match direction {
        Direction::Followers => "Seguidores",
        Direction::Following => "Seguindo",
    };

    rsx! {
        div { class: "page-header",
            h1 { "{title}" }
            Link { to: Route::ProfileView { id }, class: "btn btn-ghost", "Voltar ao perfil" }
        }
        match &*people.read() {
            None => rsx! { Spinner {} },
            Some(Err(e)) => {
                tracing::error!(profile = %id, "failed to load {title}: {e}");
                rsx! { ErrorBanner { message: Some(format::backend_error(e)) } }
            }
            Some(Ok(list)) if list.is_empty() => rsx! { p { class: "empty", "Ninguém por aqui ainda." } },
            Some(Ok(list)) => rsx! {
                ul { class: "list",
                    for person in list.iter().cloned() {
                        PersonRow { key: "{person.id}", person }
                    }
                }
            },
        }
    }
}

#[component]
fn PersonRow(person: ProfileSummary) -> Element {
    rsx! {
        li { class: "list-item",
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
