//! # Domain services
//!
//! Free functions over a [`Backend`](crate::Backend) handle, one module per
//! table. Each function is a single request (or a short fixed sequence) and
//! returns the decoded rows; none of them keep state. Query construction is split
//! into plain functions returning a [`Query`](crate::backend::query::Query) so the
//! exact requests can be checked without a server.
//!
//! | Module | Tables |
//! |--------|--------|
//! | [`profiles`] | `profiles`, `avatars` bucket |
//! | [`events`] | `events`, `events` bucket |
//! | [`follows`] | `follows`, `notifications` |
//! | [`posts`] | `posts`, `post_likes`, `posts` bucket |
//! | [`notifications`] | `notifications` |
//! | [`tickets`] | `tickets`, `purchase_tickets` RPC |
//! | [`favorites`] | `favorites` |

pub mod events;
pub mod favorites;
pub mod follows;
pub mod notifications;
pub mod posts;
pub mod profiles;
pub mod tickets;

/// Columns of a profile embedded in another row.
pub(crate) const PROFILE_SUMMARY: &str = "id,name,username,avatar_url";

/// Columns of an event embedded in another row.
pub(crate) const EVENT_SUMMARY: &str = "id,title,date,location,image_url";

/// Cache-busting suffix so browsers reload an overwritten object.
pub(crate) fn versioned(url: String) -> String {
    format!("{url}?v={}", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
pub(crate) fn test_backend() -> crate::Backend {
    crate::Backend::new(crate::config::BackendConfig::new(
        "https://demo.supabase.co",
        "anon",
    ))
}
