//! Event listing, CRUD and cover images.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{versioned, PROFILE_SUMMARY};
use crate::backend::query::Query;
use crate::backend::storage::{image_extension, object_path, EVENTS_BUCKET};
use crate::error::{BackendError, Result};
use crate::models::{Event, EventFilter, NewEvent};
use crate::Backend;

pub(crate) fn list_query(backend: &Backend, filter: &EventFilter, now: DateTime<Utc>) -> Query {
    let mut query = backend
        .from("events")
        .select(&format!("*,organizer:profiles({PROFILE_SUMMARY})"));
    if let Some(term) = filter.search_term() {
        query = query.or(&format!("title.ilike.*{term}*,location.ilike.*{term}*"));
    }
    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        query = query.eq("category", category);
    }
    if filter.upcoming_only {
        query = query.gte("date", now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
    }
    if let Some(organizer) = filter.organizer {
        query = query.eq("organizer_id", organizer);
    }
    if filter.with_coordinates {
        query = query.not_null("latitude").not_null("longitude");
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    query.order("date", true)
}

pub async fn list(backend: &Backend, filter: &EventFilter) -> Result<Vec<Event>> {
    list_query(backend, filter, Utc::now()).execute().await
}

pub async fn get(backend: &Backend, id: Uuid) -> Result<Event> {
    backend
        .from("events")
        .select(&format!("*,organizer:profiles({PROFILE_SUMMARY})"))
        .eq("id", id)
        .single()
        .await
}

pub async fn create(backend: &Backend, event: &NewEvent) -> Result<Event> {
    let rows: Vec<Event> = backend.from("events").insert(event).await?;
    let created = rows.into_iter().next().ok_or(BackendError::NotFound)?;
    tracing::info!(event = %created.id, "created event");
    Ok(created)
}

pub async fn update(backend: &Backend, id: Uuid, event: &NewEvent) -> Result<Event> {
    let rows: Vec<Event> = backend.from("events").eq("id", id).update(event).await?;
    rows.into_iter().next().ok_or(BackendError::NotFound)
}

/// Delete an event and, best effort, its cover image.
pub async fn delete(backend: &Backend, event: &Event) -> Result<()> {
    backend.from("events").eq("id", event.id).delete().await?;
    if let Some(path) = event
        .image_url
        .as_deref()
        .and_then(|url| object_path(url, EVENTS_BUCKET))
    {
        if let Err(e) = backend.remove(EVENTS_BUCKET, &[path.to_string()]).await {
            tracing::warn!(event = %event.id, "failed to remove cover: {e}");
        }
    }
    tracing::info!(event = %event.id, "deleted event");
    Ok(())
}

/// Upload a cover image for an event owned by `organizer`, returning its URL.
pub async fn upload_cover(
    backend: &Backend,
    organizer: Uuid,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String> {
    let path = format!(
        "{organizer}/{}.{}",
        Uuid::new_v4(),
        image_extension(content_type)
    );
    let url = backend.upload(EVENTS_BUCKET, &path, bytes, content_type).await?;
    Ok(versioned(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::assert_query;
    use crate::services::test_backend;
    use chrono::TimeZone;

    #[test]
    fn test_list_query_with_every_filter() {
        let filter = EventFilter {
            search: Some("rock".to_string()),
            category: Some("Música".to_string()),
            upcoming_only: true,
            organizer: Some(Uuid::nil()),
            with_coordinates: true,
            limit: Some(50),
        };
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_query(
            &list_query(&test_backend(), &filter, now),
            "https://demo.supabase.co/rest/v1/events",
            &[
                ("select", "*,organizer:profiles(id,name,username,avatar_url)"),
                ("or", "(title.ilike.*rock*,location.ilike.*rock*)"),
                ("category", "eq.Música"),
                ("date", "gte.2025-06-01T12:00:00Z"),
                ("organizer_id", "eq.00000000-0000-0000-0000-000000000000"),
                ("latitude", "not.is.null"),
                ("longitude", "not.is.null"),
                ("limit", "50"),
                ("order", "date.asc"),
            ],
        );
    }

    #[test]
    fn test_empty_filter_lists_everything() {
        let now = Utc::now();
        assert_query(
            &list_query(&test_backend(), &EventFilter::default(), now),
            "https://demo.supabase.co/rest/v1/events",
            &[
                ("select", "*,organizer:profiles(id,name,username,avatar_url)"),
                ("order", "date.asc"),
            ],
        );
    }
}
