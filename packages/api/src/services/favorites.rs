//! Favorited events.

use serde_json::json;
use uuid::Uuid;

use super::EVENT_SUMMARY;
use crate::backend::query::Query;
use crate::error::Result;
use crate::models::Favorite;
use crate::Backend;

pub(crate) fn list_query(backend: &Backend, me: Uuid) -> Query {
    backend
        .from("favorites")
        .select(&format!("user_id,event_id,event:events({EVENT_SUMMARY})"))
        .eq("user_id", me)
}

pub async fn list(backend: &Backend, me: Uuid) -> Result<Vec<Favorite>> {
    list_query(backend, me).execute().await
}

pub async fn is_favorite(backend: &Backend, me: Uuid, event: Uuid) -> Result<bool> {
    Ok(backend
        .from("favorites")
        .eq("user_id", me)
        .eq("event_id", event)
        .count()
        .await?
        > 0)
}

pub async fn add(backend: &Backend, me: Uuid, event: Uuid) -> Result<()> {
    backend
        .from("favorites")
        .upsert::<Favorite, _>(&json!({ "user_id": me, "event_id": event }), "user_id,event_id")
        .await?;
    Ok(())
}

pub async fn remove(backend: &Backend, me: Uuid, event: Uuid) -> Result<()> {
    backend
        .from("favorites")
        .eq("user_id", me)
        .eq("event_id", event)
        .delete()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::assert_query;
    use crate::services::test_backend;

    #[test]
    fn test_list_query_embeds_event() {
        assert_query(
            &list_query(&test_backend(), Uuid::nil()),
            "https://demo.supabase.co/rest/v1/favorites",
            &[
                ("select", "user_id,event_id,event:events(id,title,date,location,image_url)"),
                ("user_id", "eq.00000000-0000-0000-0000-000000000000"),
            ],
        );
    }
}
