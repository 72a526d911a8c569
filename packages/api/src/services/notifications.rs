//! Reading and managing the signed-in user's notifications.

use serde_json::json;
use uuid::Uuid;

use crate::backend::query::Query;
use crate::backend::realtime::PostgresChanges;
use crate::error::Result;
use crate::models::{NewNotification, Notification};
use crate::Backend;

/// Most notifications loaded at once.
pub const LIST_LIMIT: usize = 50;

pub(crate) fn list_query(backend: &Backend, me: Uuid) -> Query {
    backend
        .from("notifications")
        .select("*")
        .eq("recipient_id", me)
        .order("created_at", false)
        .limit(LIST_LIMIT)
}

pub async fn list(backend: &Backend, me: Uuid) -> Result<Vec<Notification>> {
    list_query(backend, me).execute().await
}

/// Realtime listener for rows addressed to `me`.
pub fn changes_for(me: Uuid) -> PostgresChanges {
    PostgresChanges::on("notifications").filter_eq("recipient_id", me)
}

/// Notify another user. The sender cannot read the row back, so nothing is returned.
pub async fn send(backend: &Backend, notification: &NewNotification) -> Result<()> {
    backend.from("notifications").insert_only(notification).await
}

pub async fn mark_read(backend: &Backend, id: Uuid) -> Result<()> {
    backend
        .from("notifications")
        .eq("id", id)
        .update::<Notification, _>(&json!({ "read": true }))
        .await?;
    Ok(())
}

pub async fn mark_all_read(backend: &Backend, me: Uuid) -> Result<()> {
    backend
        .from("notifications")
        .eq("recipient_id", me)
        .eq("read", false)
        .update::<Notification, _>(&json!({ "read": true }))
        .await?;
    Ok(())
}

pub async fn delete(backend: &Backend, id: Uuid) -> Result<()> {
    backend.from("notifications").eq("id", id).delete().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::assert_query;
    use crate::services::test_backend;

    #[test]
    fn test_list_query() {
        assert_query(
            &list_query(&test_backend(), Uuid::nil()),
            "https://demo.supabase.co/rest/v1/notifications",
            &[
                ("select", "*"),
                ("recipient_id", "eq.00000000-0000-0000-0000-000000000000"),
                ("order", "created_at.desc"),
                ("limit", "50"),
            ],
        );
    }

    #[test]
    fn test_changes_filter_on_recipient() {
        let changes = changes_for(Uuid::nil());
        assert_eq!(changes.table, "notifications");
        assert_eq!(
            changes.filter.as_deref(),
            Some("recipient_id=eq.00000000-0000-0000-0000-000000000000")
        );
    }
}
