//! Following other users.

use uuid::Uuid;

use super::PROFILE_SUMMARY;
use crate::backend::query::Query;
use crate::error::Result;
use crate::models::{Follow, NewNotification, NotificationKind, ProfileSummary};
use crate::Backend;

fn pair(backend: &Backend, me: Uuid, them: Uuid) -> Query {
    backend
        .from("follows")
        .eq("follower_id", me)
        .eq("followed_id", them)
}

pub async fn is_following(backend: &Backend, me: Uuid, them: Uuid) -> Result<bool> {
    Ok(pair(backend, me, them).count().await? > 0)
}

/// Follow `them` and let them know. The notification is best effort.
pub async fn follow(backend: &Backend, me: Uuid, them: Uuid, my_name: &str) -> Result<()> {
    let row = Follow {
        follower_id: me,
        followed_id: them,
        created_at: None,
        follower: None,
        followed: None,
    };
    backend
        .from("follows")
        .upsert::<Follow, _>(&row, "follower_id,followed_id")
        .await?;

    let notification = NewNotification {
        kind: NotificationKind::Follow,
        message: format!("{my_name} começou a seguir você"),
        sender_id: Some(me),
        recipient_id: them,
        event_id: None,
    };
    if let Err(e) = super::notifications::send(backend, &notification).await {
        tracing::warn!(recipient = %them, "follow notification not sent: {e}");
    }
    tracing::info!(follower = %me, followed = %them, "followed");
    Ok(())
}

pub async fn unfollow(backend: &Backend, me: Uuid, them: Uuid) -> Result<()> {
    pair(backend, me, them).delete().await?;
    tracing::info!(follower = %me, followed = %them, "unfollowed");
    Ok(())
}

pub(crate) fn followers_query(backend: &Backend, id: Uuid) -> Query {
    backend
        .from("follows")
        .select(&format!("follower_id,followed_id,follower:profiles!follower_id({PROFILE_SUMMARY})"))
        .eq("followed_id", id)
        .order("created_at", false)
}

pub(crate) fn following_query(backend: &Backend, id: Uuid) -> Query {
    backend
        .from("follows")
        .select(&format!("follower_id,followed_id,followed:profiles!followed_id({PROFILE_SUMMARY})"))
        .eq("follower_id", id)
        .order("created_at", false)
}

/// Profiles following `id`, most recent first.
pub async fn followers(backend: &Backend, id: Uuid) -> Result<Vec<ProfileSummary>> {
    let rows: Vec<Follow> = followers_query(backend, id).execute().await?;
    Ok(rows.into_iter().filter_map(|f| f.follower).collect())
}

/// Profiles `id` follows, most recent first.
pub async fn following(backend: &Backend, id: Uuid) -> Result<Vec<ProfileSummary>> {
    let rows: Vec<Follow> = following_query(backend, id).execute().await?;
    Ok(rows.into_iter().filter_map(|f| f.followed).collect())
}

/// Ids of everyone `me` follows.
pub async fn following_ids(backend: &Backend, me: Uuid) -> Result<Vec<Uuid>> {
    let rows: Vec<Follow> = backend
        .from("follows")
        .select("follower_id,followed_id")
        .eq("follower_id", me)
        .execute()
        .await?;
    Ok(rows.into_iter().map(|f| f.followed_id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::assert_query;
    use crate::services::test_backend;

    #[test]
    fn test_followers_query_embeds_follower_profile() {
        assert_query(
            &followers_query(&test_backend(), Uuid::from_u128(1)),
            "https://demo.supabase.co/rest/v1/follows",
            &[
                (
                    "select",
                    "follower_id,followed_id,follower:profiles!follower_id(id,name,username,avatar_url)",
                ),
                ("followed_id", "eq.00000000-0000-0000-0000-000000000001"),
                ("order", "created_at.desc"),
            ],
        );
    }

    #[test]
    fn test_pair_filters_both_sides() {
        let url = pair(&test_backend(), Uuid::from_u128(1), Uuid::from_u128(2))
            .url()
            .unwrap();
        assert!(url.contains("follower_id=eq.00000000-0000-0000-0000-000000000001"));
        assert!(url.contains("followed_id=eq.00000000-0000-0000-0000-000000000002"));
    }
}
