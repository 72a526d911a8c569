//! Feed posts and likes.

use std::collections::HashSet;

use serde_json::json;
use uuid::Uuid;

use super::{follows, PROFILE_SUMMARY};
use crate::backend::query::Query;
use crate::backend::storage::{image_extension, POSTS_BUCKET};
use crate::error::{BackendError, Result};
use crate::models::{NewPost, Post};
use crate::Backend;

pub const FEED_LIMIT: usize = 50;

fn select_with_author(backend: &Backend) -> Query {
    backend
        .from("posts")
        .select(&format!("*,author:profiles({PROFILE_SUMMARY})"))
}

pub(crate) fn feed_query(backend: &Backend, authors: &[Uuid]) -> Query {
    select_with_author(backend)
        .is_in("user_id", authors)
        .order("created_at", false)
        .limit(FEED_LIMIT)
}

/// Posts by everyone `me` follows plus `me`, newest first.
pub async fn feed(backend: &Backend, me: Uuid) -> Result<Vec<Post>> {
    let mut authors = follows::following_ids(backend, me).await?;
    authors.push(me);
    feed_query(backend, &authors).execute().await
}

pub async fn by_user(backend: &Backend, id: Uuid) -> Result<Vec<Post>> {
    select_with_author(backend)
        .eq("user_id", id)
        .order("created_at", false)
        .execute()
        .await
}

/// Publish a post; the image, if any, goes to the posts bucket first.
pub async fn create(
    backend: &Backend,
    me: Uuid,
    image: Option<(Vec<u8>, String)>,
    caption: &str,
) -> Result<Post> {
    let image_url = match image {
        Some((bytes, content_type)) => {
            let path = format!("{me}/{}.{}", Uuid::new_v4(), image_extension(&content_type));
            Some(backend.upload(POSTS_BUCKET, &path, bytes, &content_type).await?)
        }
        None => None,
    };
    let caption = Some(caption.trim().to_string()).filter(|c| !c.is_empty());
    let row = NewPost {
        user_id: me,
        image_url,
        caption,
    };
    let rows: Vec<Post> = backend.from("posts").insert(&row).await?;
    let post = rows.into_iter().next().ok_or(BackendError::NotFound)?;
    tracing::info!(post = %post.id, "published post");
    Ok(post)
}

/// Which of `ids` `me` has liked.
pub async fn liked_by(backend: &Backend, me: Uuid, ids: &[Uuid]) -> Result<HashSet<Uuid>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }
    #[derive(serde::Deserialize)]
    struct Row {
        post_id: Uuid,
    }
    let rows: Vec<Row> = backend
        .from("post_likes")
        .select("post_id")
        .eq("user_id", me)
        .is_in("post_id", ids)
        .execute()
        .await?;
    Ok(rows.into_iter().map(|r| r.post_id).collect())
}

pub async fn like(backend: &Backend, me: Uuid, post: Uuid) -> Result<()> {
    backend
        .from("post_likes")
        .upsert::<serde_json::Value, _>(&json!({ "post_id": post, "user_id": me }), "post_id,user_id")
        .await?;
    Ok(())
}

pub async fn unlike(backend: &Backend, me: Uuid, post: Uuid) -> Result<()> {
    backend
        .from("post_likes")
        .eq("post_id", post)
        .eq("user_id", me)
        .delete()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::assert_query;
    use crate::services::test_backend;

    #[test]
    fn test_feed_query() {
        assert_query(
            &feed_query(&test_backend(), &[Uuid::from_u128(1), Uuid::from_u128(2)]),
            "https://demo.supabase.co/rest/v1/posts",
            &[
                ("select", "*,author:profiles(id,name,username,avatar_url)"),
                (
                    "user_id",
                    "in.(00000000-0000-0000-0000-000000000001,00000000-0000-0000-0000-000000000002)",
                ),
                ("order", "created_at.desc"),
                ("limit", "50"),
            ],
        );
    }

    #[tokio::test]
    async fn test_liked_by_nothing_skips_request() {
        assert!(liked_by(&test_backend(), Uuid::nil(), &[]).await.unwrap().is_empty());
    }
}
