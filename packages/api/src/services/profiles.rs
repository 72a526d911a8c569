//! Profiles and avatars.

use serde_json::json;
use uuid::Uuid;

use super::{versioned, PROFILE_SUMMARY};
use crate::backend::auth::AuthUser;
use crate::backend::query::Query;
use crate::backend::storage::AVATARS_BUCKET;
use crate::error::Result;
use crate::models::{Profile, ProfileSummary, ProfileUpdate};
use crate::Backend;

/// Most rows a user search returns.
pub const SEARCH_LIMIT: usize = 20;

pub async fn get(backend: &Backend, id: Uuid) -> Result<Profile> {
    backend.from("profiles").select("*").eq("id", id).single().await
}

pub(crate) fn search_query(backend: &Backend, term: &str) -> Query {
    let term: String = term
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%' | '"' | '\\'))
        .collect();
    let term = term.trim();
    backend
        .from("profiles")
        .select(PROFILE_SUMMARY)
        .or(&format!("name.ilike.*{term}*,username.ilike.*{term}*"))
        .order("name", true)
        .limit(SEARCH_LIMIT)
}

/// Profiles whose name or username contains `term`.
pub async fn search(backend: &Backend, term: &str) -> Result<Vec<ProfileSummary>> {
    if term.trim().is_empty() {
        return Ok(Vec::new());
    }
    search_query(backend, term).execute().await
}

pub async fn update(backend: &Backend, id: Uuid, patch: &ProfileUpdate) -> Result<Profile> {
    let rows: Vec<Profile> = backend.from("profiles").eq("id", id).update(patch).await?;
    rows.into_iter()
        .next()
        .ok_or(crate::error::BackendError::NotFound)
}

/// Store a new avatar image and point the profile at it.
pub async fn upload_avatar(
    backend: &Backend,
    id: Uuid,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<Profile> {
    let ext = crate::backend::storage::image_extension(content_type);
    let url = backend
        .upload(AVATARS_BUCKET, &format!("{id}/avatar.{ext}"), bytes, content_type)
        .await?;
    let patch = ProfileUpdate {
        avatar_url: Some(versioned(url)),
        ..Default::default()
    };
    update(backend, id, &patch).await
}

/// Make sure a signed-in user has a profile row, creating it on first sign-in.
pub async fn create_for(backend: &Backend, user: &AuthUser, name: &str) -> Result<Profile> {
    if let Some(existing) = backend
        .from("profiles")
        .select("*")
        .eq("id", user.id)
        .maybe_single::<Profile>()
        .await?
    {
        return Ok(existing);
    }
    let name = Some(name.trim())
        .filter(|n| !n.is_empty())
        .or(user.metadata_name())
        .or_else(|| user.email.as_deref().and_then(|e| e.split('@').next()))
        .unwrap_or_default()
        .to_string();
    let rows: Vec<Profile> = backend
        .from("profiles")
        .upsert(&json!({ "id": user.id, "name": name }), "id")
        .await?;
    tracing::info!(user = %user.id, "created profile");
    rows.into_iter()
        .next()
        .ok_or(crate::error::BackendError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::assert_query;
    use crate::services::test_backend;

    #[test]
    fn test_search_query() {
        assert_query(
            &search_query(&test_backend(), " ana,(x) "),
            "https://demo.supabase.co/rest/v1/profiles",
            &[
                ("select", "id,name,username,avatar_url"),
                ("or", "(name.ilike.*anax*,username.ilike.*anax*)"),
                ("order", "name.asc"),
                ("limit", "20"),
            ],
        );
    }

    #[tokio::test]
    async fn test_blank_search_skips_request() {
        assert!(search(&test_backend(), "   ").await.unwrap().is_empty());
    }
}
