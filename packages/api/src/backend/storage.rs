//! Public object buckets (avatars, post images, event covers).

use reqwest::Method;
use serde_json::json;

use super::Backend;
use crate::error::Result;

pub const AVATARS_BUCKET: &str = "avatars";
pub const POSTS_BUCKET: &str = "posts";
pub const EVENTS_BUCKET: &str = "events";

impl Backend {
    /// Upload (or overwrite) an object and return its public URL.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = self.endpoint(&format!("storage/v1/object/{bucket}/{path}"));
        let size = bytes.len();
        self.send(
            self.request(Method::POST, &url)
                .header("Content-Type", content_type)
                .header("x-upsert", "true")
                .body(bytes),
        )
        .await?;
        tracing::info!(bucket, path, size, "uploaded object");
        Ok(self.public_url(bucket, path))
    }

    /// Delete objects from a bucket.
    pub async fn remove(&self, bucket: &str, paths: &[String]) -> Result<()> {
        let url = self.endpoint(&format!("storage/v1/object/{bucket}"));
        self.send(
            self.request(Method::DELETE, &url)
                .json(&json!({ "prefixes": paths })),
        )
        .await?;
        Ok(())
    }

    /// URL under which a public object is served.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.endpoint(&format!(
            "storage/v1/object/public/{bucket}/{}",
            path.trim_start_matches('/')
        ))
    }
}

/// File extension for an uploaded image's content type.
pub fn image_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

/// Path of a storage URL relative to its bucket, for [`Backend::remove`].
pub fn object_path<'a>(public_url: &'a str, bucket: &str) -> Option<&'a str> {
    let marker = format!("/storage/v1/object/public/{bucket}/");
    let start = public_url.find(&marker)? + marker.len();
    let rest = &public_url[start..];
    Some(rest.split('?').next().unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    #[test]
    fn test_public_url() {
        let backend = Backend::new(BackendConfig::new("https://demo.supabase.co", "anon"));
        assert_eq!(
            backend.public_url(AVATARS_BUCKET, "/user-1/avatar.png"),
            "https://demo.supabase.co/storage/v1/object/public/avatars/user-1/avatar.png"
        );
    }

    #[test]
    fn test_object_path_strips_cache_buster() {
        let url = "https://demo.supabase.co/storage/v1/object/public/posts/u1/p.jpg?v=17";
        assert_eq!(object_path(url, POSTS_BUCKET), Some("u1/p.jpg"));
        assert_eq!(object_path(url, AVATARS_BUCKET), None);
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/png"), "png");
        assert_eq!(image_extension("image/jpeg"), "jpg");
        assert_eq!(image_extension("application/octet-stream"), "jpg");
    }
}
