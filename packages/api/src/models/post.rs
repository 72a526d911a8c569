//! Feed posts and likes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ProfileSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    pub created_at: DateTime<Utc>,
    /// Embedded `author:profiles(...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<ProfileSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub user_id: Uuid,
    pub image_url: Option<String>,
    pub caption: Option<String>,
}

/// Optimistic like flag and count for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeState {
    pub liked: bool,
    pub count: u32,
}

impl LikeState {
    pub fn new(liked: bool, count: u32) -> Self {
        Self { liked, count }
    }

    /// Flip the flag and adjust the count; returns the state before the flip.
    pub fn toggle(&mut self) -> Self {
        let previous = *self;
        self.liked = !self.liked;
        self.count = if self.liked {
            self.count.saturating_add(1)
        } else {
            self.count.saturating_sub(1)
        };
        previous
    }

    pub fn revert(&mut self, previous: Self) {
        *self = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_toggle() {
        let mut like = LikeState::new(false, 0);
        like.toggle();
        assert_eq!(like, LikeState::new(true, 1));
        like.toggle();
        assert_eq!(like, LikeState::new(false, 0));
        let previous = like.toggle();
        like.revert(previous);
        assert_eq!(like, LikeState::new(false, 0));
    }

    #[test]
    fn test_unlike_revert_at_zero_keeps_liked() {
        // Stale count: liked but the counter already reads zero.
        let mut like = LikeState::new(true, 0);
        let previous = like.toggle();
        assert_eq!(like, LikeState::new(false, 0));
        like.revert(previous);
        assert_eq!(like, LikeState::new(true, 0));
    }

    #[test]
    fn test_post_decodes_embedded_author() {
        let post: Post = serde_json::from_value(serde_json::json!({
            "id": "0b9c2d1e-7a4f-4e8b-9c3d-2e1f0a9b8c7d",
            "user_id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e",
            "image_url": "https://x/p.jpg",
            "caption": "bora",
            "likes_count": 3,
            "created_at": "2025-02-01T10:00:00Z",
            "author": { "id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e", "name": "Ana" }
        }))
        .unwrap();
        assert_eq!(post.comments_count, 0);
        assert_eq!(post.author.unwrap().display_name(), "Ana");
    }
}
