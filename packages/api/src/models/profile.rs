//! # User profiles
//!
//! A [`Profile`] is the public row in `profiles`, keyed by the auth user id. It
//! carries the denormalised follower/following counters the backend maintains and
//! the user's notification preferences as a JSON column.
//!
//! [`ProfileSummary`] is the projection embedded in other rows (post authors,
//! follower lists). [`ProfileUpdate`] is a partial patch; unset fields are left
//! untouched by the backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub notification_preferences: NotificationPreferences,
}

impl Profile {
    /// Display name, falling back to the username and then a generic label.
    pub fn display_name(&self) -> &str {
        display_name(self.name.as_deref(), self.username.as_deref())
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// The subset of a profile embedded in other rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl ProfileSummary {
    pub fn display_name(&self) -> &str {
        display_name(self.name.as_deref(), self.username.as_deref())
    }
}

fn display_name<'a>(name: Option<&'a str>, username: Option<&'a str>) -> &'a str {
    name.filter(|n| !n.trim().is_empty())
        .or(username.filter(|u| !u.trim().is_empty()))
        .unwrap_or("Usuário")
}

/// Up to two uppercase initials for avatar placeholders.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Which notifications a user wants to receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "enabled")]
    pub follows: bool,
    #[serde(default = "enabled")]
    pub likes: bool,
    #[serde(default = "enabled")]
    pub tickets: bool,
    #[serde(default = "enabled")]
    pub events: bool,
    #[serde(default)]
    pub email: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            follows: true,
            likes: true,
            tickets: true,
            events: true,
            email: false,
        }
    }
}

/// Partial update of a profile row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_preferences: Option<NotificationPreferences>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_defaults_for_missing_columns() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "5f1c1a3e-6b9a-4f39-9df5-1d2a3b4c5d6e",
            "name": "Ana Souza",
            "avatar_url": null,
            "bio": null
        }))
        .unwrap();
        assert_eq!(profile.followers_count, 0);
        assert!(!profile.is_private);
        assert_eq!(profile.notification_preferences, NotificationPreferences::default());
        assert_eq!(profile.display_name(), "Ana Souza");
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(display_name(Some("  "), Some("ana")), "ana");
        assert_eq!(display_name(None, None), "Usuário");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ana maria souza"), "AM");
        assert_eq!(initials("Zé"), "Z");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            bio: Some("Amo shows".to_string()),
            is_private: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "bio": "Amo shows", "is_private": true })
        );
    }

    #[test]
    fn test_partial_preferences_default_to_enabled() {
        let prefs: NotificationPreferences =
            serde_json::from_value(json!({ "likes": false })).unwrap();
        assert!(prefs.follows);
        assert!(!prefs.likes);
        assert!(!prefs.email);
    }
}
