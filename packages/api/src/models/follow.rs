//! Follow relationships and the optimistic follow toggle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::ProfileSummary;

/// A row in `follows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded `follower:profiles(...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower: Option<ProfileSummary>,
    /// Embedded `followed:profiles(...)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed: Option<ProfileSummary>,
}

/// Whether the viewer follows a profile, and that profile's follower count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowState {
    pub following: bool,
    pub followers: u32,
}

impl FollowState {
    pub fn new(following: bool, followers: u32) -> Self {
        Self { following, followers }
    }

    /// Flip the flag and adjust the count; returns the state before the flip.
    pub fn toggle(&mut self) -> Self {
        let previous = *self;
        self.following = !self.following;
        self.followers = if self.following {
            self.followers.saturating_add(1)
        } else {
            self.followers.saturating_sub(1)
        };
        previous
    }

    /// Undo a [`toggle`](Self::toggle) whose backend call failed.
    pub fn revert(&mut self, previous: Self) {
        *self = previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_revert() {
        let mut state = FollowState::new(false, 4);
        let previous = state.toggle();
        assert_eq!(previous, FollowState::new(false, 4));
        assert_eq!(state, FollowState::new(true, 5));
        state.revert(previous);
        assert_eq!(state, FollowState::new(false, 4));
    }

    #[test]
    fn test_count_never_underflows() {
        let mut state = FollowState::new(true, 0);
        state.toggle();
        assert_eq!(state, FollowState::new(false, 0));
    }

    #[test]
    fn test_revert_after_hitting_the_floor_restores_count() {
        let mut state = FollowState::new(true, 0);
        let previous = state.toggle();
        state.revert(previous);
        assert_eq!(state, FollowState::new(true, 0));
    }
}
