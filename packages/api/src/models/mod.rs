//! # Rows of the backend's tables and the client-side state built on them
//!
//! | Module | Table(s) | Client-side state |
//! |--------|----------|-------------------|
//! | [`profile`] | `profiles` | |
//! | [`event`] | `events`, `favorites` | |
//! | [`notification`] | `notifications` | [`NotificationList`] |
//! | [`follow`] | `follows` | [`FollowState`] |
//! | [`post`] | `posts`, `post_likes` | [`LikeState`] |
//! | [`ticket`] | `tickets` | |
//!
//! Rows are owned by the backend; the client treats them as opaque records and
//! only keeps optimistic copies of counters and flags.

pub mod event;
pub mod follow;
pub mod notification;
pub mod post;
pub mod profile;
pub mod ticket;

pub use event::{Event, EventFilter, EventSummary, Favorite, NewEvent, CATEGORIES};
pub use follow::{Follow, FollowState};
pub use notification::{NewNotification, Notification, NotificationKind, NotificationList};
pub use post::{LikeState, NewPost, Post};
pub use profile::{NotificationPreferences, Profile, ProfileSummary, ProfileUpdate};
pub use ticket::{Ticket, TicketKind, TicketStatus};
