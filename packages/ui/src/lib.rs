//! This crate contains all shared UI for the Agito web client: context providers,
//! reusable components, and the helpers pages use to reach the backend and local
//! storage.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub const UI_CSS: Asset = asset!("/assets/ui.css");

mod backend;
pub use backend::{use_backend, BackendProvider};

mod storage;
pub use storage::{clear_drafts, draft_slot, make_store, session_slot, AppStore};

mod timer;
pub use timer::sleep;

pub mod format;

mod auth;
pub use auth::{establish_session, sign_out, use_auth, AuthProvider, AuthState, AuthStatus, SignOutButton};

mod notifications;
pub use notifications::{use_notifications, NotificationBell, NotificationsProvider};

mod checkout;
pub use checkout::{use_checkout, CheckoutProvider, CheckoutState};

mod navbar;
pub use navbar::Navbar;

mod avatar;
pub use avatar::Avatar;

mod event_card;
pub use event_card::EventCard;

mod follow_button;
pub use follow_button::FollowButton;

mod like_button;
pub use like_button::LikeButton;

mod markdown;
pub use markdown::{render_markdown, Markdown};

pub mod images;
pub use images::ImagePicker;

pub mod geolocation;

pub mod cropper;
pub use cropper::ImageCropper;
