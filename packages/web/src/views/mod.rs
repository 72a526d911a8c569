mod layouts;
pub use layouts::{AppLayout, PublicLayout};

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod password;
pub use password::{ForgotPassword, ResetPassword};

mod events;
pub use events::{EventDetail, EventList};

mod event_form;
pub use event_form::{EventCreate, EventEdit};

mod favorites;
pub use favorites::Favorites;

mod feed;
pub use feed::{Feed, PostCreate};

mod map;
pub use map::EventMap;

mod search;
pub use search::UserSearch;

mod profile;
pub use profile::{Followers, Following, ProfileView};

mod notifications;
pub use notifications::Notifications;

mod tickets;
pub use tickets::{MyTickets, TicketDetail};

pub mod checkout;
pub mod settings;

mod not_found;
pub use not_found::NotFound;

/// The validation message for `field`, if the last check failed on it.
pub(crate) fn message_for(error: &Option<api::ValidationError>, field: &str) -> Option<String> {
    error
        .as_ref()
        .filter(|e| e.field == field)
        .map(|e| e.message.clone())
}
