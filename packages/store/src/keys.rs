//! Keys under which the client persists its documents.

use std::fmt::Display;

/// Current auth session.
pub const SESSION: &str = "agito.session";

const CHECKOUT_PREFIX: &str = "agito.checkout.";

/// Checkout draft for one event.
pub fn checkout_draft(event_id: impl Display) -> String {
    format!("{CHECKOUT_PREFIX}{event_id}")
}

/// Prefix shared by every checkout draft, for clearing them on sign-out.
pub fn checkout_prefix() -> &'static str {
    CHECKOUT_PREFIX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_keys_share_prefix() {
        let key = checkout_draft("e1");
        assert_eq!(key, "agito.checkout.e1");
        assert!(key.starts_with(checkout_prefix()));
        assert!(!SESSION.starts_with(checkout_prefix()));
    }
}
