//! Who may see which route.

use ui::AuthStatus;

use crate::Route;

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Allow,
    /// The stored session is still being restored.
    Wait,
    Redirect(Route),
}

/// Signed-in pages: anyone else goes to login, remembering where they were headed.
pub fn protected(status: AuthStatus, requested: &Route) -> Access {
    match status {
        AuthStatus::Loading => Access::Wait,
        AuthStatus::SignedIn => Access::Allow,
        AuthStatus::SignedOut => Access::Redirect(Route::Login {
            redirect: requested.to_string(),
        }),
    }
}

/// Login, sign-up and recovery: a signed-in user moves on.
pub fn public_only(status: AuthStatus, current: &Route) -> Access {
    match status {
        AuthStatus::SignedIn => {
            let redirect = match current {
                Route::Login { redirect } => redirect.as_str(),
                _ => "",
            };
            Access::Redirect(after_login(redirect))
        }
        // Auth pages are usable while the session restores
        AuthStatus::Loading | AuthStatus::SignedOut => Access::Allow,
    }
}

/// Where to land after signing in. Only paths of signed-in pages are honoured.
pub fn after_login(redirect: &str) -> Route {
    if !redirect.starts_with('/') || redirect.starts_with("//") {
        return Route::EventList {};
    }
    match redirect.parse::<Route>() {
        Ok(route) if !route.is_public_only() && !matches!(route, Route::NotFound { .. } | Route::ResetPassword {}) => {
            route
        }
        _ => Route::EventList {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_guarded_routes_redirect_to_login_with_target() {
        let id = Uuid::from_u128(7);
        let requested = Route::EventDetail { id };
        assert_eq!(
            protected(AuthStatus::SignedOut, &requested),
            Access::Redirect(Route::Login {
                redirect: format!("/eventos/{id}")
            })
        );
        assert_eq!(protected(AuthStatus::Loading, &requested), Access::Wait);
        assert_eq!(protected(AuthStatus::SignedIn, &requested), Access::Allow);
    }

    #[test]
    fn test_public_pages_send_signed_in_users_on() {
        let login = Route::Login {
            redirect: "/feed".to_string(),
        };
        assert_eq!(
            public_only(AuthStatus::SignedIn, &login),
            Access::Redirect(Route::Feed {})
        );
        assert_eq!(
            public_only(AuthStatus::SignedIn, &Route::Register {}),
            Access::Redirect(Route::EventList {})
        );
        assert_eq!(public_only(AuthStatus::SignedOut, &login), Access::Allow);
        assert_eq!(public_only(AuthStatus::Loading, &login), Access::Allow);
    }

    #[test]
    fn test_after_login_rejects_foreign_and_public_targets() {
        assert_eq!(after_login(""), Route::EventList {});
        assert_eq!(after_login("https://evil.example"), Route::EventList {});
        assert_eq!(after_login("//evil.example/eventos"), Route::EventList {});
        assert_eq!(after_login("/cadastro"), Route::EventList {});
        assert_eq!(after_login("/nao-existe"), Route::EventList {});
        assert_eq!(after_login("/configuracoes/conta"), Route::SettingsAccount {});
        let event_id = Uuid::from_u128(9);
        assert_eq!(
            after_login(&format!("/compra-ingresso/{event_id}/dados")),
            Route::CheckoutHolder { event_id }
        );
    }

    #[test]
    fn test_is_public_only() {
        assert!(Route::Register {}.is_public_only());
        assert!(!Route::Feed {}.is_public_only());
        assert!(!Route::ResetPassword {}.is_public_only());
    }
}
