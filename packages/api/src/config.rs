//! Backend configuration from environment variables.
//!
//! Native builds read `.env` through `dotenvy` and then the process environment.
//! Browser builds have no process environment, so the same variables are baked in
//! at compile time.

use crate::error::BackendError;

/// Variable holding the hosted backend's base URL (e.g. `https://xyz.supabase.co`).
pub const BACKEND_URL_VAR: &str = "AGITO_BACKEND_URL";
/// Variable holding the backend's public (anon) API key.
pub const BACKEND_ANON_KEY_VAR: &str = "AGITO_BACKEND_ANON_KEY";
/// Variable holding the public URL this client is served from.
pub const SITE_URL_VAR: &str = "AGITO_SITE_URL";

const DEFAULT_SITE_URL: &str = "http://localhost:8080";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
    pub site_url: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: trim_base_url(url.into()),
            anon_key: anon_key.into(),
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }

    /// Builder method to set the site URL used for auth redirects.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = trim_base_url(site_url.into());
        self
    }

    /// Load the configuration for the current target.
    pub fn from_env() -> Result<Self, BackendError> {
        let url = lookup(BACKEND_URL_VAR)
            .ok_or_else(|| BackendError::Config(format!("{BACKEND_URL_VAR} not set")))?;
        let anon_key = lookup(BACKEND_ANON_KEY_VAR)
            .ok_or_else(|| BackendError::Config(format!("{BACKEND_ANON_KEY_VAR} not set")))?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BackendError::Config(format!(
                "{BACKEND_URL_VAR} must be an http(s) URL, got {url:?}"
            )));
        }

        let config = Self::new(url, anon_key);
        Ok(match lookup(SITE_URL_VAR) {
            Some(site) => config.with_site_url(site),
            None => config,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn lookup(name: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(target_arch = "wasm32")]
fn lookup(name: &str) -> Option<String> {
    let value = match name {
        BACKEND_URL_VAR => option_env!("AGITO_BACKEND_URL"),
        BACKEND_ANON_KEY_VAR => option_env!("AGITO_BACKEND_ANON_KEY"),
        SITE_URL_VAR => option_env!("AGITO_SITE_URL"),
        _ => None,
    };
    value.map(str::to_string).filter(|v| !v.trim().is_empty())
}

fn trim_base_url(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_strips_trailing_slashes() {
        let config = BackendConfig::new("https://demo.supabase.co//", "anon");
        assert_eq!(config.url, "https://demo.supabase.co");
        assert_eq!(config.site_url, "http://localhost:8080");
    }

    #[test]
    fn test_with_site_url() {
        let config = BackendConfig::new("https://demo.supabase.co", "anon")
            .with_site_url("https://agito.app/");
        assert_eq!(config.site_url, "https://agito.app");
    }
}
