//! Client configuration.
//!
//! The library never reads ambient state on its own. [`ClientConfig::from_env`] is an explicit,
//! opt-in helper for binaries and examples.

use crate::{Error, ErrorContext, Result};
use std::time::Duration;
use url::Url;

/// Public PaperAPI cloud endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.paperapi.de/";

pub const API_KEY_ENV: &str = "PAPERAPI_API_KEY";
pub const BASE_URL_ENV: &str = "PAPERAPI_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Validated connection settings for a [`crate::PaperApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Build a config for the default endpoint.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        Self::with_base_url(api_key, None::<&str>)
    }

    /// Build a config with an optional base URL override. A blank override means the default.
    pub fn with_base_url(api_key: impl AsRef<str>, base_url: Option<impl AsRef<str>>) -> Result<Self> {
        let api_key = api_key.as_ref().trim();
        if api_key.is_empty() {
            return Err(Error::configuration_with_context(
                "PaperApiClient requires a non-empty api key",
                ErrorContext::new()
                    .with_field_path("config.api_key")
                    .with_source("client_config"),
            ));
        }

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: resolve_base_url(base_url.as_ref().map(AsRef::<str>::as_ref))?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        })
    }

    /// Read `PAPERAPI_API_KEY` and `PAPERAPI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            Error::configuration_with_context(
                format!("Missing environment variable {}", API_KEY_ENV),
                ErrorContext::new()
                    .with_field_path(API_KEY_ENV)
                    .with_source("client_config"),
            )
        })?;
        let base_url = std::env::var(BASE_URL_ENV).ok();
        Self::with_base_url(api_key, base_url)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL, always ending with `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative endpoint path (e.g. `v1/usage`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            Error::configuration_with_context(
                format!("Cannot resolve endpoint '{}'", path),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(e.to_string())
                    .with_source("client_config"),
            )
        })
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("paperapi-rust/{}", env!("CARGO_PKG_VERSION"))
}

fn resolve_base_url(raw: Option<&str>) -> Result<Url> {
    let value = match raw.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => DEFAULT_BASE_URL,
    };
    let normalized = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{}/", value)
    };

    let invalid = |details: String| {
        Error::configuration_with_context(
            "PaperApiClient base url must be an absolute URL",
            ErrorContext::new()
                .with_field_path("config.base_url")
                .with_details(details)
                .with_source("client_config"),
        )
    };

    let url = Url::parse(&normalized).map_err(|e| invalid(format!("{}: {}", value, e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("{}: expected an http(s) URL", value)));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_is_rejected() {
        let err = ClientConfig::new("   ").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn api_key_is_trimmed() {
        let cfg = ClientConfig::new("  key-123 \n").unwrap();
        assert_eq!(cfg.api_key(), "key-123");
    }

    #[test]
    fn defaults_to_production_endpoint() {
        let cfg = ClientConfig::new("k").unwrap();
        assert_eq!(cfg.base_url().as_str(), DEFAULT_BASE_URL);

        let blank = ClientConfig::with_base_url("k", Some("  ")).unwrap();
        assert_eq!(blank.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let cfg = ClientConfig::with_base_url("k", Some("http://localhost:8080/api")).unwrap();
        assert_eq!(cfg.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            cfg.endpoint("v1/jobs/abc").unwrap().as_str(),
            "http://localhost:8080/api/v1/jobs/abc"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        for bad in ["api.paperapi.de", "/v1/", "mailto:someone@example.com"] {
            let err = ClientConfig::with_base_url("k", Some(bad)).unwrap_err();
            assert!(
                matches!(err, Error::Configuration { .. }),
                "{} should be rejected",
                bad
            );
        }
    }
}
