use crate::client::core::PaperApiClient;
use crate::config::ClientConfig;
use crate::transport::{HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builder for creating clients with custom configuration.
///
/// Keep this surface area small and predictable.
pub struct PaperApiClientBuilder {
    config: Option<ClientConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl PaperApiClientBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            api_key: None,
            base_url: None,
            timeout: None,
            user_agent: None,
            transport: None,
        }
    }

    /// Use a pre-validated config. Individual setters below still override its fields.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the base URL (self-hosted deployments, mock servers in tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout of the default HTTP transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the HTTP transport. The injected transport is responsible for authentication.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<PaperApiClient> {
        let mut config = resolve_config(self.config, self.api_key, self.base_url)?;

        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(ua) = self.user_agent {
            config.user_agent = ua;
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        debug!(
            base_url = config.base_url().as_str(),
            timeout_ms = config.timeout.as_millis(),
            "paperapi client ready"
        );

        Ok(PaperApiClient {
            transport,
            cancel: None,
        })
    }
}

/// Setters override the matching fields of an explicit config; everything else is kept.
fn resolve_config(
    config: Option<ClientConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
) -> Result<ClientConfig> {
    match (config, api_key) {
        (Some(cfg), key) => {
            let key = key.unwrap_or_else(|| cfg.api_key().to_string());
            let base_url = base_url.unwrap_or_else(|| cfg.base_url().to_string());
            let mut merged = ClientConfig::with_base_url(key, Some(base_url))?;
            merged.timeout = cfg.timeout;
            merged.user_agent = cfg.user_agent;
            Ok(merged)
        }
        (None, Some(key)) => ClientConfig::with_base_url(key, base_url),
        (None, None) => Err(Error::configuration_with_context(
            "PaperApiClient requires an api key",
            ErrorContext::new()
                .with_field_path("config.api_key")
                .with_source("client_builder"),
        )),
    }
}

impl Default for PaperApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = PaperApiClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = PaperApiClientBuilder::new()
            .api_key("k")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn builds_with_defaults() {
        let client = PaperApiClientBuilder::new()
            .api_key("k")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert!(client.cancellation().is_none());
    }

    #[test]
    fn api_key_override_keeps_the_rest_of_the_config() {
        let mut cfg =
            ClientConfig::with_base_url("old-key", Some("http://localhost:9000/api")).unwrap();
        cfg.timeout = Duration::from_secs(7);
        cfg.user_agent = "custom-agent/1".into();

        let merged = resolve_config(Some(cfg.clone()), Some("new-key".into()), None).unwrap();
        assert_eq!(merged.api_key(), "new-key");
        assert_eq!(merged.base_url().as_str(), "http://localhost:9000/api/");
        assert_eq!(merged.timeout, Duration::from_secs(7));
        assert_eq!(merged.user_agent, "custom-agent/1");

        let rebased =
            resolve_config(Some(cfg), None, Some("https://pdf.example.com".into())).unwrap();
        assert_eq!(rebased.api_key(), "old-key");
        assert_eq!(rebased.base_url().as_str(), "https://pdf.example.com/");
        assert_eq!(rebased.timeout, Duration::from_secs(7));
    }
}
