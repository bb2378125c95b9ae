use super::{Transport, TransportError, TransportRequest, TransportResponse};
use crate::config::ClientConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Header identifying the SDK to the service.
pub const CLIENT_HEADER: &str = "x-paperapi-client";
/// Our own per-call correlation id. The service may ignore it.
pub const CLIENT_REQUEST_ID_HEADER: &str = "x-paperapi-client-request-id";

/// reqwest-backed transport with bearer authentication.
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = self.config.endpoint(&request.path)?;
        let client_request_id = Uuid::new_v4().to_string();

        debug!(
            method = %request.method,
            path = request.path.as_str(),
            client_request_id = client_request_id.as_str(),
            "paperapi request"
        );

        let mut req = self
            .client
            .request(request.method, url)
            .bearer_auth(self.config.api_key())
            .header(ACCEPT, request.accept)
            .header(CLIENT_HEADER, self.config.user_agent.as_str())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(CLIENT_REQUEST_ID_HEADER, client_request_id.as_str())
            .headers(request.headers);

        if let Some(body) = request.body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: TransportRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<TransportResponse> {
        match cancel {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                // Dropping the request future aborts the connection and any pending body read.
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Cancelled),
                    res = self.execute(request) => res,
                }
            }
            None => self.execute(request).await,
        }
    }
}
