use crate::client::error_classification::classify;
use crate::config::ClientConfig;
use crate::response::{self, ResponseSchema};
use crate::transport::{Transport, TransportRequest, TransportResponse, ACCEPT_JSON, ACCEPT_PDF};
use crate::types::{AccountProfile, JobStatus, PdfGenerateRequest, UsageSummary};
use crate::{Error, ErrorContext, Result};
use bytes::Bytes;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Async client for PaperAPI.
///
/// The client holds no per-job state: it is cheap to clone and can drive any number of job
/// lifecycles concurrently. Cancellation is attached with [`PaperApiClient::with_cancellation`].
#[derive(Clone)]
pub struct PaperApiClient {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for PaperApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperApiClient")
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

impl PaperApiClient {
    /// Client for the default endpoint.
    pub fn new(api_key: impl AsRef<str>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_key)?)
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        crate::client::builder::PaperApiClientBuilder::new()
            .config(config)
            .build()
    }

    pub fn builder() -> crate::client::builder::PaperApiClientBuilder {
        crate::client::builder::PaperApiClientBuilder::new()
    }

    /// A clone whose every call (including job polling waits) stops when `token` is cancelled.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: self.transport.clone(),
            cancel: Some(token),
        }
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Render HTML synchronously and return the PDF bytes.
    pub async fn generate_pdf(&self, request: &PdfGenerateRequest) -> Result<Bytes> {
        request.validate()?;
        let body = Self::encode(request)?;
        self.send_for_binary(TransportRequest::post_json("v1/generate", ACCEPT_PDF, body))
            .await
    }

    /// Enqueue a background render job and return its initial status.
    pub async fn enqueue_pdf_job(&self, request: &PdfGenerateRequest) -> Result<JobStatus> {
        request.validate()?;
        let body = Self::encode(request)?;
        self.send_for_json(TransportRequest::post_json(
            "v1/generate-async",
            ACCEPT_JSON,
            body,
        ))
        .await
    }

    pub async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        let id = ensure_job_id(job_id)?;
        self.send_for_json(TransportRequest::get(format!("v1/jobs/{}", id), ACCEPT_JSON))
            .await
    }

    /// Download the PDF produced by a job. Prefer [`PaperApiClient::fetch_result`] when driving
    /// a [`crate::jobs::JobHandle`].
    pub async fn download_job_result(&self, job_id: &str) -> Result<Bytes> {
        let id = ensure_job_id(job_id)?;
        self.send_for_binary(TransportRequest::get(
            format!("v1/jobs/{}/result", id),
            ACCEPT_PDF,
        ))
        .await
    }

    pub async fn get_usage_summary(&self) -> Result<UsageSummary> {
        self.send_for_json(TransportRequest::get("v1/usage", ACCEPT_JSON))
            .await
    }

    pub async fn get_who_am_i(&self) -> Result<AccountProfile> {
        self.send_for_json(TransportRequest::get("v1/whoami", ACCEPT_JSON))
            .await
    }

    /// `true` when the service answers 2xx; any other status is an error.
    pub async fn check_health(&self) -> Result<bool> {
        self.send(TransportRequest::get("health", ACCEPT_JSON))
            .await?;
        Ok(true)
    }

    fn encode(request: &PdfGenerateRequest) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(&request.normalized())?))
    }

    /// One round trip; non-2xx responses become [`Error::Api`].
    pub(crate) async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(Error::Cancelled);
        }

        let path = request.path.clone();
        let start = std::time::Instant::now();
        let resp = self.transport.send(request, self.cancel.as_ref()).await?;

        if !resp.is_success() {
            let err = classify(&resp, &path);
            info!(
                http_status = err.status,
                error_code = err.error_code.as_deref().unwrap_or(""),
                request_id = err.request_id.as_deref().unwrap_or(""),
                endpoint = path.as_str(),
                duration_ms = start.elapsed().as_millis(),
                "paperapi request failed"
            );
            return Err(Error::Api(err));
        }

        Ok(resp)
    }

    async fn send_for_json<T: ResponseSchema>(&self, request: TransportRequest) -> Result<T> {
        let path = request.path.clone();
        let resp = self.send(request).await?;
        response::parse_json(&resp, &path)
    }

    async fn send_for_binary(&self, request: TransportRequest) -> Result<Bytes> {
        let resp = self.send(request).await?;
        Ok(response::read_binary(resp))
    }
}

/// Job ids are opaque but must form a single path segment.
fn ensure_job_id(job_id: &str) -> Result<&str> {
    let id = job_id.trim();
    if id.is_empty() {
        return Err(Error::validation_with_context(
            "jobId must be a non-empty string",
            ErrorContext::new()
                .with_field_path("job_id")
                .with_source("request_validator"),
        ));
    }
    if id.contains(['/', '?', '#']) {
        return Err(Error::validation_with_context(
            "jobId must not contain '/', '?' or '#'",
            ErrorContext::new()
                .with_field_path("job_id")
                .with_details(id.to_string())
                .with_source("request_validator"),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_must_be_a_single_segment() {
        assert_eq!(ensure_job_id(" abc ").unwrap(), "abc");
        assert!(matches!(ensure_job_id("  "), Err(Error::Validation { .. })));
        assert!(matches!(
            ensure_job_id("abc/../usage"),
            Err(Error::Validation { .. })
        ));
    }
}
