use super::{JobHandle, JobState, PollPolicy};
use crate::client::PaperApiClient;
use crate::types::{JobStatus, PdfGenerateRequest, ServerJobStatus};
use crate::{Error, Result};
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, info, warn};

const FAILED_WITHOUT_MESSAGE: &str = "PaperAPI reported the job as failed without an error message";

impl PaperApiClient {
    /// Enqueue a render job. Validation or transport failures abort before a handle exists.
    pub async fn submit_job(&self, request: &PdfGenerateRequest) -> Result<JobHandle> {
        let initial = self.enqueue_pdf_job(request).await?;
        info!(
            job_id = initial.id.as_str(),
            status = initial.status.as_str(),
            "pdf job enqueued"
        );
        Ok(JobHandle::new(initial))
    }

    /// Poll the job until the server reports a terminal status or the attempt budget runs out.
    ///
    /// - `succeeded` (any case): returns the final status immediately.
    /// - `failed` (any case): [`Error::JobFailed`], never retried.
    /// - any other status: waits `policy.backoff.next_delay(attempt)` and polls again; there is
    ///   no wait after the last attempt.
    /// - budget exhausted: [`Error::PollingTimedOut`].
    /// - any transport, API or response error: propagated at once, handle moves to `Errored`.
    ///
    /// A handle already in `Succeeded` or `Failed` answers from its last snapshot without network
    /// activity. `TimedOut` and `Errored` handles resume polling with a fresh budget.
    pub async fn poll_until_terminal(
        &self,
        handle: &mut JobHandle,
        policy: &PollPolicy,
    ) -> Result<JobStatus> {
        policy.validate()?;

        match handle.state() {
            JobState::Succeeded => return Ok(handle.last_status().clone()),
            JobState::Failed => return Err(job_failed(handle.id(), handle.last_status())),
            _ => {}
        }

        handle.transition(JobState::Polling);

        for attempt in 1..=policy.max_attempts {
            let polled = self.get_job_status(handle.id()).await;
            let status = match polled {
                Ok(status) => status,
                Err(e) => return Err(errored(handle, attempt, e)),
            };
            handle.record_poll(status.clone());

            let phase = status.phase();
            debug!(
                job_id = handle.id(),
                attempt,
                max_attempts = policy.max_attempts,
                status = status.status.as_str(),
                "polled pdf job"
            );

            match phase {
                ServerJobStatus::Succeeded => {
                    handle.transition(JobState::Succeeded);
                    info!(job_id = handle.id(), attempts = attempt, "pdf job succeeded");
                    return Ok(status);
                }
                ServerJobStatus::Failed => {
                    handle.transition(JobState::Failed);
                    let err = job_failed(handle.id(), &status);
                    info!(job_id = handle.id(), attempts = attempt, error = %err, "pdf job failed");
                    return Err(err);
                }
                ServerJobStatus::Queued
                | ServerJobStatus::Processing
                | ServerJobStatus::Other(_) => {}
            }

            if attempt < policy.max_attempts {
                let delay = policy.backoff.next_delay(attempt);
                if let Err(e) = self.pause(delay).await {
                    return Err(errored(handle, attempt, e));
                }
            }
        }

        handle.transition(JobState::TimedOut);
        warn!(
            job_id = handle.id(),
            attempts = policy.max_attempts,
            last_status = handle.last_status().status.as_str(),
            "pdf job polling timed out"
        );
        Err(Error::PollingTimedOut {
            job_id: handle.id().to_string(),
            attempts: policy.max_attempts,
        })
    }

    /// Download the finished PDF. Only valid once the handle reached `Succeeded`; otherwise this
    /// fails locally with [`Error::InvalidJobState`] and performs no request.
    pub async fn fetch_result(&self, handle: &JobHandle) -> Result<Bytes> {
        if handle.state() != JobState::Succeeded {
            return Err(Error::InvalidJobState {
                job_id: handle.id().to_string(),
                state: handle.state(),
            });
        }
        self.download_job_result(handle.id()).await
    }

    /// Enqueue, poll and download in one call.
    pub async fn generate_pdf_via_job(
        &self,
        request: &PdfGenerateRequest,
        policy: &PollPolicy,
    ) -> Result<Bytes> {
        policy.validate()?;
        let mut handle = self.submit_job(request).await?;
        self.poll_until_terminal(&mut handle, policy).await?;
        self.fetch_result(&handle).await
    }

    /// Inter-poll wait, cut short by cancellation.
    async fn pause(&self, delay: Duration) -> Result<()> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Cancelled),
                    _ = tokio::time::sleep(delay) => Ok(()),
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

fn job_failed(job_id: &str, status: &JobStatus) -> Error {
    let message = status
        .error_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(FAILED_WITHOUT_MESSAGE);
    Error::JobFailed {
        job_id: job_id.to_string(),
        message: message.to_string(),
    }
}

fn errored(handle: &mut JobHandle, attempt: u32, err: Error) -> Error {
    handle.transition(JobState::Errored);
    if err.is_cancelled() {
        warn!(job_id = handle.id(), attempt, "pdf job polling cancelled");
    } else {
        warn!(job_id = handle.id(), attempt, error = %err, "pdf job polling aborted");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};
    use tokio_util::sync::CancellationToken;

    struct Offline;

    #[async_trait]
    impl Transport for Offline {
        async fn send(
            &self,
            request: TransportRequest,
            _cancel: Option<&CancellationToken>,
        ) -> Result<TransportResponse> {
            Err(Error::Transport(TransportError::Other(format!(
                "offline: {}",
                request.path
            ))))
        }
    }

    fn client() -> PaperApiClient {
        PaperApiClient::builder()
            .api_key("k")
            .transport(Arc::new(Offline))
            .build()
            .unwrap()
    }

    fn status(status: &str, error_message: Option<&str>) -> JobStatus {
        serde_json::from_value(serde_json::json!({
            "id": "job-1",
            "status": status,
            "errorMessage": error_message,
            "createdAt": "2026-03-01T12:00:00Z",
            "expiresAt": "2026-03-02T12:00:00Z",
            "links": { "self": "/v1/jobs/job-1" }
        }))
        .unwrap()
    }

    #[test]
    fn pause_is_cut_short_by_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let cancelled = client().with_cancellation(token);
        let err = assert_err!(tokio_test::block_on(
            cancelled.pause(Duration::from_secs(3600))
        ));
        assert!(err.is_cancelled());

        assert_ok!(tokio_test::block_on(client().pause(Duration::ZERO)));
    }

    #[test]
    fn errored_handle_cannot_fetch_result() {
        let mut handle = JobHandle::new(status("queued", None));
        handle.transition(JobState::Errored);
        let err = assert_err!(tokio_test::block_on(client().fetch_result(&handle)));
        assert!(matches!(
            err,
            Error::InvalidJobState {
                state: JobState::Errored,
                ..
            }
        ));
    }

    #[test]
    fn job_failed_prefers_server_message() {
        let err = job_failed("job-1", &status("failed", Some("  render error ")));
        assert_eq!(err.to_string(), "PDF job job-1 failed: render error");

        let err = job_failed("job-1", &status("failed", None));
        assert!(err.to_string().ends_with(FAILED_WITHOUT_MESSAGE));
    }

    #[test]
    fn offline_poll_marks_handle_errored() {
        let mut handle = JobHandle::new(status("queued", None));
        let policy = PollPolicy::fixed(3, Duration::ZERO);
        let err = assert_err!(tokio_test::block_on(
            client().poll_until_terminal(&mut handle, &policy)
        ));
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(handle.state(), JobState::Errored);
        assert_eq!(handle.polls(), 0);
    }
}
