//! Asynchronous job lifecycle: enqueue, poll until terminal, fetch the result.
//!
//! ```text
//! Submitted ──▶ Polling ──┬─▶ Succeeded   (server: "succeeded")
//!                         ├─▶ Failed      (server: "failed")
//!                         ├─▶ TimedOut    (attempt budget exhausted)
//!                         └─▶ Errored     (transport/API failure, cancellation)
//! ```
//!
//! A [`JobHandle`] is a plain value owned by the caller. The client never caches it, so any
//! number of lifecycles can run against one [`crate::PaperApiClient`] at the same time.
//!
//! ```rust,no_run
//! use paperapi_rust::{PaperApiClient, PdfGenerateRequest, PollPolicy};
//! use std::time::Duration;
//!
//! # async fn run() -> paperapi_rust::Result<()> {
//! let client = PaperApiClient::new("your-api-key")?;
//! let mut job = client.submit_job(&PdfGenerateRequest::new("<h1>Report</h1>")).await?;
//! client
//!     .poll_until_terminal(&mut job, &PollPolicy::fixed(20, Duration::from_secs(3)))
//!     .await?;
//! let pdf = client.fetch_result(&job).await?;
//! # let _ = pdf;
//! # Ok(())
//! # }
//! ```

mod lifecycle;
mod policy;

pub use policy::{Backoff, ExponentialBackoff, FixedBackoff, PollPolicy};

use crate::types::JobStatus;
use std::fmt;

/// Client-observed state of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Submitted,
    Polling,
    Succeeded,
    Failed,
    TimedOut,
    Errored,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Succeeded | JobState::Failed | JobState::TimedOut | JobState::Errored
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Submitted => "submitted",
            JobState::Polling => "polling",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
            JobState::TimedOut => "timed out",
            JobState::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Caller-owned handle to an enqueued job.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: String,
    state: JobState,
    last_status: JobStatus,
    polls: u32,
}

impl JobHandle {
    /// Wrap the status returned by the enqueue call.
    pub fn new(initial: JobStatus) -> Self {
        Self {
            id: initial.id.clone(),
            state: JobState::Submitted,
            last_status: initial,
            polls: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Most recent server snapshot.
    pub fn last_status(&self) -> &JobStatus {
        &self.last_status
    }

    /// Total status polls performed through this handle.
    pub fn polls(&self) -> u32 {
        self.polls
    }

    pub(crate) fn record_poll(&mut self, status: JobStatus) {
        self.polls = self.polls.saturating_add(1);
        self.last_status = status;
    }

    pub(crate) fn transition(&mut self, next: JobState) {
        self.state = next;
    }
}
