//! # paperapi-rust
//!
//! Async Rust client for PaperAPI, a hosted HTML-to-PDF rendering service.
//!
//! ## Overview
//!
//! The client renders HTML to PDF either synchronously (`v1/generate`) or through an
//! asynchronous job: enqueue, poll with a bounded number of attempts, download the result.
//! It also exposes account introspection (usage counters, identity) and a health probe.
//!
//! ## Core Philosophy
//!
//! - **Bounded waiting**: job polling has a hard attempt ceiling and a deterministic backoff
//! - **Fail fast**: nothing is retried automatically; every failure is one typed [`Error`]
//! - **Diagnosable**: server-originated errors keep status, error code, request id and raw body
//! - **Cancellable**: a [`CancellationToken`] aborts in-flight requests and inter-poll waits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paperapi_rust::{PaperApiClient, PdfGenerateRequest, PdfOptions, PollPolicy};
//!
//! #[tokio::main]
//! async fn main() -> paperapi_rust::Result<()> {
//!     let client = PaperApiClient::builder()
//!         .api_key("your-api-key")
//!         .build()?;
//!
//!     let request = PdfGenerateRequest::new("<h1>Invoice</h1>")
//!         .with_options(PdfOptions::new().page_size("A4"));
//!
//!     // Synchronous rendering
//!     let pdf = client.generate_pdf(&request).await?;
//!
//!     // Asynchronous job, polled every 2 s for at most 30 attempts
//!     let pdf_via_job = client
//!         .generate_pdf_via_job(&request, &PollPolicy::default())
//!         .await?;
//!
//!     # let _ = (pdf, pdf_via_job);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Client, builder and error classification |
//! | [`jobs`] | Job handle, lifecycle state machine, polling policy |
//! | [`transport`] | HTTP transport seam and the reqwest implementation |
//! | [`response`] | Response schemas and validation |
//! | [`types`] | Request and response payloads |
//! | [`config`] | Client configuration |

pub mod client;
pub mod config;
pub mod jobs;
pub mod response;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use client::{ApiError, ErrorClass, PaperApiClient, PaperApiClientBuilder};
pub use config::ClientConfig;
pub use jobs::{Backoff, ExponentialBackoff, FixedBackoff, JobHandle, JobState, PollPolicy};
pub use tokio_util::sync::CancellationToken;
pub use transport::{Transport, TransportRequest, TransportResponse};
pub use types::{
    AccountProfile, JobLinks, JobStatus, PdfGenerateRequest, PdfOptions, PlanDescriptor,
    ServerJobStatus, UsageSummary,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
