//! Request and response payloads exchanged with PaperAPI.

pub mod account;
pub mod job;
pub mod request;

pub use account::{AccountProfile, PlanDescriptor, UsageSummary};
pub use job::{JobLinks, JobStatus, ServerJobStatus};
pub use request::{PdfGenerateRequest, PdfOptions};
