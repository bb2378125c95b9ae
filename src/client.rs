//! PaperAPI client.
//!
//! Keep the public surface small and predictable. Implementation details are split into
//! submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod error_classification;

pub use builder::PaperApiClientBuilder;
pub use core::PaperApiClient;
pub use error_classification::{classify, ApiError, ErrorClass};
