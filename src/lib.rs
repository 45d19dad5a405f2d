//! # Scamguard
//!
//! Masks sensitive data in a message before asking an LLM whether the
//! message looks like a scam.
//!
//! The crate has three parts:
//!
//! - [`masking`]: replaces phone numbers, e-mail IDs, UPI IDs and other
//!   sensitive spans with `[MASKED_<LABEL>]` tokens.
//! - [`services`] and [`server`]: the `POST /analyze` endpoint that masks a
//!   message, sends only the masked text to the model and returns both views.
//! - [`ui`]: the submit-and-render handler that drives the endpoint from a
//!   page (the bundled terminal page, or any other host implementing the
//!   page traits).
//!
//! ## Example
//!
//! ```rust
//! use scamguard::masking::SensitiveDataMasker;
//!
//! let result = SensitiveDataMasker::new().mask("Call 9876543210 or pay via test@upi");
//! assert_eq!(result.masked_text, "Call [MASKED_PHONE] or pay via [MASKED_UPI]");
//! assert_eq!(result.detected_items, vec!["Phone Number", "UPI ID"]);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod llm;
pub mod masking;
pub mod models;
pub mod observability;
pub mod server;
pub mod services;
pub mod ui;

pub use config::ScamguardConfig;
pub use llm::LlmProvider;
pub use masking::{MaskResult, SensitiveDataMasker};
pub use models::{AnalyzeRequest, AnalyzeResponse};
pub use services::AnalysisService;

/// Error type for scamguard operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Missing API key, invalid bind address |
/// | `OperationFailed` | I/O, HTTP transport, JSON decoding, exhausted model fallback |
/// | `RequestFailed` | An LLM API or the analyze endpoint answered with a non-success status |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A remote endpoint returned a non-success status code.
    #[error("request failed with status {status}: {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
}

/// Result type alias for scamguard operations.
pub type Result<T> = std::result::Result<T, Error>;
