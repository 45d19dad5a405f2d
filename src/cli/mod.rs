//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `serve` | Run the HTTP server |
//! | `check` | Analyze one message through a running server |
//! | `mask` | Mask a message locally and print the result |
//!
//! # Example Usage
//!
//! ```bash
//! # Start the server on 0.0.0.0:5000
//! scamguard serve
//!
//! # Ask it about a message
//! scamguard check "Your account is locked, pay via test@upi"
//!
//! # See what would be masked, without calling an LLM
//! scamguard mask "Call 9876543210"
//! ```

mod check;
mod llm_factory;
mod mask;
mod serve;

pub use check::cmd_check;
pub use llm_factory::{
    build_analysis_service, build_fallback_config, build_gemini_client, build_llm_provider,
    build_openai_client,
};
pub use mask::cmd_mask;
pub use serve::cmd_serve;
