//! Check CLI command.
//!
//! Sends one message to a running server and prints the four result
//! sections, the same way the web page renders them.

use crate::ui::{HttpAnalyzeClient, SubmitHandler, SubmitOutcome, TerminalPage};
use crate::{Error, Result};
use std::io::IsTerminal;
use std::time::Duration;

/// Request timeout for the check command.
const CHECK_TIMEOUT: Duration = Duration::from_secs(120);

/// Analyzes `text` through the server at `base_url`.
pub fn cmd_check(text: &str, base_url: &str) -> Result<SubmitOutcome> {
    let page = TerminalPage::stdio(text, std::io::stdout().is_terminal());
    let handler = SubmitHandler::new(
        page.elements(),
        HttpAnalyzeClient::new(base_url).with_timeout(CHECK_TIMEOUT),
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::OperationFailed {
            operation: "create_runtime".to_string(),
            cause: e.to_string(),
        })?;

    Ok(rt.block_on(handler.activate()))
}
