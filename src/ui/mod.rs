//! Submit-and-render handler.
//!
//! A page supplies handles for six elements: the trigger, the text input,
//! and four output regions (echoed text, masked markup, detected labels,
//! analysis JSON), plus a way to alert the user. [`SubmitHandler`] reads
//! the input, calls the analyze endpoint once and renders the response
//! into those regions.
//!
//! Two pages ship with the crate: [`TerminalPage`] for the `check` command
//! and [`MemoryPage`] for headless hosts.

mod client;
mod handler;
mod memory;
mod render;
mod terminal;

pub use client::{AnalyzeTransport, HttpAnalyzeClient};
pub use handler::{BusyGuard, SubmitHandler, SubmitOutcome};
pub use memory::{MemoryPage, MemoryState};
pub use render::{
    NO_SENSITIVE_DATA, escape_html, markup_to_terminal, render_analysis, render_label_entries,
    render_masked_markup,
};
pub use terminal::TerminalPage;

use std::sync::Arc;

/// Trigger label while a request is in flight.
pub const BUSY_LABEL: &str = "Analyzing...";

/// Alert shown for empty or whitespace-only input.
pub const EMPTY_INPUT_ALERT: &str = "Please enter a message.";

/// Alert shown when the request fails for any reason.
pub const REQUEST_FAILED_ALERT: &str =
    "An error occurred while analyzing the message. Please try again.";

/// The control that starts an analysis.
pub trait Trigger: Send + Sync {
    /// Current label.
    fn label(&self) -> String;
    /// Replaces the label.
    fn set_label(&self, label: &str);
    /// Whether activation is currently blocked.
    fn is_disabled(&self) -> bool;
    /// Blocks or unblocks activation.
    fn set_disabled(&self, disabled: bool);
}

/// The field holding the user's message.
pub trait TextInput: Send + Sync {
    /// Current value, untrimmed.
    fn value(&self) -> String;
}

/// A region showing plain text. Content is never interpreted as markup.
pub trait TextRegion: Send + Sync {
    /// Replaces the region's text.
    fn set_text(&self, text: &str);
}

/// A region showing HTML markup.
pub trait MarkupRegion: Send + Sync {
    /// Replaces the region's markup.
    fn set_markup(&self, markup: &str);
}

/// A region showing a list with one entry per item.
pub trait ListRegion: Send + Sync {
    /// Clears the list and appends `entries`.
    fn replace_entries(&self, entries: &[String]);
}

/// Blocking user-facing alerts.
pub trait Notifier: Send + Sync {
    /// Shows `message` to the user.
    fn alert(&self, message: &str);
}

/// Handles to the elements the handler reads and writes.
#[derive(Clone)]
pub struct PageElements {
    /// The analyze trigger.
    pub trigger: Arc<dyn Trigger>,
    /// The message input.
    pub input: Arc<dyn TextInput>,
    /// Echo of the original message.
    pub original_text: Arc<dyn TextRegion>,
    /// Masked message markup.
    pub masked_text: Arc<dyn MarkupRegion>,
    /// Detected labels.
    pub sensitive_list: Arc<dyn ListRegion>,
    /// Pretty-printed analysis.
    pub analysis_json: Arc<dyn TextRegion>,
    /// Alerts.
    pub notifier: Arc<dyn Notifier>,
}
