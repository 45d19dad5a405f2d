//! Terminal page used by the `check` command.

use super::render::markup_to_terminal;
use super::{ListRegion, MarkupRegion, Notifier, PageElements, TextInput, TextRegion, Trigger};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

struct Inner {
    input: String,
    color: bool,
    label: Mutex<String>,
    disabled: AtomicBool,
    out: SharedWriter,
    err: SharedWriter,
}

impl Inner {
    fn write_to(writer: &SharedWriter, text: &str) {
        let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(writer, "{text}").and_then(|()| writer.flush()) {
            tracing::warn!("Failed to write to terminal: {e}");
        }
    }

    fn section(&self, heading: &str, body: &str) {
        Self::write_to(&self.out, &format!("{heading}:\n{body}\n"));
    }
}

/// A page rendered as headed sections on a terminal.
///
/// Regions print to the output stream as they are filled; alerts and the
/// busy label go to the error stream.
#[derive(Clone)]
pub struct TerminalPage {
    inner: Arc<Inner>,
}

impl TerminalPage {
    /// Creates a page writing to arbitrary streams.
    #[must_use]
    pub fn new(
        input: impl Into<String>,
        color: bool,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                input: input.into(),
                color,
                label: Mutex::new("Analyze".to_string()),
                disabled: AtomicBool::new(false),
                out: Arc::new(Mutex::new(out)),
                err: Arc::new(Mutex::new(err)),
            }),
        }
    }

    /// Creates a page on stdout and stderr.
    #[must_use]
    pub fn stdio(input: impl Into<String>, color: bool) -> Self {
        Self::new(
            input,
            color,
            Box::new(std::io::stdout()),
            Box::new(std::io::stderr()),
        )
    }

    /// Returns element handles backed by this page.
    #[must_use]
    pub fn elements(&self) -> PageElements {
        PageElements {
            trigger: Arc::new(self.clone()),
            input: Arc::new(self.clone()),
            original_text: Arc::new(Section {
                page: self.clone(),
                heading: "Original message",
            }),
            masked_text: Arc::new(self.clone()),
            sensitive_list: Arc::new(self.clone()),
            analysis_json: Arc::new(Section {
                page: self.clone(),
                heading: "Analysis",
            }),
            notifier: Arc::new(self.clone()),
        }
    }
}

impl Trigger for TerminalPage {
    fn label(&self) -> String {
        self.inner
            .label
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_label(&self, label: &str) {
        let mut current = self
            .inner
            .label
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *current = label.to_string();
    }

    fn is_disabled(&self) -> bool {
        self.inner.disabled.load(Ordering::SeqCst)
    }

    fn set_disabled(&self, disabled: bool) {
        let was_disabled = self.inner.disabled.swap(disabled, Ordering::SeqCst);
        if disabled && !was_disabled {
            Inner::write_to(&self.inner.err, &self.label());
        }
    }
}

impl TextInput for TerminalPage {
    fn value(&self) -> String {
        self.inner.input.clone()
    }
}

impl MarkupRegion for TerminalPage {
    fn set_markup(&self, markup: &str) {
        self.inner.section(
            "Masked message",
            &markup_to_terminal(markup, self.inner.color),
        );
    }
}

impl ListRegion for TerminalPage {
    fn replace_entries(&self, entries: &[String]) {
        let body = entries
            .iter()
            .map(|entry| format!("  - {entry}"))
            .collect::<Vec<_>>()
            .join("\n");
        self.inner.section("Sensitive data", &body);
    }
}

impl Notifier for TerminalPage {
    fn alert(&self, message: &str) {
        Inner::write_to(&self.inner.err, message);
    }
}

struct Section {
    page: TerminalPage,
    heading: &'static str,
}

impl TextRegion for Section {
    fn set_text(&self, text: &str) {
        self.page.inner.section(self.heading, text);
    }
}
