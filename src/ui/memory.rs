//! In-memory page.

use super::{ListRegion, MarkupRegion, Notifier, PageElements, TextInput, TextRegion, Trigger};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Everything a [`MemoryPage`] currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryState {
    /// Input field value.
    pub input: String,
    /// Trigger label.
    pub trigger_label: String,
    /// Whether the trigger is disabled.
    pub trigger_disabled: bool,
    /// Every label the trigger was given, in order.
    pub label_changes: Vec<String>,
    /// Original-text region.
    pub original_text: String,
    /// Masked-text region markup.
    pub masked_markup: String,
    /// List region entries.
    pub list_entries: Vec<String>,
    /// Analysis region text.
    pub analysis_text: String,
    /// Alerts raised, oldest first.
    pub alerts: Vec<String>,
}

/// A page held entirely in memory.
///
/// Clones share state, so a host can keep one clone for inspection while
/// the handler writes through [`MemoryPage::elements`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryPage {
    /// Creates a page with the given input value and trigger label.
    #[must_use]
    pub fn new(input: impl Into<String>, trigger_label: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                input: input.into(),
                trigger_label: trigger_label.into(),
                ..MemoryState::default()
            })),
        }
    }

    /// Replaces the input value.
    pub fn set_input(&self, input: impl Into<String>) {
        self.lock().input = input.into();
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    /// Returns element handles backed by this page.
    #[must_use]
    pub fn elements(&self) -> PageElements {
        PageElements {
            trigger: Arc::new(self.clone()),
            input: Arc::new(self.clone()),
            original_text: Arc::new(OriginalText(self.clone())),
            masked_text: Arc::new(self.clone()),
            sensitive_list: Arc::new(self.clone()),
            analysis_json: Arc::new(AnalysisText(self.clone())),
            notifier: Arc::new(self.clone()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Trigger for MemoryPage {
    fn label(&self) -> String {
        self.lock().trigger_label.clone()
    }

    fn set_label(&self, label: &str) {
        let mut state = self.lock();
        state.trigger_label = label.to_string();
        state.label_changes.push(label.to_string());
    }

    fn is_disabled(&self) -> bool {
        self.lock().trigger_disabled
    }

    fn set_disabled(&self, disabled: bool) {
        self.lock().trigger_disabled = disabled;
    }
}

impl TextInput for MemoryPage {
    fn value(&self) -> String {
        self.lock().input.clone()
    }
}

impl MarkupRegion for MemoryPage {
    fn set_markup(&self, markup: &str) {
        self.lock().masked_markup = markup.to_string();
    }
}

impl ListRegion for MemoryPage {
    fn replace_entries(&self, entries: &[String]) {
        self.lock().list_entries = entries.to_vec();
    }
}

impl Notifier for MemoryPage {
    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}

// The page has two plain-text regions, so each gets its own handle.
struct OriginalText(MemoryPage);

impl TextRegion for OriginalText {
    fn set_text(&self, text: &str) {
        self.0.lock().original_text = text.to_string();
    }
}

struct AnalysisText(MemoryPage);

impl TextRegion for AnalysisText {
    fn set_text(&self, text: &str) {
        self.0.lock().analysis_text = text.to_string();
    }
}
