//! The submit-and-render handler.

use super::render::{render_analysis, render_label_entries, render_masked_markup};
use super::{
    AnalyzeTransport, BUSY_LABEL, EMPTY_INPUT_ALERT, PageElements, REQUEST_FAILED_ALERT, Trigger,
};
use crate::models::AnalyzeResponse;

/// What an activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty; the user was warned and nothing was sent.
    EmptyInput,
    /// The trigger was already disabled; nothing was sent.
    Busy,
    /// The response was rendered into the page.
    Rendered,
    /// The request failed; the user was alerted.
    Failed,
}

/// Holds the trigger in its busy state.
///
/// Acquiring swaps in the busy label and disables the trigger. Dropping
/// restores the original label and re-enables it.
pub struct BusyGuard<'a> {
    trigger: &'a dyn Trigger,
    original_label: String,
}

impl<'a> BusyGuard<'a> {
    /// Marks the trigger busy, or returns `None` if it already is.
    pub fn acquire(trigger: &'a dyn Trigger, busy_label: &str) -> Option<Self> {
        if trigger.is_disabled() {
            return None;
        }

        let original_label = trigger.label();
        trigger.set_label(busy_label);
        trigger.set_disabled(true);
        Some(Self {
            trigger,
            original_label,
        })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.trigger.set_label(&self.original_label);
        self.trigger.set_disabled(false);
    }
}

/// Sends the page's message for analysis and renders the result.
///
/// One instance per page; it owns the element handles and the transport.
pub struct SubmitHandler<T> {
    elements: PageElements,
    transport: T,
}

impl<T: AnalyzeTransport> SubmitHandler<T> {
    /// Creates a handler bound to `elements`.
    #[must_use]
    pub const fn new(elements: PageElements, transport: T) -> Self {
        Self {
            elements,
            transport,
        }
    }

    /// Returns the element handles.
    #[must_use]
    pub const fn elements(&self) -> &PageElements {
        &self.elements
    }

    /// Handles one activation of the trigger.
    pub async fn activate(&self) -> SubmitOutcome {
        let message = self.elements.input.value();
        if message.trim().is_empty() {
            self.elements.notifier.alert(EMPTY_INPUT_ALERT);
            return SubmitOutcome::EmptyInput;
        }

        let Some(_busy) = BusyGuard::acquire(self.elements.trigger.as_ref(), BUSY_LABEL) else {
            tracing::debug!("Ignoring activation while a request is in flight");
            return SubmitOutcome::Busy;
        };

        match self.transport.analyze(&message).await {
            Ok(response) => {
                self.render(&response);
                SubmitOutcome::Rendered
            },
            Err(err) => {
                tracing::error!("Error analyzing message: {err}");
                self.elements.notifier.alert(REQUEST_FAILED_ALERT);
                SubmitOutcome::Failed
            },
        }
    }

    /// Writes a response into the four output regions.
    pub fn render(&self, response: &AnalyzeResponse) {
        self.elements.original_text.set_text(&response.user_view);
        self.elements
            .masked_text
            .set_markup(&render_masked_markup(&response.ai_view));
        self.elements
            .sensitive_list
            .replace_entries(&render_label_entries(&response.detected_sensitive_data));
        self.elements
            .analysis_json
            .set_text(&render_analysis(&response.analysis));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MemoryPage, NO_SENSITIVE_DATA};
    use crate::{Error, Result};
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport returning a canned result and recording what it saw.
    struct FakeTransport {
        page: MemoryPage,
        result: fn() -> Result<AnalyzeResponse>,
        calls: Mutex<Vec<(String, bool, String)>>,
    }

    impl FakeTransport {
        fn new(page: &MemoryPage, result: fn() -> Result<AnalyzeResponse>) -> Self {
            Self {
                page: page.clone(),
                result,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl AnalyzeTransport for FakeTransport {
        async fn analyze(&self, message: &str) -> Result<AnalyzeResponse> {
            let state = self.page.snapshot();
            self.calls.lock().unwrap().push((
                message.to_string(),
                state.trigger_disabled,
                state.trigger_label,
            ));
            (self.result)()
        }
    }

    fn ssn_response() -> Result<AnalyzeResponse> {
        Ok(AnalyzeResponse {
            user_view: "My SSN is 123-45-6789".to_string(),
            ai_view: "My SSN is [MASKED_SSN]".to_string(),
            detected_sensitive_data: vec!["SSN".to_string()],
            analysis: json!({"risk": "high"}),
        })
    }

    fn clean_response() -> Result<AnalyzeResponse> {
        Ok(AnalyzeResponse {
            user_view: "<b>hi</b>".to_string(),
            ai_view: "<b>hi</b>".to_string(),
            detected_sensitive_data: Vec::new(),
            analysis: json!({"risk_level": "Low", "reasons": []}),
        })
    }

    fn server_error() -> Result<AnalyzeResponse> {
        Err(Error::RequestFailed {
            status: 500,
            body: "Internal Server Error".to_string(),
        })
    }

    #[tokio::test]
    async fn test_renders_successful_response() {
        let page = MemoryPage::new("My SSN is 123-45-6789", "Analyze");
        let transport = FakeTransport::new(&page, ssn_response);
        let handler = SubmitHandler::new(page.elements(), transport);

        assert_eq!(handler.activate().await, SubmitOutcome::Rendered);

        let state = page.snapshot();
        assert_eq!(state.original_text, "My SSN is 123-45-6789");
        assert_eq!(
            state.masked_markup,
            r#"My SSN is <span class="masked">[MASKED_SSN]</span>"#
        );
        assert_eq!(state.list_entries, vec!["SSN"]);
        assert_eq!(state.analysis_text, "{\n  \"risk\": \"high\"\n}");
        assert!(state.alerts.is_empty());
        assert_eq!(state.trigger_label, "Analyze");
        assert!(!state.trigger_disabled);
    }

    #[tokio::test]
    async fn test_sends_raw_input_once_while_busy() {
        let page = MemoryPage::new("  My SSN is 123-45-6789 ", "Analyze");
        let transport = FakeTransport::new(&page, ssn_response);
        let handler = SubmitHandler::new(page.elements(), transport);

        handler.activate().await;

        let calls = handler.transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            (
                "  My SSN is 123-45-6789 ".to_string(),
                true,
                BUSY_LABEL.to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_empty_input_warns_without_request() {
        for input in ["", "   ", "\n\t"] {
            let page = MemoryPage::new(input, "Analyze");
            let transport = FakeTransport::new(&page, ssn_response);
            let handler = SubmitHandler::new(page.elements(), transport);

            assert_eq!(handler.activate().await, SubmitOutcome::EmptyInput);
            assert!(handler.transport.calls.lock().unwrap().is_empty());

            let state = page.snapshot();
            assert_eq!(state.alerts, vec![EMPTY_INPUT_ALERT]);
            assert_eq!(state.trigger_label, "Analyze");
            assert!(!state.trigger_disabled);
            assert!(state.label_changes.is_empty());
        }
    }

    #[tokio::test]
    async fn test_empty_detection_shows_placeholder() {
        let page = MemoryPage::new("<b>hi</b>", "Analyze");
        let handler = SubmitHandler::new(page.elements(), FakeTransport::new(&page, clean_response));

        handler.activate().await;

        let state = page.snapshot();
        assert_eq!(state.list_entries, vec![NO_SENSITIVE_DATA]);
        assert_eq!(state.original_text, "<b>hi</b>");
        assert_eq!(state.masked_markup, "&lt;b&gt;hi&lt;/b&gt;");
    }

    #[tokio::test]
    async fn test_failure_alerts_and_restores_trigger() {
        let page = MemoryPage::new("hello", "Check message");
        let handler = SubmitHandler::new(page.elements(), FakeTransport::new(&page, server_error));

        assert_eq!(handler.activate().await, SubmitOutcome::Failed);

        let state = page.snapshot();
        assert_eq!(state.alerts, vec![REQUEST_FAILED_ALERT]);
        assert_eq!(state.trigger_label, "Check message");
        assert!(!state.trigger_disabled);
        assert_eq!(
            state.label_changes,
            vec![BUSY_LABEL.to_string(), "Check message".to_string()]
        );
        assert!(state.original_text.is_empty());
        assert!(state.list_entries.is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_render() {
        let page = MemoryPage::new("My SSN is 123-45-6789", "Analyze");
        SubmitHandler::new(page.elements(), FakeTransport::new(&page, ssn_response))
            .activate()
            .await;
        SubmitHandler::new(page.elements(), FakeTransport::new(&page, server_error))
            .activate()
            .await;

        let state = page.snapshot();
        assert_eq!(state.list_entries, vec!["SSN"]);
        assert_eq!(state.alerts, vec![REQUEST_FAILED_ALERT]);
    }

    #[tokio::test]
    async fn test_disabled_trigger_blocks_activation() {
        let page = MemoryPage::new("hello", "Analyze");
        let handler = SubmitHandler::new(page.elements(), FakeTransport::new(&page, ssn_response));
        page.elements().trigger.set_disabled(true);

        assert_eq!(handler.activate().await, SubmitOutcome::Busy);
        assert!(handler.transport.calls.lock().unwrap().is_empty());
        assert!(page.snapshot().trigger_disabled);
    }

    #[test]
    fn test_busy_guard_restores_on_drop() {
        let page = MemoryPage::new("", "Analyze");
        let elements = page.elements();
        {
            let guard = BusyGuard::acquire(elements.trigger.as_ref(), "Working");
            assert!(guard.is_some());
            assert!(BusyGuard::acquire(elements.trigger.as_ref(), "Again").is_none());
            assert_eq!(page.snapshot().trigger_label, "Working");
        }
        let state = page.snapshot();
        assert_eq!(state.trigger_label, "Analyze");
        assert!(!state.trigger_disabled);
    }
}
