//! Message analysis: mask first, then ask the model about the masked text.

use crate::Error;
use crate::llm::{ModelCascade, build_analysis_prompt, parse_model_output};
use crate::masking::SensitiveDataMasker;
use crate::models::AnalyzeResponse;
use std::time::Instant;

/// Masks a message and has the model assess the masked text.
pub struct AnalysisService {
    masker: SensitiveDataMasker,
    cascade: ModelCascade,
}

impl AnalysisService {
    /// Creates a new analysis service.
    #[must_use]
    pub const fn new(masker: SensitiveDataMasker, cascade: ModelCascade) -> Self {
        Self { masker, cascade }
    }

    /// Returns the masker.
    #[must_use]
    pub const fn masker(&self) -> &SensitiveDataMasker {
        &self.masker
    }

    /// Analyzes a message.
    ///
    /// Never fails: when the model cannot be reached the `analysis` field
    /// carries the error text instead of a verdict. Blocks on the LLM call.
    #[must_use]
    pub fn analyze_message(&self, text: &str) -> AnalyzeResponse {
        let start = Instant::now();
        let masked = self.masker.mask(text);
        let analysis = self.analyze_masked(&masked.masked_text);

        metrics::counter!(
            "analyze_requests_total",
            "provider" => self.cascade.provider_name(),
            "verdict" => if analysis.is_object() { "parsed" } else { "text" }
        )
        .increment(1);
        metrics::histogram!("analyze_duration_ms")
            .record(start.elapsed().as_secs_f64() * 1000.0);

        tracing::info!(
            detected = ?masked.detected_items,
            elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Analyzed message"
        );

        AnalyzeResponse {
            user_view: masked.original_text,
            ai_view: masked.masked_text,
            detected_sensitive_data: masked.detected_items,
            analysis,
        }
    }

    /// Asks the model about already masked text.
    #[must_use]
    pub fn analyze_masked(&self, masked_text: &str) -> serde_json::Value {
        let prompt = build_analysis_prompt(masked_text);

        match self.cascade.generate(&prompt) {
            Ok(raw) => parse_model_output(&raw),
            Err(Error::OperationFailed { cause, .. }) => {
                tracing::warn!("LLM analysis failed: {cause}");
                serde_json::Value::String(cause)
            },
            Err(err) => {
                tracing::warn!("LLM analysis failed: {err}");
                serde_json::Value::String(err.to_string())
            },
        }
    }
}
