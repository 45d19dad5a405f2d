//! Prompt sent to the model.
//!
//! The model only ever sees masked text; the prompt forbids reconstructing
//! anything that was masked.

/// Instructions for scam-signal analysis. `{message}` is replaced with the
/// masked text.
pub const SCAM_ANALYSIS_PROMPT: &str = r#"You are an AI safety assistant.

Analyze the following message ONLY for scam-related signals:
- urgency or pressure tactics
- unrealistic rewards
- payment requests
- threatening language

STRICT RULES:
- Do NOT infer masked data
- Do NOT reconstruct personal information
- Focus only on language patterns

Respond ONLY in this JSON format:
{
  "risk_level": "Low | Medium | High",
  "reasons": ["reason 1", "reason 2"],
  "user_advice": "short advice"
}

Message:
{message}
"#;

/// Builds the analysis prompt for a masked message.
#[must_use]
pub fn build_analysis_prompt(masked_text: &str) -> String {
    SCAM_ANALYSIS_PROMPT.replacen("{message}", masked_text, 1)
}
