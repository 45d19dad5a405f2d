//! Sensitive data masking.
//!
//! Detects and masks sensitive user information before text is sent to an
//! AI system. Each pattern runs over the output of the previous one, so a
//! span masked early can never be matched again by a later pattern.

mod patterns;

use patterns::{MASKED_TOKEN_REGEX, mask_patterns};
use regex::NoExpand;
use serde::{Deserialize, Serialize};

/// Outcome of masking a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskResult {
    /// The text as provided.
    pub original_text: String,
    /// The text with every sensitive span replaced by a placeholder token.
    pub masked_text: String,
    /// Labels of the kinds of data found, unique, in pattern order.
    pub detected_items: Vec<String>,
}

impl MaskResult {
    /// Returns true if anything was masked.
    #[must_use]
    pub fn has_detections(&self) -> bool {
        !self.detected_items.is_empty()
    }
}

/// Which set of patterns the masker applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskingProfile {
    /// Phone numbers, e-mail IDs and UPI IDs.
    Core,
    /// Core patterns plus SSNs and payment card numbers.
    #[default]
    Extended,
}

impl MaskingProfile {
    /// Parses a profile string, falling back to the default.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "core" => Self::Core,
            _ => Self::Extended,
        }
    }

    const fn includes_extended(self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// Masks sensitive data in free text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensitiveDataMasker {
    profile: MaskingProfile,
}

impl SensitiveDataMasker {
    /// Creates a masker using the extended profile.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            profile: MaskingProfile::Extended,
        }
    }

    /// Sets the masking profile.
    #[must_use]
    pub const fn with_profile(mut self, profile: MaskingProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Returns the masking profile.
    #[must_use]
    pub const fn profile(&self) -> MaskingProfile {
        self.profile
    }

    /// Masks every sensitive span in `text`.
    #[must_use]
    pub fn mask(&self, text: &str) -> MaskResult {
        let mut masked_text = text.to_string();
        let mut detected_items: Vec<String> = Vec::new();

        for pattern in mask_patterns() {
            if pattern.extended && !self.profile.includes_extended() {
                continue;
            }

            let count = pattern.regex.find_iter(&masked_text).count();
            if count == 0 {
                continue;
            }

            masked_text = pattern
                .regex
                .replace_all(&masked_text, NoExpand(pattern.token))
                .into_owned();

            if !detected_items.iter().any(|item| item == pattern.label) {
                detected_items.push(pattern.label.to_string());
            }

            metrics::counter!("masking_detections_total", "label" => pattern.label)
                .increment(u64::try_from(count).unwrap_or(u64::MAX));
        }

        tracing::debug!(
            detected = detected_items.len(),
            profile = ?self.profile,
            "Masked message"
        );

        MaskResult {
            original_text: text.to_string(),
            masked_text,
            detected_items,
        }
    }

    /// Checks if text contains any sensitive data.
    #[must_use]
    pub fn contains_sensitive_data(&self, text: &str) -> bool {
        self.mask(text).has_detections()
    }
}

/// Lists the `[MASKED_<label>]` tokens in `text`, in order of appearance.
#[must_use]
pub fn find_tokens(text: &str) -> Vec<&str> {
    MASKED_TOKEN_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Wraps every `[MASKED_<label>]` token in `text` with `open` and `close`.
pub(crate) fn wrap_tokens(text: &str, open: &str, close: &str) -> String {
    MASKED_TOKEN_REGEX
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{open}{}{close}", &caps[0])
        })
        .into_owned()
}
