//! Sensitive data patterns.
// Allow expect() on static regex patterns - these are guaranteed to compile
#![allow(clippy::expect_used)]

use regex::Regex;
use std::sync::LazyLock;

/// A pattern that masks one kind of sensitive data.
pub(super) struct MaskPattern {
    /// Label reported in `detected_items`.
    pub label: &'static str,
    /// Placeholder substituted for every match.
    pub token: &'static str,
    pub regex: &'static LazyLock<Regex>,
    /// Only applied by the extended profile.
    pub extended: bool,
}

/// 10-digit phone numbers.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{10}\b").expect("static regex: phone pattern"));

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[\w.-]+@[\w.-]+\.\w+\b").expect("static regex: email pattern")
});

/// UPI handles look like e-mails without a top-level domain (`name@bank`).
static UPI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w.-]+@\w+\b").expect("static regex: UPI pattern"));

static SSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("static regex: SSN pattern"));

static CREDIT_CARD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|3[47][0-9]{13}|6(?:011|5[0-9]{2})[0-9]{12})\b",
    )
    .expect("static regex: credit card pattern")
});

/// Matches any placeholder token, whatever its label.
pub(super) static MASKED_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[MASKED_[^\]]+\]").expect("static regex: masked token"));

/// Returns the patterns in application order.
///
/// Order matters: e-mails must be masked before UPI IDs, otherwise the UPI
/// pattern would swallow the local part and domain of every e-mail.
pub(super) fn mask_patterns() -> [MaskPattern; 5] {
    [
        MaskPattern {
            label: "Phone Number",
            token: "[MASKED_PHONE]",
            regex: &PHONE_REGEX,
            extended: false,
        },
        MaskPattern {
            label: "Email ID",
            token: "[MASKED_EMAIL]",
            regex: &EMAIL_REGEX,
            extended: false,
        },
        MaskPattern {
            label: "UPI ID",
            token: "[MASKED_UPI]",
            regex: &UPI_REGEX,
            extended: false,
        },
        MaskPattern {
            label: "SSN",
            token: "[MASKED_SSN]",
            regex: &SSN_REGEX,
            extended: true,
        },
        MaskPattern {
            label: "Credit Card Number",
            token: "[MASKED_CARD]",
            regex: &CREDIT_CARD_REGEX,
            extended: true,
        },
    ]
}
