//! Property-based tests for masking.
//!
//! Uses proptest to verify invariants across random inputs:
//! - The original text is always echoed back untouched
//! - Text without digits or `@` is never altered
//! - Embedded phone numbers and e-mails never survive masking
//! - Detected labels are unique and follow pattern order

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use scamguard::masking::{MaskingProfile, SensitiveDataMasker, find_tokens};

const LABEL_ORDER: [&str; 5] = [
    "Phone Number",
    "Email ID",
    "UPI ID",
    "SSN",
    "Credit Card Number",
];

proptest! {
    /// Property: `original_text` is the input, whatever it contains.
    #[test]
    fn prop_original_text_preserved(text in any::<String>()) {
        let result = SensitiveDataMasker::new().mask(&text);
        prop_assert_eq!(result.original_text, text);
    }

    /// Property: text with no digits and no `@` has nothing to mask.
    #[test]
    fn prop_plain_text_unchanged(text in "[a-zA-Z .,!?'\n-]{0,120}") {
        let result = SensitiveDataMasker::new().mask(&text);
        prop_assert_eq!(&result.masked_text, &text);
        prop_assert!(result.detected_items.is_empty());
        prop_assert!(find_tokens(&result.masked_text).is_empty());
    }

    /// Property: a standalone 10-digit number is always masked.
    #[test]
    fn prop_phone_never_leaks(
        prefix in "[a-zA-Z ]{0,30}",
        digits in "[0-9]{10}",
        suffix in "[a-zA-Z ]{0,30}",
    ) {
        let text = format!("{prefix} {digits} {suffix}");
        let result = SensitiveDataMasker::new().mask(&text);
        prop_assert!(!result.masked_text.contains(&digits));
        prop_assert!(result.masked_text.contains("[MASKED_PHONE]"));
        prop_assert_eq!(result.detected_items, vec!["Phone Number".to_string()]);
    }

    /// Property: an e-mail address is masked as an e-mail, never as a UPI ID.
    #[test]
    fn prop_email_masked_whole(
        user in "[a-z][a-z.]{0,12}",
        domain in "[a-z]{1,10}",
        tld in "[a-z]{2,4}",
    ) {
        let text = format!("write to {user}@{domain}.{tld} today");
        let result = SensitiveDataMasker::new().mask(&text);
        prop_assert_eq!(result.masked_text, "write to [MASKED_EMAIL] today");
        prop_assert_eq!(result.detected_items, vec!["Email ID".to_string()]);
    }

    /// Property: labels are unique and appear in pattern order.
    #[test]
    fn prop_labels_unique_and_ordered(text in "[a-z0-9@. -]{0,80}") {
        let result = SensitiveDataMasker::new().mask(&text);
        let positions: Vec<usize> = result
            .detected_items
            .iter()
            .map(|label| LABEL_ORDER.iter().position(|known| known == label).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Property: the core profile never reports extended labels.
    #[test]
    fn prop_core_profile_subset(text in "[0-9 -]{0,40}") {
        let result = SensitiveDataMasker::new()
            .with_profile(MaskingProfile::Core)
            .mask(&text);
        prop_assert!(result
            .detected_items
            .iter()
            .all(|label| LABEL_ORDER[..3].contains(&label.as_str())));
    }
}
