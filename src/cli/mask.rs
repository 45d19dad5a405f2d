//! Mask CLI command.

use crate::masking::{MaskingProfile, SensitiveDataMasker};
use crate::{Error, Result};

/// Masks `text` locally and returns the result as pretty JSON.
///
/// No LLM is involved, so no API key is needed.
pub fn cmd_mask(text: &str, profile: MaskingProfile) -> Result<String> {
    let result = SensitiveDataMasker::new().with_profile(profile).mask(text);
    serde_json::to_string_pretty(&result).map_err(|e| Error::OperationFailed {
        operation: "serialize_mask_result".to_string(),
        cause: e.to_string(),
    })
}
