//! Topic field limits and text normalization shared by manual topic creation
//! and tree import.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum allowed length for a topic or node title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum allowed length for a topic or node description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// Maximum allowed length for an originating prompt or a node prompt sample.
pub const MAX_PROMPT_LENGTH: usize = 4_000;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Trim a required text field and reject it when missing, blank, or longer
/// than `max_len` characters.
///
/// Returns the trimmed value.
pub fn require_text(field: &str, value: Option<&str>, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must not exceed {max_len} characters, got {len}"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field. Blank values collapse to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate and normalize the title/description pair of a topic.
pub fn validate_topic_fields(
    title: Option<&str>,
    description: Option<&str>,
) -> Result<(String, String), CoreError> {
    let title = require_text("title", title, MAX_TITLE_LENGTH)?;
    let description = require_text("description", description, MAX_DESCRIPTION_LENGTH)?;
    Ok((title, description))
}
