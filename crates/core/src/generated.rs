//! Parsing of raw learning-path generator output.
//!
//! The generator is an LLM and often wraps its JSON in Markdown code fences.
//! The fences are stripped and the remainder parsed into a
//! [`TreeImportRequest`], which then goes through the normal import
//! validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::tree_import::TreeImportRequest;

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n?|```").expect("valid regex"));

/// Remove Markdown code fences and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Parse generator output into an import request.
///
/// Accepts either the full `{ "topicName", "description", "tree" }` object
/// or a bare node array. A bare array yields a request with only `tree` set;
/// the caller supplies title and description.
pub fn parse_generated_path(raw: &str) -> Result<TreeImportRequest, CoreError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(CoreError::Validation(
            "Generated output is empty".to_string(),
        ));
    }

    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| {
        CoreError::Validation(format!("Generated output is not valid JSON: {e}"))
    })?;

    match value {
        serde_json::Value::Array(_) => Ok(TreeImportRequest {
            tree: Some(value),
            ..Default::default()
        }),
        serde_json::Value::Object(_) => serde_json::from_value(value).map_err(|e| {
            CoreError::Validation(format!("Generated output has an unexpected shape: {e}"))
        }),
        _ => Err(CoreError::Validation(
            "Generated output must be a JSON object or array".to_string(),
        )),
    }
}
