//! Best-effort recovery of a JSON object from model output.
//!
//! Models in JSON mode still occasionally wrap the object in prose or a
//! markdown fence. The fallback slices from the first `{` to the last `}` and
//! parses that. It is a heuristic: several top-level objects, or braces inside
//! string values outside the real object, will defeat it.

use serde_json::Value;

/// Parse `text` as JSON, falling back to the outermost brace-delimited slice.
pub fn repair_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text) {
        return Some(value);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    let value = serde_json::from_str(&text[start..=end]).ok()?;
    tracing::debug!("recovered JSON object from surrounding text");

    Some(value)
}
