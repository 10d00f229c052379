//! Result formatting for MCP tool content.
//!
//! Tool results reach the caller as a single text block. Engine strings are
//! passed through untouched; every other value is rendered as compact JSON.

use serde_json::Value;

/// Render an engine result as the text of a tool content block.
pub fn format_result(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
