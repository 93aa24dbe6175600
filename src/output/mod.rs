// Output formatting: JSON envelopes and terminal tables.

pub mod terminal;

use serde::Serialize;
use serde_json::{json, Value};

/// The JSON body reported for any failed query: `{"error": "<message>"}`.
pub fn error_json(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

/// Serialize a query result for `--json` output.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Respects UTF-8 character boundaries, so multi-byte terms never panic.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
