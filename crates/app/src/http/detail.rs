//! Human-readable detail extraction from error bodies.

use serde_json::Value;

const MAX_DETAIL_CHARS: usize = 180;

/// Extract a displayable detail from a failed response body.
///
/// JSON objects contribute their `detail` field. Anything else is treated as
/// text: whitespace is collapsed, HTML error pages yield nothing, long text
/// is truncated.
pub fn error_detail(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut object)) => object.remove("detail").and_then(detail_value),
        Ok(Value::String(text)) => text_detail(&text),
        Ok(_) => None,
        Err(_not_json) => text_detail(body),
    }
}

fn detail_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

fn text_detail(text: &str) -> Option<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.is_empty() || is_html(&normalized) {
        return None;
    }

    if normalized.chars().count() > MAX_DETAIL_CHARS {
        let short: String = normalized.chars().take(MAX_DETAIL_CHARS).collect();

        return Some(format!("{short}..."));
    }

    Some(normalized)
}

fn is_html(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();

    lower.contains("<!doctype html>") || lower.contains("<html>") || lower.contains("<html ")
}
