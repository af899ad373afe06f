//! Best-effort conversion of model output into JSON.

use serde_json::Value;
use tracing::warn;

/// Key under which unparseable text is preserved.
pub const RAW_KEY: &str = "_raw";

/// Parse model output into a JSON object or array. Never fails.
///
/// 1. Strict parse of the full text.
/// 2. Strict parse of the span from the first `{` to the last `}`.
/// 3. `{"_raw": text}`.
///
/// Scalars (numbers, bare strings, null) count as failures.
pub fn parse_response(text: &str) -> Value {
    if let Some(value) = parse_structured(text) {
        return value;
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && end > start
        && let Some(value) = parse_structured(&text[start..=end])
    {
        return value;
    }

    warn!(chars = text.len(), "Response was not JSON, keeping raw text");
    raw_value(text)
}

/// The fallback record for `text`.
pub fn raw_value(text: &str) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(RAW_KEY.to_string(), Value::String(text.to_string()));
    Value::Object(map)
}

/// Raw text if `value` is a fallback record.
pub fn raw_text(value: &Value) -> Option<&str> {
    value.get(RAW_KEY).and_then(Value::as_str)
}

/// Extract a JSON array from text that may contain markdown or extra prose.
pub fn extract_json_array(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if let Ok(value @ Value::Array(_)) = serde_json::from_str(inner) {
                return Some(value);
            }
        }
    }

    let (start, end) = (trimmed.find('[')?, trimmed.rfind(']')?);
    if end <= start {
        return None;
    }
    match serde_json::from_str(&trimmed[start..=end]) {
        Ok(value @ Value::Array(_)) => Some(value),
        _ => None,
    }
}

fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}
