//! Structured metadata supplied alongside a message as raw JSON text.

use serde_json::{Map, Value};

use crate::error::ChatError;

/// Parse a caller-supplied metadata blob.
///
/// Blank input means "no metadata". Anything else must be a JSON object.
pub fn parse_metadata(raw: &str) -> Result<Option<Map<String, Value>>, ChatError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(other) => Err(ChatError::InvalidMetadata(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ChatError::InvalidMetadata(e.to_string())),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_none() {
        assert_eq!(parse_metadata("").unwrap(), None);
        assert_eq!(parse_metadata("   \n").unwrap(), None);
    }

    #[test]
    fn object_is_accepted() {
        let map = parse_metadata(r#"{"task": "summarize", "depth": 2}"#)
            .unwrap()
            .unwrap();
        assert_eq!(map["task"], "summarize");
        assert_eq!(map["depth"], 2);
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_metadata("{task: summarize").unwrap_err();
        assert!(matches!(err, ChatError::InvalidMetadata(_)));
        assert!(err.to_string().starts_with("Invalid metadata:"));
    }

    #[test]
    fn non_object_json_is_rejected() {
        let err = parse_metadata("[1, 2]").unwrap_err();
        assert_eq!(
            err,
            ChatError::InvalidMetadata("expected a JSON object, got an array".into())
        );
    }
}
