//! Display-name text conversion
//!
//! Java stores display names as JSON text components, Bedrock as plain
//! strings. Only the `text` field survives the trip; styling is dropped.

use serde_json::Value;

/// Java JSON text component to plain text. Unparseable input passes
/// through unchanged, matching how the editions tolerate raw names.
pub fn java_to_plain(component: &str) -> String {
    match serde_json::from_str::<Value>(component) {
        Ok(Value::String(text)) => text,
        Ok(Value::Object(map)) => match map.get("text") {
            Some(Value::String(text)) => text.clone(),
            _ => component.to_string(),
        },
        _ => component.to_string(),
    }
}

/// Plain text to a Java JSON text component.
pub fn plain_to_java(text: &str) -> String {
    serde_json::json!({ "text": text }).to_string()
}
