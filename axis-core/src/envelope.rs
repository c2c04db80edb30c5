//! Response envelope unwrapping
//!
//! The backend sits behind an API gateway that is inconsistent about how it
//! hands back a Lambda result. Depending on the integration a response body is
//! one of:
//! - the payload itself: `{"interview_id": "abc"}`
//! - the payload JSON-encoded a second time: `"{\"interview_id\": \"abc\"}"`
//! - a gateway envelope whose `body` is the JSON-encoded payload:
//!   `{"statusCode": 200, "body": "{\"interview_id\": \"abc\"}"}`
//! - the envelope itself JSON-encoded as a string
//!
//! The two layers (string encoding, `body` envelope) are independent optional
//! steps, applied in that order, once each.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AxisError;

/// Raw response shapes the gateway can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A JSON document serialized into a JSON string.
    Encoded(String),
    /// A gateway wrapper whose `body` field is a JSON string.
    Gateway { body: String },
    /// Anything else; already the payload.
    Bare(Value),
}

impl Envelope {
    pub fn classify(raw: Value) -> Self {
        match raw {
            Value::String(s) => Envelope::Encoded(s),
            Value::Object(mut map) => match map.remove("body") {
                Some(Value::String(body)) => Envelope::Gateway { body },
                Some(other) => {
                    map.insert("body".to_string(), other);
                    Envelope::Bare(Value::Object(map))
                }
                None => Envelope::Bare(Value::Object(map)),
            },
            other => Envelope::Bare(other),
        }
    }

    /// Peel both optional layers and return the payload.
    pub fn open(self) -> Result<Value, AxisError> {
        let decoded = match self {
            Envelope::Encoded(s) => Envelope::classify(parse_layer(&s, "response")?),
            other => other,
        };

        match decoded {
            Envelope::Gateway { body } => parse_layer(&body, "body"),
            Envelope::Bare(v) => Ok(v),
            // A string that decoded to another string: the second string is data
            Envelope::Encoded(s) => Ok(Value::String(s)),
        }
    }
}

fn parse_layer(s: &str, layer: &str) -> Result<Value, AxisError> {
    serde_json::from_str(s)
        .map_err(|e| AxisError::Decode(format!("malformed {} JSON: {}", layer, e)))
}

/// Unwrap a raw response value into its payload.
pub fn unwrap(raw: Value) -> Result<Value, AxisError> {
    Envelope::classify(raw).open()
}

/// Unwrap and deserialize into a typed response.
pub fn unwrap_as<T: DeserializeOwned>(raw: Value) -> Result<T, AxisError> {
    let payload = unwrap(raw)?;
    serde_json::from_value(payload).map_err(|e| AxisError::Decode(e.to_string()))
}

/// Unwrap a raw HTTP body. Empty bodies become `null`; non-JSON bodies are kept
/// as a plain string so error responses stay readable.
pub fn unwrap_text(text: &str) -> Result<Value, AxisError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str::<Value>(text) {
        Ok(raw) => unwrap(raw),
        Err(_) => Ok(Value::String(text.to_string())),
    }
}

/// Best-effort human message from an error body, already unwrapped.
///
/// Checks `message`, then `error` as a string, then `error.message`.
pub fn error_message(payload: &Value) -> Option<String> {
    if let Some(m) = payload.get("message").and_then(|v| v.as_str()) {
        return Some(m.to_string());
    }
    match payload.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(o)) => o
            .get("message")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()),
        _ => match payload {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        },
    }
}
