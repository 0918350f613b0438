//! Chat endpoint message types. Client ↔ server JSON for `POST /v1/chat`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client → server: chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// Reserved for multi-turn context; always sent empty.
    #[serde(default)]
    pub context: String,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: String::new(),
        }
    }
}

/// Server → client: successful reply. `message` is `None` when the body had
/// no usable `message` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChatReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Decode a 2xx response body. A body that is not a JSON object, or
    /// whose `message` is missing, null or empty, yields an empty reply.
    pub fn from_body(body: &str) -> Self {
        Self {
            message: field_text(body, "message"),
        }
    }
}

/// Server → client: `detail` field of an error response body, if any.
pub fn error_detail(body: &str) -> Option<String> {
    field_text(body, "detail")
}

fn field_text(body: &str, field: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get(field)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // FastAPI validation errors carry a structured `detail`.
        other => Some(other.to_string()),
    }
}
