//! Content negotiation between structured and plain-text bodies.
//!
//! The backend is not trusted to declare content types honestly: error
//! pages arrive as HTML and declared JSON is occasionally malformed.
//! Negotiation therefore never fails; the worst case is the raw text
//! handed back unchanged.

use serde_json::Value;

/// Marker matched case-insensitively against the declared content type.
const STRUCTURED_MARKER: &str = "json";

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Parsed structured payload.
    Structured(Value),
    /// Raw text fallback when the payload is not (valid) structured data.
    Text(String),
}

impl Body {
    /// Structured payload, when this body parsed as one.
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Raw text, when negotiation degraded to it.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Structured(_) => None,
            Self::Text(text) => Some(text.as_str()),
        }
    }

    /// Conventional-field reader. Absent fields are `None`, never a panic.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_structured().and_then(|value| value.get(name))
    }

    /// The conventional `ok` flag, when present.
    pub fn ok_flag(&self) -> Option<bool> {
        self.field("ok").and_then(Value::as_bool)
    }

    /// The conventional `message` field, when present.
    pub fn message(&self) -> Option<&str> {
        self.field("message").and_then(Value::as_str)
    }
}

/// Decide how to decode a response body from its declared content type.
///
/// A content type carrying the structured marker decodes as JSON; anything
/// else is read as text with a best-effort parse on top. Malformed
/// structured payloads degrade to [`Body::Text`]; negotiation never
/// returns an error.
pub fn negotiate(content_type: Option<&str>, body: &[u8]) -> Body {
    let declares_structured =
        content_type.is_some_and(|value| value.to_ascii_lowercase().contains(STRUCTURED_MARKER));
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => Body::Structured(value),
        Err(error) => {
            if declares_structured {
                tracing::debug!(%error, "declared-structured payload failed to parse; degrading to text");
            }
            Body::Text(String::from_utf8_lossy(body).into_owned())
        }
    }
}
