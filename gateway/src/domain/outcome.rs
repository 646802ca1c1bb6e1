//! Normalized outcome of a unified client call.
//!
//! Non-success statuses are values, not raised failures: call sites pattern
//! match on the outcome (or read the conventional fields) to decide what
//! "success" means for their endpoint. Only transport failures reject.

use serde_json::Value;

use super::negotiate::{Body, negotiate};
use super::session::SessionUser;

/// Tagged result of one unified client call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome {
    /// 2xx response with its decoded body.
    Success {
        /// HTTP status that produced this outcome.
        status: u16,
        /// Negotiated body.
        body: Body,
    },
    /// Non-2xx response. Still a value, never a raised error.
    HttpFailure {
        /// HTTP status that produced this outcome.
        status: u16,
        /// Negotiated body.
        body: Body,
    },
}

impl ApiOutcome {
    /// Build an outcome from raw response parts.
    pub fn from_parts(status: u16, content_type: Option<&str>, bytes: &[u8]) -> Self {
        let body = negotiate(content_type, bytes);
        if (200..300).contains(&status) {
            Self::Success { status, body }
        } else {
            Self::HttpFailure { status, body }
        }
    }

    /// HTTP status paired with this outcome.
    pub fn status(&self) -> u16 {
        match self {
            Self::Success { status, .. } | Self::HttpFailure { status, .. } => *status,
        }
    }

    /// Negotiated body.
    pub fn body(&self) -> &Body {
        match self {
            Self::Success { body, .. } | Self::HttpFailure { body, .. } => body,
        }
    }

    /// Whether the status was in the 2xx class.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The conventional `ok` flag, falling back to the HTTP success class
    /// when the body does not carry one.
    pub fn ok_flag(&self) -> bool {
        self.body().ok_flag().unwrap_or(self.is_success())
    }

    /// The conventional `message` field, when present.
    pub fn message(&self) -> Option<&str> {
        self.body().message()
    }

    /// Decode the conventional `user` field, when present and well-formed.
    pub fn user(&self) -> Option<SessionUser> {
        self.body()
            .field("user")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Arbitrary-field reader. Absent fields are `None`, never a panic.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body().field(name)
    }
}
