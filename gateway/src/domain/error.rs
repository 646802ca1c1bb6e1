//! Gateway error taxonomy.
//!
//! Only failures that should reject a call appear here. A non-success HTTP
//! status on the unified client path is not an error; it travels back to
//! the caller as [`crate::domain::ApiOutcome::HttpFailure`].

use thiserror::Error;

/// Failure surfaced by a gateway operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// Network unreachable, DNS failure, or connection refused.
    ///
    /// Callers present a generic "unable to reach server" message.
    #[error("unable to reach server: {detail}")]
    Transport {
        /// Adapter-supplied failure description.
        detail: String,
    },
    /// The request timed out before a response arrived.
    #[error("request timed out: {detail}")]
    Timeout {
        /// Adapter-supplied failure description.
        detail: String,
    },
    /// A transfer operation received a non-success status.
    ///
    /// `detail` carries the response body text, or a generic status message
    /// when the body was empty.
    #[error("transfer failed: {detail}")]
    Transfer {
        /// HTTP status returned by the origin.
        status: u16,
        /// Response body text or a generic status message.
        detail: String,
    },
    /// Client-side validation rejected the request before dispatch.
    #[error("{detail}")]
    InvalidRequest {
        /// Caller-facing validation message.
        detail: String,
    },
    /// Materializing or saving a downloaded payload failed locally.
    #[error("failed to save download: {detail}")]
    Sink {
        /// Filesystem failure description.
        detail: String,
    },
    /// The operation was re-entered while already in flight.
    #[error("operation already in flight")]
    Busy,
}

impl GatewayError {
    /// Build a [`GatewayError::Transport`] failure.
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    /// Build a [`GatewayError::Timeout`] failure.
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::Timeout {
            detail: detail.into(),
        }
    }

    /// Build a [`GatewayError::Transfer`] failure.
    ///
    /// An empty or whitespace-only body degrades to `status NNN` so the
    /// surfaced message is never blank.
    pub fn transfer(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let detail = if detail.trim().is_empty() {
            format!("status {status}")
        } else {
            detail
        };
        Self::Transfer { status, detail }
    }

    /// Build a [`GatewayError::InvalidRequest`] failure.
    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self::InvalidRequest {
            detail: detail.into(),
        }
    }

    /// Build a [`GatewayError::Sink`] failure.
    pub fn sink(detail: impl Into<String>) -> Self {
        Self::Sink {
            detail: detail.into(),
        }
    }
}
