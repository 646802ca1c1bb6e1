//! Ports at the edges of the gateway.
//!
//! Ports describe how the domain expects to reach the outside world: the
//! HTTP transport, the who-am-I lookup, and the local blob sink a download
//! lands in. Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants, and so services can be exercised
//! against test doubles instead of a network.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::error::GatewayError;
use super::session::{CredentialUpdate, SessionCredential, SessionSnapshot};

/// HTTP method of a transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallMethod {
    /// Idempotent read.
    #[default]
    Get,
    /// Create or submit.
    Post,
    /// Replace.
    Put,
    /// Remove.
    Delete,
}

/// Request body shapes the transport can carry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CallBody {
    /// No body.
    #[default]
    Empty,
    /// JSON payload.
    Json(Value),
    /// Multipart form with exactly one named file part.
    Multipart(FilePart),
}

/// One file part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name the origin expects.
    pub field: String,
    /// Client-side filename forwarded with the part.
    pub filename: String,
    /// Declared content type of the file.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// A fully described outbound request.
///
/// The credential handle is explicit: nothing ambient attaches it, every
/// call names what it sends.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportCall {
    /// HTTP method.
    pub method: CallMethod,
    /// Logical API path; the resolver adds the local prefix when absent.
    pub path: String,
    /// Extra headers, applied after any body-implied defaults.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: CallBody,
    /// Session credential attached as the session cookie, when held.
    pub credential: Option<SessionCredential>,
}

impl TransportCall {
    /// Build a GET call for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: CallMethod::Get,
            path: path.into(),
            headers: Vec::new(),
            body: CallBody::Empty,
            credential: None,
        }
    }

    /// Build a POST call for `path` carrying `body`.
    pub fn post(path: impl Into<String>, body: CallBody) -> Self {
        Self {
            method: CallMethod::Post,
            path: path.into(),
            headers: Vec::new(),
            body,
            credential: None,
        }
    }

    /// Attach a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach the credential handle.
    #[must_use]
    pub fn with_credential(mut self, credential: Option<SessionCredential>) -> Self {
        self.credential = credential;
        self
    }
}

/// Raw response surfaced by a transport adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Declared content type, when the origin sent one.
    pub content_type: Option<String>,
    /// Raw body bytes.
    pub bytes: Vec<u8>,
    /// Credential change announced by the origin, when any.
    pub credential_update: Option<CredentialUpdate>,
}

impl TransportReply {
    /// Whether the status is in the 2xx class.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as (lossy) text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Failures raised by transport adapters.
///
/// Non-success HTTP statuses are not transport failures; they travel back
/// as ordinary replies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Network unreachable, DNS failure, or connection refused.
    #[error("connection failed: {detail}")]
    Connect {
        /// Adapter-supplied failure description.
        detail: String,
    },
    /// No response arrived within the configured deadline.
    #[error("request timed out: {detail}")]
    Timeout {
        /// Adapter-supplied failure description.
        detail: String,
    },
}

impl TransportError {
    /// Build a [`TransportError::Connect`] failure.
    pub fn connect(detail: impl Into<String>) -> Self {
        Self::Connect {
            detail: detail.into(),
        }
    }

    /// Build a [`TransportError::Timeout`] failure.
    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::Timeout {
            detail: detail.into(),
        }
    }
}

impl From<TransportError> for GatewayError {
    fn from(value: TransportError) -> Self {
        match value {
            TransportError::Connect { detail } => GatewayError::Transport { detail },
            TransportError::Timeout { detail } => GatewayError::Timeout { detail },
        }
    }
}

/// Low-level call primitive issuing one HTTP request to the resolved
/// target.
///
/// No retries, no caching: one call, one reply.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and surface the raw response.
    async fn execute(&self, call: TransportCall) -> Result<TransportReply, TransportError>;
}

/// Driving port for the session guard's who-am-I lookup.
#[async_trait]
pub trait SessionQuery: Send + Sync {
    /// Query the current session.
    ///
    /// The guard waits for this to complete (success or failure) before
    /// applying any access decision.
    async fn current_session(&self) -> Result<SessionSnapshot, GatewayError>;
}

/// Opaque reference to a materialized blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobHandle(String);

impl BlobHandle {
    /// Wrap a sink-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Local sink a downloaded payload lands in.
///
/// Models the materialize / save / release cycle: the payload is staged as
/// a locally addressable object, exactly one save action is triggered, and
/// the staged object is released afterwards on every path.
pub trait BlobSink: Send + Sync {
    /// Stage the payload as a locally addressable object.
    fn materialize(&self, bytes: &[u8], content_type: &str) -> Result<BlobHandle, GatewayError>;

    /// Trigger the save action for a staged object under `filename`.
    fn trigger_save(&self, handle: &BlobHandle, filename: &str) -> Result<(), GatewayError>;

    /// Release a staged object. Mandatory cleanup; never fails loudly.
    fn release(&self, handle: BlobHandle);
}
