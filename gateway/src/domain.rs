//! Transport-agnostic gateway domain.
//!
//! Purpose: define the contracts the portal views rely on (the access
//! decision table, the session wire model, content negotiation, and the
//! transfer state machines) without importing any HTTP or filesystem
//! machinery. Adapters live under `crate::outbound` and reach the domain
//! only through the ports declared in [`ports`].

pub mod access;
pub mod client;
pub mod error;
pub mod guard;
pub mod negotiate;
pub mod outcome;
pub mod ports;
pub mod role;
pub mod session;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod guard_tests;

pub use self::access::{AccessDecision, GuardState, ViewGate, decide};
pub use self::client::{ApiClient, CallOptions, LoginOutcome, LoginRequest};
pub use self::error::GatewayError;
pub use self::guard::{GuardResolution, MountBinding, SessionGuard};
pub use self::negotiate::{Body, negotiate};
pub use self::outcome::ApiOutcome;
pub use self::ports::{
    BlobHandle, BlobSink, CallBody, CallMethod, FilePart, SessionQuery, Transport, TransportCall,
    TransportError, TransportReply,
};
pub use self::role::{PortalRole, PortalRoutes, Route};
pub use self::session::{
    CredentialJar, CredentialUpdate, SessionCredential, SessionSnapshot, SessionUser,
};
pub use self::transfer::{
    DownloadOperation, DownloadReceipt, FilePayload, FlightGate, UploadOperation, UploadReceipt,
};
