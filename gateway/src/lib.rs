//! Session-authenticated API gateway for the resident/staff portals.
//!
//! The crate owns the plumbing between portal views and the backend origin:
//! the unified API client with its content negotiation, the session guard
//! that applies the access decision table per protected view, the binary
//! download and multipart upload operations, and the origin-resolver rule
//! that keeps every call addressed through the local API prefix.
//!
//! Layout follows a ports-and-adapters split: [`domain`] holds the
//! transport-agnostic contracts and services, [`outbound`] the reqwest and
//! filesystem adapters, and [`config`] wires the two together.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::{Gateway, GatewayBuildError, GatewayConfig};
