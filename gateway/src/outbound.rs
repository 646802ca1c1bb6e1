//! Outbound adapters.
//!
//! Infrastructure implementations of the domain ports: the reqwest-backed
//! transport with its origin-resolver rule, and the filesystem blob sink
//! downloads land in.

pub mod fs;
pub mod http;
