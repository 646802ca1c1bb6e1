//! Session wire model and the explicit credential handle.
//!
//! The session itself is server-held; the client only ever sees the result
//! of the who-am-I query and an opaque credential it threads through every
//! transport call. [`CredentialJar`] mirrors the browser cookie store the
//! original surface relied on, made explicit so nothing ambient remains.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::role::PortalRole;

/// Profile fields returned by the who-am-I endpoint.
///
/// Deserialization is tolerant: unknown fields are ignored and the optional
/// profile fields default to absent. The only field the gateway interprets
/// is the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Role assigned by the backend at login time. Authoritative.
    #[serde(rename = "type")]
    pub user_type: PortalRole,
    /// Display name, when the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account email, when the backend supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Client-side result of the session query.
///
/// Absent fields deserialize to their defaults so a degraded or partial
/// payload reads as an unauthenticated session rather than a decode error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionSnapshot {
    /// Whether the backend recognises the presented credential.
    #[serde(default)]
    pub authenticated: bool,
    /// Profile of the authenticated user, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl SessionSnapshot {
    /// Role of the authenticated user.
    ///
    /// `None` when the session is unauthenticated or the payload omitted the
    /// user, so the access table can treat both the same way.
    pub fn role(&self) -> Option<PortalRole> {
        if self.authenticated {
            self.user.as_ref().map(|user| user.user_type)
        } else {
            None
        }
    }
}

/// Opaque session credential issued by the backend.
///
/// The client never interprets the value; it only attaches it as the
/// session cookie on outbound calls. Zeroed on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential(Zeroizing<String>);

impl SessionCredential {
    /// Wrap a raw credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the raw value for cookie attachment.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Credential change announced by the origin via response metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialUpdate {
    /// Replace the stored credential.
    Set(SessionCredential),
    /// Drop the stored credential (expired or emptied cookie).
    Clear,
}

/// Holds the current credential across calls.
///
/// Replace semantics are idempotent, matching the cookie store this models:
/// storing an empty value clears the jar.
#[derive(Debug, Default)]
pub struct CredentialJar(Mutex<Option<SessionCredential>>);

impl CredentialJar {
    /// Create an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a credential, clearing instead when the value is empty.
    pub fn store(&self, credential: SessionCredential) {
        if credential.expose().is_empty() {
            self.clear();
            return;
        }
        *self.lock() = Some(credential);
    }

    /// Current credential, if one is held.
    pub fn current(&self) -> Option<SessionCredential> {
        self.lock().clone()
    }

    /// Drop the held credential.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Apply an origin-announced credential change.
    pub fn apply(&self, update: CredentialUpdate) {
        match update {
            CredentialUpdate::Set(credential) => {
                tracing::debug!("session credential updated by origin");
                self.store(credential);
            }
            CredentialUpdate::Clear => {
                tracing::debug!("session credential cleared by origin");
                self.clear();
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<SessionCredential>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
