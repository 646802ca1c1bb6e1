//! Unified API client: the one call path for JSON-oriented operations.
//!
//! Owns the default headers and the credential policy. Every call threads
//! the current credential from the jar, and every reply's credential update
//! is stored back, so the jar tracks the origin the way a browser cookie
//! store would, just explicitly.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use thiserror::Error;
use zeroize::Zeroizing;

use super::error::GatewayError;
use super::negotiate::Body;
use super::outcome::ApiOutcome;
use super::ports::{CallBody, CallMethod, SessionQuery, Transport, TransportCall};
use super::role::{PortalRole, PortalRoutes, Route};
use super::session::{CredentialJar, SessionSnapshot};

/// Fixed who-am-I endpoint queried by the session guard.
const SESSION_PATH: &str = "/api/auth/session";
/// Login endpoint.
const LOGIN_PATH: &str = "/api/auth/login";
/// Logout endpoint.
const LOGOUT_PATH: &str = "/api/auth/logout";

/// Default content type attached to every unified client call.
const JSON_CONTENT_TYPE: &str = "application/json";

/// Fallback shown when a login failure carries no usable message.
const INVALID_CREDENTIALS_FALLBACK: &str = "invalid credentials";

/// Per-call knobs for [`ApiClient::call`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// HTTP method; defaults to GET.
    pub method: CallMethod,
    /// Request body; defaults to empty.
    pub body: CallBody,
    /// Override for the default `application/json` content type.
    pub content_type: Option<String>,
}

/// Validation errors raised when constructing a [`LoginRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login payload.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and retains caller-provided whitespace.
/// - `user_type` is a request hint; the backend-returned role is
///   authoritative for everything that follows.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    email: String,
    password: Zeroizing<String>,
    user_type: PortalRole,
}

impl LoginRequest {
    /// Construct a login request from raw form inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        user_type: PortalRole,
    ) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
            user_type,
        })
    }

    fn to_payload(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password.as_str(),
            "userType": self.user_type,
        })
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Backend accepted the credentials.
    Accepted {
        /// Role the backend assigned to the session.
        role: PortalRole,
        /// Dashboard of the assigned role's portal.
        redirect: Route,
    },
    /// Backend rejected the attempt.
    Rejected {
        /// Caller-facing message: the backend's, or the generic fallback.
        message: String,
    },
}

/// The unified API client.
///
/// Composes the transport and the negotiator into the one function
/// application code calls for all JSON-oriented operations. No retries, no
/// caching; the credential jar is the only state shared across calls.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    jar: Arc<CredentialJar>,
    routes: PortalRoutes,
}

impl ApiClient {
    /// Build a client over a transport and a credential jar.
    pub fn new(transport: Arc<dyn Transport>, jar: Arc<CredentialJar>, routes: PortalRoutes) -> Self {
        Self {
            transport,
            jar,
            routes,
        }
    }

    /// Issue a request and normalize the response.
    ///
    /// Non-2xx statuses are data, not errors: they come back as
    /// [`ApiOutcome::HttpFailure`] and the call site decides what failure
    /// means for its endpoint. Only transport failures reject.
    pub async fn call(&self, path: &str, options: CallOptions) -> Result<ApiOutcome, GatewayError> {
        let content_type = options
            .content_type
            .unwrap_or_else(|| JSON_CONTENT_TYPE.to_owned());
        let call = TransportCall {
            method: options.method,
            path: path.to_owned(),
            headers: vec![("Content-Type".to_owned(), content_type)],
            body: options.body,
            credential: self.jar.current(),
        };
        let reply = self.transport.execute(call).await?;
        if let Some(update) = reply.credential_update.clone() {
            self.jar.apply(update);
        }
        Ok(ApiOutcome::from_parts(
            reply.status,
            reply.content_type.as_deref(),
            &reply.bytes,
        ))
    }

    /// GET convenience for resource endpoints.
    pub async fn get(&self, path: &str) -> Result<ApiOutcome, GatewayError> {
        self.call(path, CallOptions::default()).await
    }

    /// POST convenience carrying a JSON payload.
    pub async fn post_json(&self, path: &str, payload: Value) -> Result<ApiOutcome, GatewayError> {
        self.call(
            path,
            CallOptions {
                method: CallMethod::Post,
                body: CallBody::Json(payload),
                content_type: None,
            },
        )
        .await
    }

    /// Submit login credentials.
    ///
    /// The redirect target derives from the role the backend returns, not
    /// the role the visitor asked for. A failure without a backend message
    /// (including a negotiation-degraded response) falls back to a generic
    /// invalid-credentials message.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, GatewayError> {
        let outcome = self.post_json(LOGIN_PATH, request.to_payload()).await?;
        if outcome.ok_flag() {
            if let Some(user) = outcome.user() {
                tracing::debug!(role = %user.user_type, "login accepted");
                return Ok(LoginOutcome::Accepted {
                    role: user.user_type,
                    redirect: self.routes.dashboard_for(user.user_type).clone(),
                });
            }
        }
        let message = outcome
            .message()
            .unwrap_or(INVALID_CREDENTIALS_FALLBACK)
            .to_owned();
        tracing::debug!(status = outcome.status(), "login rejected");
        Ok(LoginOutcome::Rejected { message })
    }

    /// End the current session server-side and drop the local credential.
    pub async fn logout(&self) -> Result<ApiOutcome, GatewayError> {
        let outcome = self
            .call(
                LOGOUT_PATH,
                CallOptions {
                    method: CallMethod::Post,
                    ..CallOptions::default()
                },
            )
            .await?;
        if outcome.is_success() {
            self.jar.clear();
        }
        Ok(outcome)
    }

    /// Query the fixed who-am-I endpoint.
    ///
    /// Decoding is tolerant: a degraded or malformed payload reads as an
    /// unauthenticated session, so the guard still reaches a decision.
    pub async fn session(&self) -> Result<SessionSnapshot, GatewayError> {
        let outcome = self.get(SESSION_PATH).await?;
        let snapshot = match outcome.body() {
            Body::Structured(value) => match serde_json::from_value(value.clone()) {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    tracing::debug!(%error, "session payload failed to decode; treating as unauthenticated");
                    SessionSnapshot::default()
                }
            },
            Body::Text(_) => {
                tracing::debug!(status = outcome.status(), "session query returned text; treating as unauthenticated");
                SessionSnapshot::default()
            }
        };
        Ok(snapshot)
    }
}

#[async_trait]
impl SessionQuery for ApiClient {
    async fn current_session(&self) -> Result<SessionSnapshot, GatewayError> {
        self.session().await
    }
}
