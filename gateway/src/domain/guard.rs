//! Session guard for protected views.
//!
//! One invocation per view mount, no cross-view memoization: every mount
//! pays for a fresh who-am-I query. Independent invocations on views
//! mounted concurrently are unordered with respect to each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::access::{AccessDecision, decide};
use super::ports::SessionQuery;
use super::role::{PortalRole, PortalRoutes};

/// Mount flag shared between a view instance and its in-flight guard query.
///
/// Cloning shares the flag; `unmount` is idempotent.
#[derive(Debug, Clone)]
pub struct MountBinding(Arc<AtomicBool>);

impl MountBinding {
    /// Create a binding in the mounted state.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Mark the view unmounted. Any decision still in flight is discarded.
    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    /// Whether the view is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for MountBinding {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one guard invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardResolution {
    /// Decision to apply to the still-mounted view.
    Decided(AccessDecision),
    /// The view unmounted mid-query; the decision was discarded.
    Discarded,
}

/// Applies the access decision table to protected views.
pub struct SessionGuard {
    sessions: Arc<dyn SessionQuery>,
    routes: PortalRoutes,
}

impl SessionGuard {
    /// Build a guard over a session query port.
    pub fn new(sessions: Arc<dyn SessionQuery>, routes: PortalRoutes) -> Self {
        Self { sessions, routes }
    }

    /// Resolve admission for a protected view requiring `required`.
    ///
    /// The session query always completes, success or failure, before the
    /// table is applied; no decision is made on partial data. A query
    /// failure resolves to a redirect to the public landing route. When the
    /// binding unmounted while the query was in flight, the resolved
    /// decision is discarded rather than applied to a dead view.
    pub async fn admit(&self, required: PortalRole, binding: &MountBinding) -> GuardResolution {
        let queried = self.sessions.current_session().await;
        if !binding.is_mounted() {
            tracing::debug!("view unmounted before session query resolved; discarding decision");
            return GuardResolution::Discarded;
        }
        let decision = match &queried {
            Ok(snapshot) => decide(Some(snapshot), required, &self.routes),
            Err(error) => {
                tracing::warn!(%error, "session query failed; redirecting to landing");
                decide(None, required, &self.routes)
            }
        };
        if let AccessDecision::Redirect(route) = &decision {
            tracing::debug!(%route, required = %required, "access denied; redirecting");
        }
        GuardResolution::Decided(decision)
    }
}
