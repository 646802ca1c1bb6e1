//! Access decision table and the per-view render gate.
//!
//! Denial is not an error: every row of the table resolves to a silent
//! redirect or a render, never a user-facing failure message.

use super::role::{PortalRole, PortalRoutes, Route};
use super::session::SessionSnapshot;

/// Decision applied to a protected view once its session query resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Session matches the required role; the view may render.
    Render,
    /// Navigate to the carried route without rendering protected content.
    Redirect(Route),
}

/// Apply the access decision table.
///
/// `outcome` is `None` when the session query failed outright; that row and
/// the unauthenticated row both land on the public landing route. A
/// role mismatch redirects to the dashboard of the role the session
/// actually holds, since the backend-returned role is authoritative.
pub fn decide(
    outcome: Option<&SessionSnapshot>,
    required: PortalRole,
    routes: &PortalRoutes,
) -> AccessDecision {
    let Some(snapshot) = outcome else {
        return AccessDecision::Redirect(routes.landing.clone());
    };
    let Some(role) = snapshot.role() else {
        return AccessDecision::Redirect(routes.landing.clone());
    };
    if role == required {
        AccessDecision::Render
    } else {
        AccessDecision::Redirect(routes.dashboard_for(role).clone())
    }
}

/// Per-view admission state.
///
/// `Pending` until a decision lands, then terminal on either branch; there
/// is no transition back to `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardState {
    /// Decision not yet applied; protected content must stay hidden.
    #[default]
    Pending,
    /// Protected content may render.
    Rendered,
    /// Navigation to the carried route is in progress.
    Redirecting(Route),
}

/// State machine enforcing `Pending -> {Rendered, Redirecting}`.
///
/// One gate belongs to one view instance. Rendering protected content
/// before the gate leaves `Pending` is the unauthenticated-flash defect
/// this type exists to prevent.
#[derive(Debug, Default)]
pub struct ViewGate {
    state: GuardState,
}

impl ViewGate {
    /// Create a gate in the `Pending` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current admission state.
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// True until a decision is applied.
    pub fn is_pending(&self) -> bool {
        self.state == GuardState::Pending
    }

    /// True only after a `Render` decision.
    pub fn shows_protected_content(&self) -> bool {
        self.state == GuardState::Rendered
    }

    /// Apply the resolved decision.
    ///
    /// Terminal states ignore later decisions; there is no path back to
    /// `Pending`.
    pub fn apply(&mut self, decision: AccessDecision) {
        if self.state != GuardState::Pending {
            tracing::warn!(state = ?self.state, "access decision after terminal state ignored");
            return;
        }
        self.state = match decision {
            AccessDecision::Render => GuardState::Rendered,
            AccessDecision::Redirect(route) => GuardState::Redirecting(route),
        };
    }
}
