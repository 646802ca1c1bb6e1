//! Behaviour coverage for the session guard.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;

use super::access::AccessDecision;
use super::error::GatewayError;
use super::guard::{GuardResolution, MountBinding, SessionGuard};
use super::ports::SessionQuery;
use super::role::{PortalRole, PortalRoutes, Route};
use super::session::{SessionSnapshot, SessionUser};

struct FixtureSessionQuery(Result<SessionSnapshot, GatewayError>);

#[async_trait]
impl SessionQuery for FixtureSessionQuery {
    async fn current_session(&self) -> Result<SessionSnapshot, GatewayError> {
        self.0.clone()
    }
}

/// Unmounts its binding while the query is in flight.
struct UnmountingSessionQuery {
    binding: MountBinding,
    snapshot: SessionSnapshot,
}

#[async_trait]
impl SessionQuery for UnmountingSessionQuery {
    async fn current_session(&self) -> Result<SessionSnapshot, GatewayError> {
        self.binding.unmount();
        Ok(self.snapshot.clone())
    }
}

fn authenticated_as(role: PortalRole) -> SessionSnapshot {
    SessionSnapshot {
        authenticated: true,
        user: Some(SessionUser {
            user_type: role,
            name: None,
            email: None,
        }),
    }
}

fn guard_over(query: impl SessionQuery + 'static) -> SessionGuard {
    SessionGuard::new(Arc::new(query), PortalRoutes::default())
}

fn route(raw: &str) -> Route {
    Route::new(raw).expect("fixture route")
}

#[rstest]
#[case(PortalRole::Resident)]
#[case(PortalRole::Staff)]
#[tokio::test]
async fn unauthenticated_visitors_are_sent_to_landing(#[case] required: PortalRole) {
    let guard = guard_over(FixtureSessionQuery(Ok(SessionSnapshot::default())));
    let resolution = guard.admit(required, &MountBinding::new()).await;
    assert_eq!(
        resolution,
        GuardResolution::Decided(AccessDecision::Redirect(route("/"))),
        "every protected view must redirect unauthenticated visitors to landing",
    );
}

#[rstest]
#[case(PortalRole::Staff, PortalRole::Resident, "/staff/dashboard")]
#[case(PortalRole::Resident, PortalRole::Staff, "/resident/dashboard")]
#[tokio::test]
async fn mismatched_roles_are_sent_to_their_own_dashboard(
    #[case] held: PortalRole,
    #[case] required: PortalRole,
    #[case] expected: &str,
) {
    let guard = guard_over(FixtureSessionQuery(Ok(authenticated_as(held))));
    let resolution = guard.admit(required, &MountBinding::new()).await;
    assert_eq!(
        resolution,
        GuardResolution::Decided(AccessDecision::Redirect(route(expected))),
    );
}

#[rstest]
#[case(PortalRole::Resident)]
#[case(PortalRole::Staff)]
#[tokio::test]
async fn matching_roles_render(#[case] role: PortalRole) {
    let guard = guard_over(FixtureSessionQuery(Ok(authenticated_as(role))));
    let resolution = guard.admit(role, &MountBinding::new()).await;
    assert_eq!(resolution, GuardResolution::Decided(AccessDecision::Render));
}

#[tokio::test]
async fn query_failure_on_a_staff_view_redirects_to_landing_not_the_other_portal() {
    let guard = guard_over(FixtureSessionQuery(Err(GatewayError::transport(
        "connection refused",
    ))));
    let resolution = guard.admit(PortalRole::Staff, &MountBinding::new()).await;
    assert_eq!(
        resolution,
        GuardResolution::Decided(AccessDecision::Redirect(route("/"))),
        "a failed query must land on the public landing route, never a dashboard",
    );
}

#[tokio::test]
async fn decisions_resolved_after_unmount_are_discarded() {
    let binding = MountBinding::new();
    let guard = guard_over(UnmountingSessionQuery {
        binding: binding.clone(),
        snapshot: authenticated_as(PortalRole::Staff),
    });
    let resolution = guard.admit(PortalRole::Staff, &binding).await;
    assert_eq!(
        resolution,
        GuardResolution::Discarded,
        "no decision may apply to an unmounted view",
    );
}

#[tokio::test]
async fn bindings_share_their_mount_flag_across_clones() {
    let binding = MountBinding::new();
    let shared = binding.clone();
    assert!(binding.is_mounted());
    shared.unmount();
    assert!(!binding.is_mounted());
    // Unmounting twice is fine.
    shared.unmount();
    assert!(!binding.is_mounted());
}

#[tokio::test]
async fn each_admit_queries_the_session_afresh() {
    struct CountingQuery(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl SessionQuery for CountingQuery {
        async fn current_session(&self) -> Result<SessionSnapshot, GatewayError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(SessionSnapshot::default())
        }
    }

    let query = Arc::new(CountingQuery(std::sync::atomic::AtomicUsize::new(0)));
    let guard = SessionGuard::new(Arc::clone(&query) as Arc<dyn SessionQuery>, PortalRoutes::default());
    guard.admit(PortalRole::Staff, &MountBinding::new()).await;
    guard.admit(PortalRole::Staff, &MountBinding::new()).await;
    assert_eq!(
        query.0.load(std::sync::atomic::Ordering::SeqCst),
        2,
        "no cross-view memoization: every mount pays for a fresh query",
    );
}
