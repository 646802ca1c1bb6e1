//! Portal roles and navigation routes.
//!
//! Exactly one role belongs to an authenticated session. The backend
//! assigns it at login time; the role a visitor submits with the login form
//! is a request hint, never a grant.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Portal population a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalRole {
    /// Public-facing resident portal.
    Resident,
    /// Internal staff portal.
    Staff,
}

impl PortalRole {
    /// Wire value used by the backend (`resident` or `staff`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for PortalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned when constructing [`Route`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteValidationError {
    /// Route was missing or blank once trimmed.
    #[error("route must not be empty")]
    Empty,
    /// Route did not start with `/`.
    #[error("route must start with '/'")]
    MissingLeadingSlash,
}

/// Application-local navigation target.
///
/// ## Invariants
/// - Non-empty once trimmed.
/// - Starts with `/`: guard redirects are local navigations, never
///   cross-origin jumps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(String);

impl Route {
    /// Construct a route after validating its shape.
    ///
    /// # Examples
    /// ```
    /// use gateway::domain::Route;
    ///
    /// let route = Route::new("/staff/dashboard").expect("valid route");
    /// assert_eq!(route.as_str(), "/staff/dashboard");
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, RouteValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(RouteValidationError::Empty);
        }
        if !raw.starts_with('/') {
            return Err(RouteValidationError::MissingLeadingSlash);
        }
        Ok(Self(raw))
    }

    /// Borrow the route as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Navigation targets used by guard redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRoutes {
    /// Public landing page shown to unauthenticated visitors.
    pub landing: Route,
    /// Resident portal entry view.
    pub resident_dashboard: Route,
    /// Staff portal entry view.
    pub staff_dashboard: Route,
}

impl PortalRoutes {
    /// Dashboard route owned by the given role's portal.
    pub fn dashboard_for(&self, role: PortalRole) -> &Route {
        match role {
            PortalRole::Resident => &self.resident_dashboard,
            PortalRole::Staff => &self.staff_dashboard,
        }
    }
}

impl Default for PortalRoutes {
    fn default() -> Self {
        Self {
            landing: Route("/".to_owned()),
            resident_dashboard: Route("/resident/dashboard".to_owned()),
            staff_dashboard: Route("/staff/dashboard".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", RouteValidationError::Empty)]
    #[case("   ", RouteValidationError::Empty)]
    #[case("staff/dashboard", RouteValidationError::MissingLeadingSlash)]
    fn invalid_routes_are_rejected(#[case] raw: &str, #[case] expected: RouteValidationError) {
        assert_eq!(Route::new(raw).expect_err("route should be invalid"), expected);
    }

    #[rstest]
    #[case(PortalRole::Resident, "/resident/dashboard")]
    #[case(PortalRole::Staff, "/staff/dashboard")]
    fn default_dashboards_match_portals(#[case] role: PortalRole, #[case] expected: &str) {
        let routes = PortalRoutes::default();
        assert_eq!(routes.dashboard_for(role).as_str(), expected);
    }

    #[rstest]
    #[case(PortalRole::Resident, "\"resident\"")]
    #[case(PortalRole::Staff, "\"staff\"")]
    fn roles_use_lowercase_wire_values(#[case] role: PortalRole, #[case] expected: &str) {
        let encoded = serde_json::to_string(&role).expect("role should encode");
        assert_eq!(encoded, expected);
        let decoded: PortalRole = serde_json::from_str(expected).expect("role should decode");
        assert_eq!(decoded, role);
    }
}
