//! Advisory route gating over the cookie-declared user profile.
//!
//! Only the presence of the profile and its `userType` are consulted. The
//! cookie is not signed, so these rules are a navigation convenience and must
//! not be relied on as an authorization boundary.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::auth::profile_from_cookies;
use crate::types::{UserProfile, UserType};

pub const LOGIN_PATH: &str = "/login";
pub const RECRUITER_HOME: &str = "/dashboard";
pub const CANDIDATE_HOME: &str = "/jobs";

/// Who may visit a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone
    Public,
    /// Only visitors without a profile (login, signup)
    GuestOnly,
    /// Any signed-in user
    Authenticated,
    /// Recruiters and admins
    Recruiter,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub prefix: String,
    pub access: Access,
}

impl Rule {
    pub fn new(prefix: impl Into<String>, access: Access) -> Self {
        Self {
            prefix: prefix.into(),
            access,
        }
    }

    fn matches(&self, path: &str) -> bool {
        if self.prefix == "/" {
            return path == "/";
        }
        path == self.prefix
            || path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// Ordered prefix rules; the longest matching prefix wins and unmatched
/// paths are allowed.
#[derive(Debug, Clone)]
pub struct RouteGate {
    rules: Vec<Rule>,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self::new(vec![
            Rule::new("/", Access::Public),
            Rule::new("/jobs", Access::Public),
            Rule::new("/about", Access::Public),
            Rule::new("/static", Access::Public),
            Rule::new("/favicon.ico", Access::Public),
            Rule::new(LOGIN_PATH, Access::GuestOnly),
            Rule::new("/signup", Access::GuestOnly),
            Rule::new("/profile", Access::Authenticated),
            Rule::new("/applications", Access::Authenticated),
            Rule::new(RECRUITER_HOME, Access::Recruiter),
            Rule::new("/applicants", Access::Recruiter),
            Rule::new("/positions", Access::Recruiter),
            Rule::new("/admin", Access::Admin),
        ])
    }
}

impl RouteGate {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn access_for(&self, path: &str) -> Access {
        self.rules
            .iter()
            .filter(|rule| rule.matches(path))
            .max_by_key(|rule| rule.prefix.len())
            .map(|rule| rule.access)
            .unwrap_or(Access::Public)
    }

    pub fn evaluate(&self, path: &str, profile: Option<&UserProfile>) -> GateDecision {
        let user_type = profile.map(|p| p.user_type);

        match (self.access_for(path), user_type) {
            (Access::Public, _) => GateDecision::Allow,

            (Access::GuestOnly, None) => GateDecision::Allow,
            (Access::GuestOnly, Some(user_type)) => redirect(home_for(user_type)),

            (_, None) => redirect(&login_redirect(path)),

            (Access::Authenticated, Some(_)) => GateDecision::Allow,

            (Access::Recruiter, Some(UserType::Recruiter | UserType::Admin)) => GateDecision::Allow,
            (Access::Recruiter, Some(UserType::Candidate)) => redirect(CANDIDATE_HOME),

            (Access::Admin, Some(UserType::Admin)) => GateDecision::Allow,
            (Access::Admin, Some(user_type)) => redirect(home_for(user_type)),
        }
    }
}

/// Landing page for a signed-in user.
pub fn home_for(user_type: UserType) -> &'static str {
    match user_type {
        UserType::Recruiter | UserType::Admin => RECRUITER_HOME,
        UserType::Candidate => CANDIDATE_HOME,
    }
}

fn login_redirect(path: &str) -> String {
    format!("{}?redirect={}", LOGIN_PATH, urlencoding::encode(path))
}

fn redirect(to: &str) -> GateDecision {
    GateDecision::Redirect(to.to_string())
}

/// Axum middleware applying a [`RouteGate`] to every request.
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/dashboard", get(dashboard))
///     .layer(axum::middleware::from_fn_with_state(
///         Arc::new(RouteGate::default()),
///         route_gate_middleware,
///     ));
/// ```
pub async fn route_gate_middleware(
    State(gate): State<Arc<RouteGate>>,
    request: Request,
    next: Next,
) -> Response {
    let cookie_header = request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let profile = profile_from_cookies(&cookie_header);

    match gate.evaluate(request.uri().path(), profile.as_ref()) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(to) => {
            debug!(path = %request.uri().path(), redirect = %to, "Route gated");
            Redirect::temporary(&to).into_response()
        }
    }
}
