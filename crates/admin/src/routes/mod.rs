//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (Helper API reachable)
//!
//! # Auth
//! GET  /login                  - Sign-in form
//! POST /login                  - Sign in against the Helper API
//! POST /logout                 - Sign out
//!
//! # Overview
//! GET  /                       - Dashboard (platform statistics)
//! GET  /tasks                  - Task statistics by status and domain
//!
//! # Users
//! GET  /users                  - User list (?role, ?status, ?page, ?confirm)
//! POST /users/{id}/activate    - Re-activate a suspended user
//! POST /users/{id}/deactivate  - Suspend a user
//!
//! # KYC
//! GET  /kyc                    - KYC queue (?status, ?review)
//! POST /kyc/{id}/review        - Approve or reject a document
//!
//! # Flags
//! GET  /flags                  - Flag queue (?status, ?review)
//! POST /flags/{id}/review      - Dismiss or action a flag
//!
//! GET  /static/*               - Stylesheet
//! ```

pub mod auth;
pub mod dashboard;
pub mod flags;
pub mod kyc;
pub mod tasks;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::{AppError, Result};
use crate::helper::HelperError;
use crate::middleware::{
    AdminContext, auth_failure_middleware, create_session_layer, request_id_middleware,
    route_guard_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Shown in place of a value whose read failed.
pub const UNAVAILABLE: &str = "—";

/// Sidebar entries, in display order.
const NAV: &[(&str, &str)] = &[
    ("/", "Dashboard"),
    ("/users", "Users"),
    ("/kyc", "KYC Approvals"),
    ("/tasks", "Tasks"),
    ("/flags", "Flags & Disputes"),
];

/// One sidebar link.
#[derive(Debug, Clone)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Data every page inside the admin shell needs.
#[derive(Debug, Clone)]
pub struct Layout {
    pub admin_email: String,
    pub nav: Vec<NavItem>,
}

impl Layout {
    /// Shell for the page at `current`.
    #[must_use]
    pub fn new(ctx: &AdminContext, current: &str) -> Self {
        Self {
            admin_email: ctx.email().to_string(),
            nav: NAV
                .iter()
                .map(|&(href, label)| NavItem {
                    href,
                    label,
                    active: href == current,
                })
                .collect(),
        }
    }
}

/// Split a read into what the view shows and what ends the request.
///
/// A rejected session comes back as an error so the sign-out flow runs.
/// Any other failure is logged and becomes `None`, which the view renders
/// as a "Failed to load" banner or a dash.
pub(crate) fn loaded<T>(result: std::result::Result<T, HelperError>, what: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(HelperError::Unauthorized) => Err(AppError::Helper(HelperError::Unauthorized)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load {what}");
            Ok(None)
        }
    }
}

/// Status and dialog message for a mutation the backend refused.
///
/// A rejected session is passed through as an error instead.
pub(crate) fn rejected(err: HelperError) -> Result<(StatusCode, String)> {
    if err.is_unauthorized() {
        return Err(AppError::Helper(err));
    }
    tracing::warn!(error = %err, "Helper API rejected mutation");
    Ok((AppError::helper_status(&err), err.user_message()))
}

/// Whether a query value selects a concrete option rather than "all".
pub(crate) fn selected(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != crate::components::data_table::ALL)
}

/// Every page and form handler.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(tasks::router())
        .merge(users::router())
        .merge(kyc::router())
        .merge(flags::router())
}

/// The full application: routes, static files and the middleware stack.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let static_dir = state.config().static_dir.clone();

    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(from_fn_with_state(state.clone(), auth_failure_middleware))
        .layer(from_fn(route_guard_middleware))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the Helper API gateway is not
/// reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.client().probe().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Helper API not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::Credentials;
    use helper_admin_core::{AdminIdentity, UserId, UserRole};

    fn ctx() -> AdminContext {
        AdminContext {
            admin: Some(AdminIdentity {
                id: UserId::new("a1"),
                name: "Asha".to_string(),
                email: "asha@helper.app".to_string(),
                role: UserRole::Admin,
            }),
            credentials: Credentials::anonymous(),
        }
    }

    #[test]
    fn test_layout_marks_current_page() {
        let layout = Layout::new(&ctx(), "/kyc");
        assert_eq!(layout.admin_email, "asha@helper.app");
        let active: Vec<_> = layout.nav.iter().filter(|i| i.active).map(|i| i.href).collect();
        assert_eq!(active, vec!["/kyc"]);
    }

    #[test]
    fn test_loaded_passes_session_rejection_through() {
        let result: std::result::Result<u32, _> = Err(HelperError::Unauthorized);
        assert!(loaded(result, "stats").is_err());
    }

    #[test]
    fn test_loaded_swallows_other_failures() {
        let result: std::result::Result<u32, _> = Err(HelperError::Status {
            status: 503,
            message: "down".to_string(),
        });
        assert!(matches!(loaded(result, "stats"), Ok(None)));
        assert!(matches!(loaded(Ok(3), "stats"), Ok(Some(3))));
    }

    #[test]
    fn test_rejected_keeps_backend_message() {
        let (status, message) = rejected(HelperError::Status {
            status: 409,
            message: "Document already reviewed".to_string(),
        })
        .unwrap_or_else(|_| panic!("not an auth failure"));
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(message, "Document already reviewed");
        assert!(rejected(HelperError::Unauthorized).is_err());
    }

    #[test]
    fn test_selected_treats_all_as_absent() {
        assert_eq!(selected(Some("ALL")), None);
        assert_eq!(selected(Some("")), None);
        assert_eq!(selected(None), None);
        assert_eq!(selected(Some("WORKER")), Some("WORKER"));
    }
}
