//! Route guard: only signed-in browsers reach the admin pages.
//!
//! The guard checks that the token cookie is present and nothing more.
//! Whether the token is still good is for the backend to say; a rejected
//! token is handled by [`super::auth_failure`].

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::token_store::has_token_cookie;

/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";

/// Sign-out endpoint. Public so a session whose token cookie has expired
/// can still be ended.
pub const LOGOUT_PATH: &str = "/logout";

/// Paths reachable without signing in, matched by whole path segment.
const PUBLIC_PREFIXES: &[&str] = &[LOGIN_PATH, LOGOUT_PATH, "/health", "/static"];

/// Whether `path` is on the public allow-list.
#[must_use]
pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// `/login?from=<path>`, with each path segment percent-encoded.
#[must_use]
pub fn login_redirect(path: &str) -> String {
    let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
    format!("{LOGIN_PATH}?from={}", encoded.join("/"))
}

/// Whether `target` is safe to redirect to after signing in: a path on
/// this site, not a scheme-relative or absolute URL.
#[must_use]
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.contains('\\')
}

/// Redirect requests without a token cookie to the login page.
pub async fn route_guard_middleware(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_public(path) || has_token_cookie(&jar) {
        return next.run(request).await;
    }

    tracing::debug!(path, "No session cookie, redirecting to login");
    Redirect::to(&login_redirect(path)).into_response()
}
