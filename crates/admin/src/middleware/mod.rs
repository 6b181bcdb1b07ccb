//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store)
//! 6. Route guard (token cookie required outside the allow-list)
//! 7. Auth failure (sign out when the backend rejects the token)

pub mod auth;
pub mod auth_failure;
pub mod request_id;
pub mod route_guard;
pub mod security_headers;
pub mod session;
pub mod token_store;

pub use auth::AdminContext;
pub use auth_failure::auth_failure_middleware;
pub use request_id::request_id_middleware;
pub use route_guard::route_guard_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use token_store::TokenStore;
