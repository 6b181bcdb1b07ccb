//! Integration tests for Helper Admin.
//!
//! Each test spawns the full admin router on an ephemeral port, backed by a
//! `wiremock` server standing in for the Helper API gateway. Requests go
//! through a real `reqwest` client with a cookie store, so sessions, the
//! route guard and the sign-out flow behave exactly as in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p helper-admin-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use helper_admin::config::AdminConfig;
use helper_admin::routes;
use helper_admin::state::AppState;
use reqwest::{Client, Response, redirect::Policy};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token the mocked login hands out.
pub const TEST_TOKEN: &str = "test-token";

/// `Authorization` header value carried by signed-in backend calls.
pub const BEARER: &str = "Bearer test-token";

/// Wrap `data` in the backend's response envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "message": "OK",
        "data": data,
        "timestamp": "2025-03-14T09:26:53"
    })
}

/// Envelope of a successful write.
#[must_use]
pub fn done(message: &str) -> Value {
    json!({ "success": true, "message": message, "data": null })
}

/// Envelope of a failed call.
#[must_use]
pub fn failure(message: &str) -> Value {
    json!({ "success": false, "message": message, "data": null })
}

/// A user record as the backend sends it.
#[must_use]
pub fn user(id: &str, name: &str, role: &str, status: &str) -> Value {
    json!({
        "userId": id,
        "fullName": name,
        "email": format!("{id}@helper.app"),
        "phone": "+91 98765 43210",
        "role": role,
        "verificationStatus": status,
        "emailVerified": true,
        "createdAt": "2025-01-05T10:00:00"
    })
}

/// A paged response body.
#[must_use]
pub fn page(content: Vec<Value>, total_pages: u32, number: u32) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": total_pages,
        "number": number,
        "size": 20
    })
}

/// The admin panel running against a mocked Helper API.
pub struct TestApp {
    /// Base URL of the admin panel, e.g. `http://127.0.0.1:41234`.
    pub address: String,
    /// The mocked Helper API gateway.
    pub backend: MockServer,
    /// Browser-like client: keeps cookies, does not follow redirects.
    pub client: Client,
}

impl TestApp {
    /// Start a fresh backend mock and admin server.
    pub async fn spawn() -> Self {
        let backend = MockServer::start().await;
        let config = AdminConfig::local(&backend.uri()).expect("valid backend URL");
        let state = AppState::new(config).expect("failed to build state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind");
        let address = format!("http://{}", listener.local_addr().expect("local addr"));

        tokio::spawn(async move {
            axum::serve(listener, routes::app(state))
                .await
                .expect("server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .expect("failed to build client");

        Self {
            address,
            backend,
            client,
        }
    }

    /// Absolute URL for a panel path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// `GET` a panel path.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("request failed")
    }

    /// `POST` a form to a panel path.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("request failed")
    }

    /// Mock a successful login for an account with `role`.
    pub async fn mock_login(&self, role: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
                "accessToken": TEST_TOKEN,
                "tokenType": "Bearer",
                "expiresIn": 900,
                "user": user("admin-1", "Asha Admin", role, "VERIFIED")
            }))))
            .mount(&self.backend)
            .await;
    }

    /// Sign in as an admin; panics unless the panel redirects home.
    pub async fn sign_in(&self) {
        self.mock_login("ADMIN").await;
        let response = self
            .post_form(
                "/login",
                &[("email", "asha@helper.app"), ("password", "secret")],
            )
            .await;
        assert_eq!(response.status(), 303, "login should redirect");
        assert_eq!(location(&response), "/");
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Every `Set-Cookie` header of a response.
#[must_use]
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(String::from)
        .collect()
}

/// `name=value` of the cookie `name` set by a response, ready to be sent
/// back in a `Cookie` header.
#[must_use]
pub fn cookie_pair(response: &Response, name: &str) -> Option<String> {
    set_cookies(response).into_iter().find_map(|cookie| {
        let pair = cookie.split(';').next()?.trim().to_string();
        pair.strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('='))
            .then_some(pair)
    })
}
