//! Sign-in, route guard and sign-out behaviour.

use helper_admin_integration_tests::{
    BEARER, TestApp, cookie_pair, envelope, failure, location, page, set_cookies, user,
};
use reqwest::redirect::Policy;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "ok");
}

#[tokio::test]
async fn test_readiness_follows_gateway() {
    let app = TestApp::spawn().await;

    // Nothing mounted: the gateway health check answers 404.
    assert_eq!(app.get("/health/ready").await.status(), 503);

    Mock::given(method("GET"))
        .and(path("/gateway/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.backend)
        .await;
    assert_eq!(app.get("/health/ready").await.status(), 200);
}

#[tokio::test]
async fn test_guard_redirects_to_login_with_return_path() {
    let app = TestApp::spawn().await;

    let response = app.get("/users").await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login?from=/users");
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = TestApp::spawn().await;

    let response = app.get("/login?from=/kyc").await;

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("name=\"password\""));
    assert!(body.contains("value=\"/kyc\""));
}

#[tokio::test]
async fn test_admin_login_sets_token_cookie() {
    let app = TestApp::spawn().await;
    app.mock_login("ADMIN").await;

    let response = app
        .post_form(
            "/login",
            &[("email", "asha@helper.app"), ("password", "secret")],
        )
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("helper_admin_token=test-token")));
    assert!(cookies.iter().any(|c| c.starts_with("helper_admin_session=")));
}

#[tokio::test]
async fn test_login_honours_local_return_path_only() {
    let app = TestApp::spawn().await;
    app.mock_login("ADMIN").await;

    let response = app
        .post_form(
            "/login",
            &[("email", "a@helper.app"), ("password", "x"), ("from", "/kyc")],
        )
        .await;
    assert_eq!(location(&response), "/kyc");

    let response = app
        .post_form(
            "/login",
            &[
                ("email", "a@helper.app"),
                ("password", "x"),
                ("from", "https://evil.example/"),
            ],
        )
        .await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_non_admin_login_is_denied() {
    let app = TestApp::spawn().await;
    app.mock_login("CUSTOMER").await;

    let response = app
        .post_form(
            "/login",
            &[("email", "c@helper.app"), ("password", "secret")],
        )
        .await;

    assert_eq!(response.status(), 403);
    assert!(
        !set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("helper_admin_token="))
    );
    let body = response.text().await.expect("body");
    assert!(body.contains("Access denied. This panel is for administrators only."));

    // Still signed out.
    assert_eq!(app.get("/").await.status(), 303);
}

#[tokio::test]
async fn test_bad_credentials_show_backend_message() {
    let app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(failure("Invalid email or password")))
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/login", &[("email", "a@helper.app"), ("password", "nope")])
        .await;

    assert_eq!(response.status(), 400);
    let body = response.text().await.expect("body");
    assert!(body.contains("Invalid email or password"));
    assert!(body.contains("value=\"a@helper.app\""));
}

#[tokio::test]
async fn test_backend_401_signs_out() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users"))
        .and(header("authorization", BEARER))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app.get("/users").await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
    assert!(
        set_cookies(&response)
            .iter()
            .any(|c| c.starts_with("helper_admin_token=;") && c.contains("Max-Age=0"))
    );

    // The browser has lost its token and is stopped by the guard.
    let response = app.get("/users").await;
    assert_eq!(location(&response), "/login?from=/users");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::spawn().await;
    app.sign_in().await;

    let response = app.post_form("/logout", &[]).await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
    assert_eq!(location(&app.get("/kyc").await), "/login?from=/kyc");
}

#[tokio::test]
async fn test_logout_with_expired_token_cookie_ends_session() {
    let app = TestApp::spawn().await;
    app.mock_login("ADMIN").await;
    let login = app
        .post_form("/login", &[("email", "asha@helper.app"), ("password", "secret")])
        .await;
    let session = cookie_pair(&login, "helper_admin_session").expect("session cookie");

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users"))
        .and(header("authorization", BEARER))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(page(
            vec![user("w1", "Ravi Kumar", "WORKER", "VERIFIED")],
            1,
            0,
        ))))
        .expect(0)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/users"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.backend)
        .await;

    // A browser whose token cookie has lapsed only sends the session cookie.
    let browser = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("client");
    let response = browser
        .post(app.url("/logout"))
        .header("cookie", &session)
        .send()
        .await
        .expect("logout");
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");

    // The old session no longer carries the backend token.
    let response = browser
        .get(app.url("/users"))
        .header("cookie", format!("{session}; helper_admin_token=anything"))
        .send()
        .await
        .expect("users");
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_login_never_returns_to_logout() {
    let app = TestApp::spawn().await;
    app.mock_login("ADMIN").await;

    let response = app
        .post_form(
            "/login",
            &[("email", "asha@helper.app"), ("password", "secret"), ("from", "/logout")],
        )
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::spawn().await;

    let response = app.get("/login").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").expect("frame"), "DENY");
    assert_eq!(headers.get("x-content-type-options").expect("nosniff"), "nosniff");
    assert!(headers.get("x-request-id").is_some());
}
