//! KYC document and rating flag reviews.

use helper_admin_integration_tests::{BEARER, TestApp, done, envelope, failure, location};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn document(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "userName": name,
        "email": "ravi@helper.app",
        "documentType": "AADHAAR",
        "documentUrl": "https://files.helper.app/kyc/doc-1.pdf",
        "status": "PENDING",
        "submittedAt": "2025-02-01T08:30:00"
    })
}

fn flag(id: &str) -> Value {
    json!({
        "id": id,
        "flaggedByName": "Meera",
        "targetUserName": "Arjun",
        "reason": "Abusive language",
        "ratingScore": 1.0,
        "ratingComment": "Terrible",
        "status": "PENDING",
        "createdAt": "2025-02-03T12:00:00"
    })
}

async fn mock_kyc_queue(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/kyc/pending"))
        .and(query_param("status", "PENDING"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(json!([document("k1", "Ravi Kumar")]))),
        )
        .mount(&app.backend)
        .await;
}

async fn mock_flag_queue(app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/api/v1/admin/flags/pending"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([flag("f1")]))))
        .mount(&app.backend)
        .await;
}

#[tokio::test]
async fn test_kyc_queue_defaults_to_pending() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    mock_kyc_queue(&app).await;

    let response = app.get("/kyc").await;

    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains("Ravi Kumar"));
    assert!(body.contains("1 document"));
    assert!(body.contains("https://files.helper.app/kyc/doc-1.pdf"));
    assert!(body.contains("review=k1&#38;action=REJECTED"));
}

#[tokio::test]
async fn test_kyc_reject_dialog_asks_for_reason() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    mock_kyc_queue(&app).await;

    let body = app
        .get("/kyc?status=PENDING&review=k1&action=REJECTED")
        .await
        .text()
        .await
        .expect("body");

    assert!(body.contains("Reject KYC Document"));
    assert!(body.contains("Reject identity document for Ravi Kumar. Please provide a reason."));
    assert!(body.contains("Reason for rejection..."));
    assert!(body.contains("action=\"/kyc/k1/review\""));
}

#[tokio::test]
async fn test_kyc_reject_without_reason_never_reaches_backend() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    mock_kyc_queue(&app).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/kyc/k1/review"))
        .respond_with(ResponseTemplate::new(200).set_body_json(done("Reviewed")))
        .expect(0)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/kyc/k1/review",
            &[("action", "REJECTED"), ("admin_notes", "   "), ("status", "PENDING")],
        )
        .await;

    assert_eq!(response.status(), 422);
    let body = response.text().await.expect("body");
    assert!(body.contains("Please provide a reason for rejection."));
    assert!(body.contains("Reject KYC Document"));
}

#[tokio::test]
async fn test_kyc_approve_omits_blank_notes() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/kyc/k1/review"))
        .and(header("authorization", BEARER))
        .and(body_json(json!({"status": "APPROVED"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(done("KYC approved")))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/kyc/k1/review",
            &[("action", "APPROVED"), ("admin_notes", ""), ("status", "PENDING")],
        )
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/kyc?status=PENDING");
}

#[tokio::test]
async fn test_kyc_reject_sends_trimmed_reason() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/kyc/k1/review"))
        .and(body_json(json!({"status": "REJECTED", "adminNotes": "Blurry scan"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(done("KYC rejected")))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/kyc/k1/review",
            &[("action", "REJECTED"), ("admin_notes", "  Blurry scan "), ("status", "PENDING")],
        )
        .await;

    assert_eq!(response.status(), 303);
}

#[tokio::test]
async fn test_kyc_backend_rejection_keeps_dialog_open() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    mock_kyc_queue(&app).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/kyc/k1/review"))
        .respond_with(ResponseTemplate::new(409).set_body_json(failure("Document already reviewed")))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/kyc/k1/review",
            &[("action", "REJECTED"), ("admin_notes", "Expired ID"), ("status", "PENDING")],
        )
        .await;

    assert_eq!(response.status(), 409);
    let body = response.text().await.expect("body");
    assert!(body.contains("Document already reviewed"));
    assert!(body.contains("Expired ID"));
}

#[tokio::test]
async fn test_flag_dismiss_never_hides_rating() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/flags/f1/review"))
        .and(header("authorization", BEARER))
        .and(body_json(json!({"action": "DISMISS", "hideRating": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(done("Flag dismissed")))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/flags/f1/review",
            &[("action", "DISMISS"), ("hide_rating", "true"), ("status", "PENDING")],
        )
        .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/flags?status=PENDING");
}

#[tokio::test]
async fn test_flag_action_can_hide_rating() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/admin/flags/f1/review"))
        .and(body_json(json!({
            "action": "ACTION_TAKEN",
            "hideRating": true,
            "adminNote": "Warned the reviewer"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(done("Flag actioned")))
        .expect(1)
        .mount(&app.backend)
        .await;

    let response = app
        .post_form(
            "/flags/f1/review",
            &[
                ("action", "ACTION_TAKEN"),
                ("hide_rating", "on"),
                ("admin_note", "Warned the reviewer"),
                ("status", "PENDING"),
            ],
        )
        .await;

    assert_eq!(response.status(), 303);
}

#[tokio::test]
async fn test_flag_dialogs() {
    let app = TestApp::spawn().await;
    app.sign_in().await;
    mock_flag_queue(&app).await;

    let body = app.get("/flags").await.text().await.expect("body");
    assert!(body.contains("Abusive language"));
    assert!(body.contains("review=f1&#38;action=DISMISS"));

    let body = app
        .get("/flags?status=PENDING&review=f1&action=DISMISS")
        .await
        .text()
        .await
        .expect("body");
    assert!(body.contains("Dismiss this flag. The rating will remain visible."));
    assert!(!body.contains("name=\"hide_rating\""));

    let body = app
        .get("/flags?status=PENDING&review=f1&action=ACTION_TAKEN")
        .await
        .text()
        .await
        .expect("body");
    assert!(body.contains("Take Action on Flag"));
    assert!(body.contains("name=\"hide_rating\""));
}
