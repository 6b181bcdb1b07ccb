//! HTTP plumbing for the Helper API gateway.

use std::sync::Arc;

use helper_admin_core::ApiResponse;
use reqwest::{RequestBuilder, StatusCode, header};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;

use super::{Credentials, HelperError};
use crate::config::HelperApiConfig;

/// Gateway liveness endpoint used by the readiness probe.
const HEALTH_PATH: &str = "/gateway/health";

/// Client for the Helper API gateway.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HelperClient {
    inner: Arc<HelperClientInner>,
}

struct HelperClientInner {
    client: reqwest::Client,
    base_url: String,
}

/// Error body shape shared by the backend's exception handlers.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl HelperClient {
    /// Create a client for the configured gateway.
    ///
    /// # Errors
    ///
    /// Returns `HelperError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &HelperApiConfig) -> Result<Self, HelperError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("helper-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(HelperClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// `GET path?query` and return the envelope's `data`.
    ///
    /// # Errors
    ///
    /// Returns `HelperError::Unauthorized` on 401, `HelperError::Status` on
    /// any other non-2xx, and `HelperError::MissingData` if `data` is absent.
    #[instrument(skip(self, creds, query), fields(scope = %creds.scope()))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        creds: &Credentials,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, HelperError> {
        let request = self.inner.client.get(self.url(path)).query(query);
        let envelope = self.execute::<T>(creds, request).await?;
        envelope
            .data
            .ok_or_else(|| HelperError::MissingData(path.to_string()))
    }

    /// `POST path` with a JSON body and return the envelope's `data`.
    ///
    /// # Errors
    ///
    /// See [`HelperClient::get`].
    #[instrument(skip(self, creds, body), fields(scope = %creds.scope()))]
    pub async fn post<B, T>(&self, creds: &Credentials, path: &str, body: &B) -> Result<T, HelperError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.inner.client.post(self.url(path)).json(body);
        let envelope = self.execute::<T>(creds, request).await?;
        envelope
            .data
            .ok_or_else(|| HelperError::MissingData(path.to_string()))
    }

    /// `PUT path`, optionally with a JSON body. Returns the envelope message.
    ///
    /// Mutation responses are not cached or shown beyond their message, so
    /// `data` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `HelperError::Unauthorized` on 401 and `HelperError::Status`
    /// on any other non-2xx.
    #[instrument(skip(self, creds, body), fields(scope = %creds.scope()))]
    pub async fn put<B>(
        &self,
        creds: &Credentials,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, HelperError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.inner.client.put(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let envelope = self.execute::<serde_json::Value>(creds, request).await?;
        Ok(envelope.message)
    }

    /// Whether the gateway answers its health endpoint.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error if the gateway is unhealthy.
    pub async fn probe(&self) -> Result<(), HelperError> {
        let response = self.inner.client.get(self.url(HEALTH_PATH)).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HelperError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unavailable").to_string(),
            })
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        creds: &Credentials,
        request: RequestBuilder,
    ) -> Result<ApiResponse<T>, HelperError> {
        let request = match creds.token() {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        };

        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("Helper API rejected the session token");
            return Err(HelperError::Unauthorized);
        }

        if !status.is_success() {
            let message = error_message(status, &body);
            tracing::warn!(status = status.as_u16(), %message, "Helper API request failed");
            return Err(HelperError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse {
                success: true,
                message: String::new(),
                data: None,
                timestamp: None,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Message from an error body, falling back to the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::helper::BearerToken;
    use helper_admin_core::{KycReviewRequest, KycDecision, UserStats};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HelperClient {
        HelperClient::new(&HelperApiConfig::new(&server.uri()).unwrap()).unwrap()
    }

    fn admin() -> Credentials {
        Credentials::bearer(BearerToken::new("admin-token"))
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_and_unwraps_data() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/stats"))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "ok",
                "data": {"totalUsers": 7, "totalCustomers": 4, "totalWorkers": 2, "totalAdmins": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let stats: UserStats = client_for(&server)
            .get(&admin(), "/api/v1/admin/stats", &[])
            .await
            .unwrap();
        assert_eq!(stats.total_users, 7);
    }

    #[tokio::test]
    async fn test_get_sends_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/kyc/pending"))
            .and(query_param("status", "PENDING"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": []})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let docs: Vec<serde_json::Value> = client_for(&server)
            .get(&admin(), "/api/v1/admin/kyc/pending", &[("status", "PENDING".to_string())])
            .await
            .unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/stats"))
            .and(header("authorization", "Bearer admin-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/admin/stats"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<UserStats>(&Credentials::anonymous(), "/api/v1/admin/stats", &[])
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_401_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<UserStats>(&admin(), "/api/v1/admin/stats", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::Unauthorized));
    }

    #[tokio::test]
    async fn test_error_status_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(json!({"success": false, "message": "Document already reviewed"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .put::<()>(&admin(), "/api/v1/admin/kyc/k-1/review", None)
            .await
            .unwrap_err();
        match err {
            HelperError::Status { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Document already reviewed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_status_without_body_uses_reason() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<UserStats>(&admin(), "/api/v1/admin/stats", &[])
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Service Unavailable");
    }

    #[tokio::test]
    async fn test_put_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/admin/kyc/k-1/review"))
            .and(body_json(json!({"status": "APPROVED"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "KYC approved"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = KycReviewRequest::new(KycDecision::Approved, None);
        let message = client_for(&server)
            .put(&admin(), "/api/v1/admin/kyc/k-1/review", Some(&body))
            .await
            .unwrap();
        assert_eq!(message, "KYC approved");
    }

    #[tokio::test]
    async fn test_missing_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ok"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<UserStats>(&admin(), "/api/v1/admin/stats", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::MissingData(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get::<UserStats>(&admin(), "/api/v1/admin/stats", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::Parse(_)));
    }
}
