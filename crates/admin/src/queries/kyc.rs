//! KYC review queue.

use helper_admin_core::{KycDocument, KycDocumentId, KycReviewRequest, KycStatus};
use tracing::instrument;

use super::{QueryFamily, QueryKey, read, write};
use crate::helper::{Credentials, HelperError};
use crate::state::AppState;

const KYC_PATH: &str = "/api/v1/admin/kyc";

/// `GET /api/v1/admin/kyc/pending?status=`
///
/// # Errors
///
/// Returns the backend error after one retry.
#[instrument(skip(state, creds))]
pub async fn queue(
    state: &AppState,
    creds: &Credentials,
    status: KycStatus,
) -> Result<Vec<KycDocument>, HelperError> {
    read(
        state,
        creds,
        QueryKey::KycQueue(status),
        &format!("{KYC_PATH}/pending"),
        &[("status", status.as_str().to_string())],
    )
    .await
}

/// `PUT /api/v1/admin/kyc/{id}/review`
///
/// # Errors
///
/// Returns the backend error; the request is never retried.
#[instrument(skip(state, creds, id, request), fields(document_id = %id, decision = %request.status))]
pub async fn review(
    state: &AppState,
    creds: &Credentials,
    id: &KycDocumentId,
    request: &KycReviewRequest,
) -> Result<String, HelperError> {
    let path = format!("{KYC_PATH}/{}/review", urlencoding::encode(id.as_str()));
    let message = write(state, creds, &path, Some(request), QueryFamily::Kyc).await?;
    tracing::info!("KYC document reviewed");
    Ok(message)
}
