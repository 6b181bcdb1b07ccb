//! Dashboard aggregates. Each snapshot is fetched and cached on its own so
//! one failing service does not blank the whole dashboard.

use helper_admin_core::{
    KycStats, NotificationStats, PaymentStats, RatingStats, TaskStats, UserStats,
};

use super::{QueryKey, read};
use crate::helper::{Credentials, HelperError};
use crate::state::AppState;

/// `GET /api/v1/admin/stats`
///
/// # Errors
///
/// Returns the backend error after one retry.
pub async fn users(state: &AppState, creds: &Credentials) -> Result<UserStats, HelperError> {
    read(state, creds, QueryKey::UserStats, "/api/v1/admin/stats", &[]).await
}

/// `GET /api/v1/tasks/admin/stats`
///
/// # Errors
///
/// Returns the backend error after one retry.
pub async fn tasks(state: &AppState, creds: &Credentials) -> Result<TaskStats, HelperError> {
    read(state, creds, QueryKey::TaskStats, "/api/v1/tasks/admin/stats", &[]).await
}

/// `GET /api/v1/admin/payments/stats`
///
/// # Errors
///
/// Returns the backend error after one retry.
pub async fn payments(
    state: &AppState,
    creds: &Credentials,
) -> Result<PaymentStats, HelperError> {
    read(
        state,
        creds,
        QueryKey::PaymentStats,
        "/api/v1/admin/payments/stats",
        &[],
    )
    .await
}

/// `GET /api/v1/admin/ratings/stats`
///
/// # Errors
///
/// Returns the backend error after one retry.
pub async fn ratings(state: &AppState, creds: &Credentials) -> Result<RatingStats, HelperError> {
    read(
        state,
        creds,
        QueryKey::RatingStats,
        "/api/v1/admin/ratings/stats",
        &[],
    )
    .await
}

/// `GET /api/v1/admin/kyc/stats`
///
/// # Errors
///
/// Returns the backend error after one retry.
pub async fn kyc(state: &AppState, creds: &Credentials) -> Result<KycStats, HelperError> {
    read(state, creds, QueryKey::KycStats, "/api/v1/admin/kyc/stats", &[]).await
}

/// `GET /api/v1/admin/notifications/stats`
///
/// # Errors
///
/// Returns the backend error after one retry.
pub async fn notifications(
    state: &AppState,
    creds: &Credentials,
) -> Result<NotificationStats, HelperError> {
    read(
        state,
        creds,
        QueryKey::NotificationStats,
        "/api/v1/admin/notifications/stats",
        &[],
    )
    .await
}
