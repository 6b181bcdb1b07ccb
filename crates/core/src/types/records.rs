//! Records mirrored from the Helper backend.
//!
//! Field names follow the backend's camelCase JSON. Optional fields are
//! tolerated as absent or `null`; the admin panel only displays them.

use serde::{Deserialize, Serialize};

use super::id::{FlagId, KycDocumentId, RatingId, UserId};
use super::status::{FlagStatus, KycStatus, UserRole, VerificationStatus};
use super::timestamp::Timestamp;

/// Credentials posted to `/api/v1/auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// `data` of a successful login.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: PlatformUser,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// A platform account (customer, worker or admin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformUser {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl PlatformUser {
    /// Admin accounts are never offered activate/suspend actions.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// The signed-in admin, kept in the session next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&PlatformUser> for AdminIdentity {
    fn from(user: &PlatformUser) -> Self {
        Self {
            id: user.user_id.clone(),
            name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// An identity document awaiting or past review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDocument {
    pub id: KycDocumentId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub email: String,
    pub document_type: String,
    pub document_url: String,
    pub status: KycStatus,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
    #[serde(default)]
    pub reviewed_at: Option<Timestamp>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

impl KycDocument {
    /// Only pending documents can be approved or rejected.
    #[must_use]
    pub fn is_reviewable(&self) -> bool {
        self.status == KycStatus::Pending
    }
}

/// A user-submitted dispute against a rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingFlag {
    pub id: FlagId,
    #[serde(default)]
    pub rating_id: Option<RatingId>,
    #[serde(default)]
    pub flagged_by_id: Option<UserId>,
    #[serde(default)]
    pub flagged_by_name: String,
    #[serde(default)]
    pub target_user_id: Option<UserId>,
    #[serde(default)]
    pub target_user_name: String,
    pub reason: String,
    #[serde(default)]
    pub rating_score: Option<f64>,
    #[serde(default)]
    pub rating_comment: Option<String>,
    pub status: FlagStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl RatingFlag {
    /// Only pending flags can be dismissed or actioned.
    #[must_use]
    pub fn is_reviewable(&self) -> bool {
        self.status == FlagStatus::Pending
    }
}
