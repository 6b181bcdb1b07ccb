//! Core types for Helper Admin.
//!
//! This module provides type-safe wrappers for the backend's domain concepts.

pub mod envelope;
pub mod id;
pub mod money;
pub mod records;
pub mod review;
pub mod stats;
pub mod status;
pub mod timestamp;

pub use envelope::{ApiResponse, Page};
pub use id::*;
pub use money::Rupees;
pub use records::{AdminIdentity, KycDocument, LoginRequest, LoginResponse, PlatformUser, RatingFlag};
pub use review::{FlagReviewRequest, KycReviewRequest};
pub use stats::{KycStats, NotificationStats, PaymentStats, RatingStats, TaskStats, UserStats};
pub use status::*;
pub use timestamp::Timestamp;
