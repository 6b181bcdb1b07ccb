//! Reads and writes against the Helper backend, one module per resource.
//!
//! Reads go through [`QueryCache`] and are retried once on failure, except
//! when the backend rejects the session. Writes send a single `PUT` and, on
//! success, invalidate their resource family plus the dashboard stats.

pub mod cache;
pub mod flags;
pub mod kyc;
pub mod stats;
pub mod users;

use std::future::Future;

pub use cache::{QueryCache, QueryFamily, QueryKey};

use serde::{Serialize, de::DeserializeOwned};

use crate::helper::{Credentials, HelperError};
use crate::state::AppState;
use cache::Cacheable;

/// Attempts per read: the first try plus one retry.
pub const READ_ATTEMPTS: u32 = 2;

/// Run `fetch` up to [`READ_ATTEMPTS`] times. Session rejections are
/// returned immediately.
async fn with_retry<T, F, Fut>(mut fetch: F) -> Result<T, HelperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, HelperError>>,
{
    let mut attempt = 1;
    loop {
        match fetch().await {
            Err(e) if attempt < READ_ATTEMPTS && !e.is_unauthorized() => {
                tracing::debug!(attempt, error = %e, "Retrying backend read");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Cached, retried `GET`.
async fn read<T>(
    state: &AppState,
    creds: &Credentials,
    key: QueryKey,
    path: &str,
    query: &[(&str, String)],
) -> Result<T, HelperError>
where
    T: Cacheable + DeserializeOwned,
{
    state
        .cache()
        .load(creds.scope(), key, || {
            with_retry(|| state.client().get::<T>(creds, path, query))
        })
        .await
}

/// Single `PUT`; invalidates `family` and the stats family on success.
async fn write<B>(
    state: &AppState,
    creds: &Credentials,
    path: &str,
    body: Option<&B>,
    family: QueryFamily,
) -> Result<String, HelperError>
where
    B: Serialize + Sync + ?Sized,
{
    let message = state.client().put(creds, path, body).await?;
    state.cache().invalidate_family(family);
    state.cache().invalidate_family(QueryFamily::Stats);
    Ok(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn test_retries_once_then_gives_up() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(HelperError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), READ_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_second_attempt_can_succeed() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_retry(move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(HelperError::MissingData("/x".to_string()))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<(), _> = with_retry(move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(HelperError::Unauthorized)
        })
        .await;

        assert!(result.unwrap_err().is_unauthorized());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
