//! Cache types for backend reads.
//!
//! Entries are keyed by session scope and query so one admin's reads are
//! never served to another session. Invalidation works per resource family
//! and spans every scope.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use helper_admin_core::{
    FlagStatus, KycDocument, KycStats, KycStatus, NotificationStats, Page, PaymentStats,
    PlatformUser, RatingFlag, RatingStats, TaskStats, UserStats,
};
use moka::future::Cache;
use tracing::debug;

use super::users::UserFilter;
use crate::helper::{HelperError, SessionScope};

/// How long a read stays fresh.
pub const FRESHNESS: Duration = Duration::from_secs(30);

const MAX_ENTRIES: u64 = 1_000;

/// Groups of queries invalidated together after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFamily {
    Stats,
    Users,
    Kyc,
    Flags,
}

impl QueryFamily {
    const COUNT: usize = 4;

    const fn index(self) -> usize {
        match self {
            Self::Stats => 0,
            Self::Users => 1,
            Self::Kyc => 2,
            Self::Flags => 3,
        }
    }
}

/// A backend read, identified the way its result is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    UserStats,
    TaskStats,
    PaymentStats,
    RatingStats,
    KycStats,
    NotificationStats,
    Users(UserFilter),
    KycQueue(KycStatus),
    Flags(FlagStatus),
}

impl QueryKey {
    /// The family whose mutations make this read stale.
    #[must_use]
    pub const fn family(&self) -> QueryFamily {
        match self {
            Self::UserStats
            | Self::TaskStats
            | Self::PaymentStats
            | Self::RatingStats
            | Self::KycStats
            | Self::NotificationStats => QueryFamily::Stats,
            Self::Users(_) => QueryFamily::Users,
            Self::KycQueue(_) => QueryFamily::Kyc,
            Self::Flags(_) => QueryFamily::Flags,
        }
    }
}

/// Cache key: whose read, and which read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub scope: SessionScope,
    pub query: QueryKey,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    UserStats(UserStats),
    TaskStats(TaskStats),
    PaymentStats(PaymentStats),
    RatingStats(RatingStats),
    KycStats(KycStats),
    NotificationStats(NotificationStats),
    Users(Page<PlatformUser>),
    KycQueue(Vec<KycDocument>),
    Flags(Vec<RatingFlag>),
}

/// A type that can be stored in [`QueryCache`].
pub trait Cacheable: Clone + Send + Sync + 'static {
    fn into_value(self) -> CacheValue;
    fn from_value(value: CacheValue) -> Option<Self>;
}

macro_rules! cacheable {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn into_value(self) -> CacheValue {
                    CacheValue::$variant(self)
                }

                fn from_value(value: CacheValue) -> Option<Self> {
                    match value {
                        CacheValue::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

cacheable! {
    UserStats => UserStats,
    TaskStats => TaskStats,
    PaymentStats => PaymentStats,
    RatingStats => RatingStats,
    KycStats => KycStats,
    NotificationStats => NotificationStats,
    Page<PlatformUser> => Users,
    Vec<KycDocument> => KycQueue,
    Vec<RatingFlag> => Flags,
}

/// Shared read cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

struct QueryCacheInner {
    entries: Cache<CacheKey, CacheValue>,
    /// Bumped on every family invalidation.
    generations: [AtomicU64; QueryFamily::COUNT],
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(FRESHNESS)
    }
}

impl QueryCache {
    /// Create a cache whose entries expire `ttl` after being written.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(MAX_ENTRIES)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self {
            inner: Arc::new(QueryCacheInner {
                entries,
                generations: std::array::from_fn(|_| AtomicU64::new(0)),
            }),
        }
    }

    fn generation(&self, family: QueryFamily) -> u64 {
        self.inner
            .generations
            .get(family.index())
            .map_or(0, |g| g.load(Ordering::Acquire))
    }

    /// Return the cached value for `query`, or run `fetch` and cache its
    /// result.
    ///
    /// Failures are never cached. If the query's family is invalidated
    /// while `fetch` is in flight, the result is returned to the caller but
    /// not kept.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` returns.
    pub async fn load<T, F, Fut>(
        &self,
        scope: &SessionScope,
        query: QueryKey,
        fetch: F,
    ) -> Result<T, HelperError>
    where
        T: Cacheable,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, HelperError>>,
    {
        let key = CacheKey {
            scope: scope.clone(),
            query,
        };

        if let Some(value) = self.inner.entries.get(&key).await.and_then(T::from_value) {
            debug!(query = ?key.query, "Cache hit");
            return Ok(value);
        }

        let family = key.query.family();
        let started = self.generation(family);
        let value = fetch().await?;

        self.inner
            .entries
            .insert(key.clone(), value.clone().into_value())
            .await;
        if self.generation(family) != started {
            debug!(query = ?key.query, "Discarding read that raced an invalidation");
            self.inner.entries.invalidate(&key).await;
        }

        Ok(value)
    }

    /// Drop every cached read of `family`, for every session.
    pub fn invalidate_family(&self, family: QueryFamily) {
        if let Some(generation) = self.inner.generations.get(family.index()) {
            generation.fetch_add(1, Ordering::AcqRel);
        }
        if let Err(e) = self
            .inner
            .entries
            .invalidate_entries_if(move |key, _| key.query.family() == family)
        {
            tracing::warn!(?family, error = %e, "Failed to invalidate cache family");
        }
        debug!(?family, "Invalidated cache family");
    }

    /// Drop every cached read belonging to `scope`.
    pub fn purge_scope(&self, scope: &SessionScope) {
        let scope = scope.clone();
        if let Err(e) = self
            .inner
            .entries
            .invalidate_entries_if(move |key, _| key.scope == scope)
        {
            tracing::warn!(error = %e, "Failed to purge session cache");
        }
    }

    /// Whether a fresh entry exists for `query` in `scope`.
    #[cfg(test)]
    pub async fn contains(&self, scope: &SessionScope, query: QueryKey) -> bool {
        let key = CacheKey {
            scope: scope.clone(),
            query,
        };
        self.inner.entries.get(&key).await.is_some()
    }
}
