//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::helper::{HelperClient, HelperError};
use crate::queries::QueryCache;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    client: HelperClient,
    cache: QueryCache,
}

impl AppState {
    /// Build state for `config`, with an empty query cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be created.
    pub fn new(config: AdminConfig) -> Result<Self, HelperError> {
        let client = HelperClient::new(&config.api)?;
        Ok(Self::with_parts(config, client, QueryCache::default()))
    }

    /// Build state from pre-made parts.
    #[must_use]
    pub fn with_parts(config: AdminConfig, client: HelperClient, cache: QueryCache) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                cache,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &HelperClient {
        &self.inner.client
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }
}
