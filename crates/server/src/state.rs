//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::CacheLayer;
use crate::config::ServerConfig;
use crate::store::{LoanStore, UserStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the record stores, the cache layer,
/// and the configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    loans: LoanStore,
    users: UserStore,
    cache: CacheLayer,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        let cache = CacheLayer::new(config.cache);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                loans: LoanStore::new(),
                users: UserStore::new(),
                cache,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the loan store.
    #[must_use]
    pub fn loans(&self) -> &LoanStore {
        &self.inner.loans
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    /// Get a reference to the cache layer.
    #[must_use]
    pub fn cache(&self) -> &CacheLayer {
        &self.inner.cache
    }
}
