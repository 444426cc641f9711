//! Namespaced cache layer for read-side projections.
//!
//! Four namespaces, each a `moka` cache with its own time-to-live:
//!
//! | namespace    | keys                                   | default TTL |
//! |--------------|----------------------------------------|-------------|
//! | `loans`      | `user:<name>`, `all`, `pending`, `id:<id>` | 5 minutes |
//! | `users`      | `<username>`                           | 30 minutes  |
//! | `statistics` | `global`, `user:<name>`                | 2 minutes   |
//! | `sessions`   | `<token>` -> username                  | 1 hour      |
//!
//! The TTL is a staleness ceiling, not the coherency mechanism: every
//! mutation of the loan ledger evicts the `loans` and `statistics`
//! namespaces in full before the mutating call returns, so readers never
//! see a pre-mutation projection after the mutation was acknowledged.
//! Eviction is deliberately namespace-wide; the query surface (by-user,
//! by-status, by-id, aggregates) makes per-key dependency tracking
//! error-prone, and loan mutations are rare next to reads.

use std::time::Duration;

use moka::future::Cache;

use loanbook_core::LoanId;

use crate::models::{GlobalStatistics, LoanView, UserStatistics, UserView};

const LOANS_CACHE_CAPACITY: u64 = 10_000;
const USERS_CACHE_CAPACITY: u64 = 10_000;
const STATISTICS_CACHE_CAPACITY: u64 = 1_000;
const SESSIONS_CACHE_CAPACITY: u64 = 100_000;

/// Per-namespace time-to-live configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub loans: Duration,
    pub users: Duration,
    pub statistics: Duration,
    pub sessions: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            loans: Duration::from_secs(5 * 60),
            users: Duration::from_secs(30 * 60),
            statistics: Duration::from_secs(2 * 60),
            sessions: Duration::from_secs(60 * 60),
        }
    }
}

/// Cached value types for the projection namespaces.
#[derive(Debug, Clone)]
enum CacheValue {
    Loan(Box<LoanView>),
    LoanList(Vec<LoanView>),
    User(Box<UserView>),
    GlobalStatistics(GlobalStatistics),
    UserStatistics(UserStatistics),
}

/// The cache layer shared by all services.
///
/// Entries are lazily populated: a missing key is not an error, it tells the
/// caller to recompute and store.
#[derive(Clone)]
pub struct CacheLayer {
    loans: Cache<String, CacheValue>,
    users: Cache<String, CacheValue>,
    statistics: Cache<String, CacheValue>,
    sessions: Cache<String, String>,
}

impl CacheLayer {
    #[must_use]
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            loans: Cache::builder()
                .max_capacity(LOANS_CACHE_CAPACITY)
                .time_to_live(ttls.loans)
                .build(),
            users: Cache::builder()
                .max_capacity(USERS_CACHE_CAPACITY)
                .time_to_live(ttls.users)
                .build(),
            statistics: Cache::builder()
                .max_capacity(STATISTICS_CACHE_CAPACITY)
                .time_to_live(ttls.statistics)
                .build(),
            sessions: Cache::builder()
                .max_capacity(SESSIONS_CACHE_CAPACITY)
                .time_to_live(ttls.sessions)
                .build(),
        }
    }

    // =========================================================================
    // loans namespace
    // =========================================================================

    /// Key for a per-user loan list.
    #[must_use]
    pub fn user_loans_key(username: &str) -> String {
        format!("user:{username}")
    }

    pub async fn get_loan_list(&self, key: &str) -> Option<Vec<LoanView>> {
        match self.loans.get(key).await {
            Some(CacheValue::LoanList(views)) => Some(views),
            _ => None,
        }
    }

    pub async fn put_loan_list(&self, key: String, views: Vec<LoanView>) {
        self.loans.insert(key, CacheValue::LoanList(views)).await;
    }

    pub async fn get_loan(&self, id: LoanId) -> Option<LoanView> {
        match self.loans.get(&format!("id:{id}")).await {
            Some(CacheValue::Loan(view)) => Some(*view),
            _ => None,
        }
    }

    pub async fn put_loan(&self, id: LoanId, view: LoanView) {
        self.loans
            .insert(format!("id:{id}"), CacheValue::Loan(Box::new(view)))
            .await;
    }

    // =========================================================================
    // users namespace
    // =========================================================================

    pub async fn get_user(&self, username: &str) -> Option<UserView> {
        match self.users.get(username).await {
            Some(CacheValue::User(view)) => Some(*view),
            _ => None,
        }
    }

    pub async fn put_user(&self, view: UserView) {
        self.users
            .insert(view.username.clone(), CacheValue::User(Box::new(view)))
            .await;
    }

    // =========================================================================
    // statistics namespace
    // =========================================================================

    pub async fn get_global_statistics(&self) -> Option<GlobalStatistics> {
        match self.statistics.get("global").await {
            Some(CacheValue::GlobalStatistics(stats)) => Some(stats),
            _ => None,
        }
    }

    pub async fn put_global_statistics(&self, stats: GlobalStatistics) {
        self.statistics
            .insert("global".to_owned(), CacheValue::GlobalStatistics(stats))
            .await;
    }

    pub async fn get_user_statistics(&self, username: &str) -> Option<UserStatistics> {
        match self.statistics.get(&format!("user:{username}")).await {
            Some(CacheValue::UserStatistics(stats)) => Some(stats),
            _ => None,
        }
    }

    pub async fn put_user_statistics(&self, username: &str, stats: UserStatistics) {
        self.statistics
            .insert(
                format!("user:{username}"),
                CacheValue::UserStatistics(stats),
            )
            .await;
    }

    // =========================================================================
    // sessions namespace
    // =========================================================================

    /// Bind an issued token to its username.
    pub async fn bind_session(&self, token: String, username: String) {
        self.sessions.insert(token, username).await;
    }

    /// Resolve a bearer token to its username, if the binding is still live.
    pub async fn session_username(&self, token: &str) -> Option<String> {
        self.sessions.get(token).await
    }

    // =========================================================================
    // Eviction
    // =========================================================================

    /// Evict every entry whose value could depend on the loan ledger.
    ///
    /// Called synchronously by each mutating operation after its store write
    /// succeeds and before it returns. Request and review share this scope;
    /// both change aggregate counts and per-status/per-user lists.
    pub fn evict_loan_data(&self) {
        self.loans.invalidate_all();
        self.statistics.invalidate_all();
        tracing::debug!("evicted loans and statistics cache namespaces");
    }

    /// Evict every cached user projection.
    pub fn evict_users(&self) {
        self.users.invalidate_all();
        tracing::debug!("evicted users cache namespace");
    }
}

impl Default for CacheLayer {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}
