//! Statistics aggregator.
//!
//! Pure reads over the loan store, cached per key in the `statistics`
//! namespace. Invalidated wholesale by every loan mutation.

use tracing::debug;

use loanbook_core::LoanStatus;

use crate::cache::CacheLayer;
use crate::models::{GlobalStatistics, UserStatistics};
use crate::store::LoanStore;

pub struct StatisticsService<'a> {
    loans: &'a LoanStore,
    cache: &'a CacheLayer,
}

impl<'a> StatisticsService<'a> {
    #[must_use]
    pub const fn new(loans: &'a LoanStore, cache: &'a CacheLayer) -> Self {
        Self { loans, cache }
    }

    /// Ledger-wide counts and outcome rates, cached under `global`.
    ///
    /// An empty ledger reports both rates as 0.0; the zero-total branch is
    /// what avoids the division, not a numeric trick.
    pub async fn global(&self) -> GlobalStatistics {
        if let Some(stats) = self.cache.get_global_statistics().await {
            debug!("cache hit for global statistics");
            return stats;
        }

        let total = self.loans.count().await;
        let approved = self.loans.count_by_status(LoanStatus::Approved).await;
        let pending = self.loans.count_by_status(LoanStatus::Pending).await;
        let rejected = self.loans.count_by_status(LoanStatus::Rejected).await;

        let (approval_rate, rejection_rate) = if total > 0 {
            (percentage(approved, total), percentage(rejected, total))
        } else {
            (0.0, 0.0)
        };

        let stats = GlobalStatistics {
            total_loans: total,
            approved_loans: approved,
            pending_loans: pending,
            rejected_loans: rejected,
            approval_rate,
            rejection_rate,
        };
        self.cache.put_global_statistics(stats.clone()).await;
        stats
    }

    /// Loan counts for one user, cached under `user:<username>`.
    ///
    /// A username with no loans (or no account) reports zeros, matching the
    /// count queries it is built from.
    pub async fn for_user(&self, username: &str) -> UserStatistics {
        if let Some(stats) = self.cache.get_user_statistics(username).await {
            debug!(username, "cache hit for user statistics");
            return stats;
        }

        let stats = UserStatistics {
            total_loans: self.loans.count_by_owner(username).await,
            approved_loans: self
                .loans
                .count_by_owner_and_status(username, LoanStatus::Approved)
                .await,
            pending_loans: self
                .loans
                .count_by_owner_and_status(username, LoanStatus::Pending)
                .await,
            rejected_loans: self
                .loans
                .count_by_owner_and_status(username, LoanStatus::Rejected)
                .await,
        };
        self.cache.put_user_statistics(username, stats.clone()).await;
        stats
    }
}

#[allow(clippy::cast_precision_loss)] // loan counts never approach f64 precision
fn percentage(part: u64, total: u64) -> f64 {
    part as f64 * 100.0 / total as f64
}
