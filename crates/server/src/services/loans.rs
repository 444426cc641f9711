//! Loan lifecycle engine.
//!
//! Enforces the creation and review rules, writes the loan store, and keeps
//! the cache layer coherent: every mutation evicts the `loans` and
//! `statistics` namespaces in full after the store write succeeds and before
//! the call returns. Read queries are cache-aside projections computed once
//! per invalidation window.
//!
//! Every operation takes the resolved principal (or username) explicitly;
//! there is no ambient security context.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use loanbook_core::{LoanId, LoanStatus};

use crate::cache::CacheLayer;
use crate::models::{LoanView, NewLoan, Principal};
use crate::store::{LoanStore, UserStore};

use super::ServiceError;

/// Smallest amount a loan may be requested for.
pub const MIN_LOAN_AMOUNT: Decimal = Decimal::ONE_HUNDRED;

/// Shortest permitted repayment term, in months.
pub const MIN_LOAN_TERM_MONTHS: u32 = 1;

/// Outcome requested by a reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    /// Parse a review action, case-insensitively.
    fn parse(action: &str) -> Option<Self> {
        if action.eq_ignore_ascii_case("APPROVED") {
            Some(Self::Approve)
        } else if action.eq_ignore_ascii_case("REJECTED") {
            Some(Self::Reject)
        } else {
            None
        }
    }
}

/// The loan lifecycle engine.
pub struct LoanService<'a> {
    loans: &'a LoanStore,
    users: &'a UserStore,
    cache: &'a CacheLayer,
}

impl<'a> LoanService<'a> {
    #[must_use]
    pub const fn new(loans: &'a LoanStore, users: &'a UserStore, cache: &'a CacheLayer) -> Self {
        Self {
            loans,
            users,
            cache,
        }
    }

    /// Create a new `PENDING` loan for the requesting principal.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the amount or term is below the minimum
    /// (nothing is persisted), `NotFound` when the requester is unknown, and
    /// `Forbidden` when the account is disabled or holds the ADMIN role.
    pub async fn request_loan(
        &self,
        principal: &Principal,
        amount: Decimal,
        term_months: u32,
        purpose: String,
    ) -> Result<LoanView, ServiceError> {
        if amount < MIN_LOAN_AMOUNT {
            return Err(ServiceError::InvalidInput(format!(
                "loan amount must be at least {MIN_LOAN_AMOUNT}"
            )));
        }
        if term_months < MIN_LOAN_TERM_MONTHS {
            return Err(ServiceError::InvalidInput(format!(
                "loan term must be at least {MIN_LOAN_TERM_MONTHS} month"
            )));
        }

        let user = self
            .users
            .find_by_username(&principal.username)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("user {}", principal.username)))?;

        if !user.enabled {
            return Err(ServiceError::Forbidden(
                "account is disabled".to_owned(),
            ));
        }
        if user.is_admin() {
            warn!(username = %user.username, "administrator attempted to request a loan");
            return Err(ServiceError::Forbidden(
                "administrators cannot request loans".to_owned(),
            ));
        }

        let now = Utc::now();
        let loan = self
            .loans
            .insert(NewLoan::pending(
                amount,
                term_months,
                purpose,
                user.id,
                user.username.clone(),
                now,
            ))
            .await;

        info!(
            loan_id = %loan.id,
            username = %user.username,
            amount = %amount,
            "loan requested"
        );

        self.cache.evict_loan_data();
        Ok(LoanView::from(&loan))
    }

    /// All loans owned by `username`, cached per user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the user is unknown.
    pub async fn get_user_loans(&self, username: &str) -> Result<Vec<LoanView>, ServiceError> {
        self.users
            .find_by_username(username)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("user {username}")))?;

        let key = CacheLayer::user_loans_key(username);
        if let Some(views) = self.cache.get_loan_list(&key).await {
            debug!(username, "cache hit for user loans");
            return Ok(views);
        }

        let views: Vec<LoanView> = self
            .loans
            .find_by_owner(username)
            .await
            .iter()
            .map(LoanView::from)
            .collect();
        self.cache.put_loan_list(key, views.clone()).await;
        Ok(views)
    }

    /// Every loan in the ledger, cached under one key.
    pub async fn get_all_loans(&self) -> Vec<LoanView> {
        if let Some(views) = self.cache.get_loan_list("all").await {
            debug!("cache hit for all loans");
            return views;
        }

        let views: Vec<LoanView> = self
            .loans
            .find_all()
            .await
            .iter()
            .map(LoanView::from)
            .collect();
        self.cache.put_loan_list("all".to_owned(), views.clone()).await;
        views
    }

    /// Loans awaiting review, cached under one key.
    pub async fn get_pending_loans(&self) -> Vec<LoanView> {
        if let Some(views) = self.cache.get_loan_list("pending").await {
            debug!("cache hit for pending loans");
            return views;
        }

        let views: Vec<LoanView> = self
            .loans
            .find_by_status(LoanStatus::Pending)
            .await
            .iter()
            .map(LoanView::from)
            .collect();
        self.cache
            .put_loan_list("pending".to_owned(), views.clone())
            .await;
        views
    }

    /// A single loan, visible to its owner and to administrators.
    ///
    /// The per-id view is cached, but the visibility check runs on every
    /// call against the explicit principal: a cache hit never widens who can
    /// see the record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id and `Forbidden` when the caller
    /// is neither the owner nor an administrator.
    pub async fn get_loan_by_id(
        &self,
        principal: &Principal,
        id: LoanId,
    ) -> Result<LoanView, ServiceError> {
        let view = match self.cache.get_loan(id).await {
            Some(view) => {
                debug!(loan_id = %id, "cache hit for loan");
                view
            }
            None => {
                let loan = self
                    .loans
                    .find_by_id(id)
                    .await
                    .ok_or_else(|| ServiceError::NotFound(format!("loan {id}")))?;
                let view = LoanView::from(&loan);
                self.cache.put_loan(id, view.clone()).await;
                view
            }
        };

        if view.username != principal.username && !principal.is_admin() {
            return Err(ServiceError::Forbidden(format!(
                "loan {id} is not visible to {}",
                principal.username
            )));
        }

        Ok(view)
    }

    /// Transition a `PENDING` loan to `APPROVED` or `REJECTED`.
    ///
    /// The engine re-verifies the reviewer's ADMIN role itself rather than
    /// trusting the transport-layer gate. The status precondition and the
    /// write are applied atomically by the store, so of two concurrent
    /// reviews of the same id exactly one can win.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for non-administrators, `NotFound` for unknown
    /// reviewer or loan, `InvalidInput` for an unrecognized action, and
    /// `InvalidState` when the loan has already been reviewed.
    pub async fn review_loan(
        &self,
        principal: &Principal,
        id: LoanId,
        action: &str,
        rejection_reason: Option<String>,
    ) -> Result<LoanView, ServiceError> {
        let reviewer = self
            .users
            .find_by_username(&principal.username)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("user {}", principal.username)))?;

        if !reviewer.is_admin() {
            warn!(username = %reviewer.username, loan_id = %id, "loan review refused");
            return Err(ServiceError::Forbidden(
                "loan review requires the ADMIN role".to_owned(),
            ));
        }

        let Some(decision) = ReviewDecision::parse(action) else {
            return Err(ServiceError::InvalidInput(
                "review action must be APPROVED or REJECTED".to_owned(),
            ));
        };

        let now = Utc::now();
        let outcome = self
            .loans
            .update(id, |loan| {
                if loan.status != LoanStatus::Pending {
                    return Err(ServiceError::InvalidState(format!(
                        "loan {id} has already been reviewed"
                    )));
                }

                match decision {
                    ReviewDecision::Approve => {
                        loan.status = LoanStatus::Approved;
                        loan.rejection_reason = None;
                    }
                    ReviewDecision::Reject => {
                        loan.status = LoanStatus::Rejected;
                        loan.rejection_reason = rejection_reason;
                    }
                }
                loan.reviewed_at = Some(now);
                loan.reviewed_by = Some(reviewer.username.clone());
                loan.updated_at = now;
                Ok(())
            })
            .await;

        let loan = match outcome {
            None => return Err(ServiceError::NotFound(format!("loan {id}"))),
            Some(Err(e)) => return Err(e),
            Some(Ok(loan)) => loan,
        };

        match loan.status {
            LoanStatus::Approved => {
                info!(loan_id = %id, reviewer = %reviewer.username, "loan approved");
            }
            _ => {
                info!(
                    loan_id = %id,
                    reviewer = %reviewer.username,
                    reason = loan.rejection_reason.as_deref().unwrap_or("none"),
                    "loan rejected"
                );
            }
        }

        self.cache.evict_loan_data();
        Ok(LoanView::from(&loan))
    }
}
