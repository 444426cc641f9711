//! Loan domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use loanbook_core::{LoanId, LoanStatus, UserId};

/// A loan application record.
///
/// Created `Pending` by a request operation and mutated exactly once by a
/// review; `requested_at` is set at creation and never changes, while
/// `updated_at` is refreshed on every write.
#[derive(Debug, Clone)]
pub struct Loan {
    pub id: LoanId,
    /// Requested amount. Positive, at least 100.
    pub amount: Decimal,
    /// Repayment term in months. At least 1.
    pub term_months: u32,
    /// Free-text purpose supplied by the requester.
    pub purpose: String,
    /// Requesting user.
    pub owner_id: UserId,
    /// Denormalized requester username; usernames never change.
    pub owner_username: String,
    pub status: LoanStatus,
    /// Present exactly when `status` is `Rejected`.
    pub rejection_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    /// Set together with `reviewed_by` on the single transition out of
    /// `Pending`.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Username of the reviewing administrator.
    pub reviewed_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a [`Loan`]; the store assigns the ID.
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub amount: Decimal,
    pub term_months: u32,
    pub purpose: String,
    pub owner_id: UserId,
    pub owner_username: String,
    pub status: LoanStatus,
    pub rejection_reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl NewLoan {
    /// A fresh `Pending` application as produced by a request operation.
    #[must_use]
    pub fn pending(
        amount: Decimal,
        term_months: u32,
        purpose: String,
        owner_id: UserId,
        owner_username: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            term_months,
            purpose,
            owner_id,
            owner_username,
            status: LoanStatus::Pending,
            rejection_reason: None,
            requested_at: now,
            reviewed_at: None,
            reviewed_by: None,
            updated_at: now,
        }
    }
}

/// Response view of a loan.
///
/// Field names match the JSON surface of the API (camelCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub id: LoanId,
    pub amount: Decimal,
    pub term: u32,
    pub purpose: String,
    pub status: LoanStatus,
    pub status_display_name: String,
    pub rejection_reason: Option<String>,
    pub request_date: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by_username: Option<String>,
    pub user_id: UserId,
    pub username: String,
}

impl From<&Loan> for LoanView {
    fn from(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            amount: loan.amount,
            term: loan.term_months,
            purpose: loan.purpose.clone(),
            status: loan.status,
            status_display_name: loan.status.display_label().to_owned(),
            rejection_reason: loan.rejection_reason.clone(),
            request_date: loan.requested_at,
            reviewed_at: loan.reviewed_at,
            reviewed_by_username: loan.reviewed_by.clone(),
            user_id: loan.owner_id,
            username: loan.owner_username.clone(),
        }
    }
}
