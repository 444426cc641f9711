//! Business services: loan lifecycle, statistics, authentication.

pub mod auth;
pub mod loans;
pub mod statistics;

pub use auth::AuthService;
pub use loans::LoanService;
pub use statistics::StatisticsService;

use thiserror::Error;

/// Failures surfaced by the service layer.
///
/// Every failure is distinguishable to the caller; none are retried here.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced loan or user does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A role or ownership check failed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The operation is not valid for the record's current status.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The input fails validation before any record is touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Registration collided with an existing username or email.
    #[error("duplicate identity: {0}")]
    DuplicateIdentity(String),

    /// Login failed; deliberately unspecific.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Infrastructure fault (e.g. password hashing).
    #[error("internal error: {0}")]
    Internal(String),
}
