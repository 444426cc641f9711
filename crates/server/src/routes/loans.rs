//! Loan route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use loanbook_core::LoanId;

use crate::error::Result;
use crate::middleware::RequirePrincipal;
use crate::models::LoanView;
use crate::services::LoanService;
use crate::state::AppState;

use super::require_admin;

/// Loan request body.
#[derive(Debug, Deserialize)]
pub struct LoanRequest {
    pub amount: Decimal,
    pub term: u32,
    #[serde(default)]
    pub purpose: String,
}

/// Review request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanReview {
    /// `APPROVED` or `REJECTED`, case-insensitive.
    pub action: String,
    pub rejection_reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/loans", get(list_loans).post(create_loan))
        .route("/api/loans/request", post(create_loan))
        .route("/api/loans/my-loans", get(my_loans))
        .route("/api/loans/admin/pending", get(admin_pending))
        .route("/api/loans/admin/all", get(admin_all))
        .route("/api/loans/admin/review/{id}", put(review_loan))
        .route("/api/loans/{id}", get(loan_by_id))
}

/// Administrators see every loan; everyone else sees their own.
async fn list_loans(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<Vec<LoanView>>> {
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    let loans = if principal.is_admin() {
        service.get_all_loans().await
    } else {
        service.get_user_loans(&principal.username).await?
    };
    Ok(Json(loans))
}

/// Request a new loan for the calling principal.
async fn create_loan(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Json(request): Json<LoanRequest>,
) -> Result<Json<LoanView>> {
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    let loan = service
        .request_loan(&principal, request.amount, request.term, request.purpose)
        .await?;
    Ok(Json(loan))
}

/// The calling principal's own loans.
async fn my_loans(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<Vec<LoanView>>> {
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    Ok(Json(service.get_user_loans(&principal.username).await?))
}

/// A single loan, visible to its owner and administrators.
async fn loan_by_id(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<i64>,
) -> Result<Json<LoanView>> {
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    Ok(Json(
        service.get_loan_by_id(&principal, LoanId::new(id)).await?,
    ))
}

/// Loans awaiting review. Admin only.
async fn admin_pending(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<Vec<LoanView>>> {
    require_admin(&principal)?;
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    Ok(Json(service.get_pending_loans().await))
}

/// Every loan in the ledger. Admin only.
async fn admin_all(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<Vec<LoanView>>> {
    require_admin(&principal)?;
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    Ok(Json(service.get_all_loans().await))
}

/// Approve or reject a pending loan. Admin only; the engine re-checks.
async fn review_loan(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
    Path(id): Path<i64>,
    Json(review): Json<LoanReview>,
) -> Result<Json<LoanView>> {
    require_admin(&principal)?;
    let service = LoanService::new(state.loans(), state.users(), state.cache());
    let loan = service
        .review_loan(
            &principal,
            LoanId::new(id),
            &review.action,
            review.rejection_reason,
        )
        .await?;
    Ok(Json(loan))
}
