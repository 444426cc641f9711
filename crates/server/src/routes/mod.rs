//! Route handlers for the JSON API.

pub mod auth;
pub mod loans;
pub mod statistics;

use axum::Router;

use crate::error::Result;
use crate::models::Principal;
use crate::services::ServiceError;
use crate::state::AppState;

/// All API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(loans::routes())
        .merge(statistics::routes())
}

/// Reject principals without the ADMIN role.
fn require_admin(principal: &Principal) -> Result<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("requires the ADMIN role".to_owned()).into())
    }
}
