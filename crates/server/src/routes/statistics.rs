//! Statistics route handlers.

use axum::{Json, Router, extract::State, routing::get};

use crate::error::Result;
use crate::middleware::RequirePrincipal;
use crate::models::{GlobalStatistics, UserStatistics};
use crate::services::StatisticsService;
use crate::state::AppState;

use super::require_admin;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/statistics/global", get(global))
        .route("/api/statistics/user", get(user))
}

/// Ledger-wide statistics. Admin only.
async fn global(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<GlobalStatistics>> {
    require_admin(&principal)?;
    let service = StatisticsService::new(state.loans(), state.cache());
    Ok(Json(service.global().await))
}

/// Statistics for the calling principal.
async fn user(
    State(state): State<AppState>,
    RequirePrincipal(principal): RequirePrincipal,
) -> Result<Json<UserStatistics>> {
    let service = StatisticsService::new(state.loans(), state.cache());
    Ok(Json(service.for_user(&principal.username).await))
}
