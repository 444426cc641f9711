//! Authentication route handlers.

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use loanbook_core::Role;

use crate::error::Result;
use crate::services::{AuthService, auth::AuthResponse};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Optional role tags; defaults to `USER` when absent or empty.
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Register a new account.
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.users(), state.cache());
    let response = auth
        .register(
            &request.username,
            &request.email,
            &request.password,
            &request.full_name,
            &request.roles,
        )
        .await?;
    Ok(Json(response))
}

/// Login with email and password.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.users(), state.cache());
    let response = auth.login(&request.email, &request.password).await?;
    Ok(Json(response))
}
