//! Authentication extractor.
//!
//! Resolves the `Authorization: Bearer <token>` header to a [`Principal`]
//! once per request; handlers receive the identity as an explicit argument.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::models::Principal;
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that requires an authenticated principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequirePrincipal(principal): RequirePrincipal,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", principal.username)
/// }
/// ```
pub struct RequirePrincipal(pub Principal);

/// Rejection returned when no valid bearer token accompanies the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header was sent.
    MissingToken,
    /// The token is unknown, expired, or its account is gone.
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "missing bearer token",
            Self::InvalidToken => "invalid or expired token",
        };
        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}

impl FromRequestParts<AppState> for RequirePrincipal {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthRejection::MissingToken)?;

        let auth = AuthService::new(state.users(), state.cache());
        let principal = auth
            .authenticate(token)
            .await
            .ok_or(AuthRejection::InvalidToken)?;

        Ok(Self(principal))
    }
}
