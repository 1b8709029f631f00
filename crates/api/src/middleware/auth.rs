//! Authentication middleware and extractors.
//!
//! Provides an extractor for requiring a valid bearer token in route
//! handlers. The token is resolved against the sessions table, so revoked
//! and expired tokens fail the same way as unknown ones.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::sessions::SessionRepository;
use crate::models::session::CurrentUser;
use crate::state::AppState;

/// Extractor that requires bearer-token authentication.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when authentication is required but missing or invalid.
pub enum AuthRejection {
    /// No usable `Authorization: Bearer` header, or the token is unknown/expired.
    Unauthorized,
    /// Session lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Authentication required" })),
            )
                .into_response(),
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthRejection::Unauthorized)?;

        let user = SessionRepository::new(state.pool())
            .resolve_access_token(token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session lookup failed");
                AuthRejection::Internal
            })?
            .ok_or(AuthRejection::Unauthorized)?;

        Ok(Self(user))
    }
}
