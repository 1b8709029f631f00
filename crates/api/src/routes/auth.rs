//! Authentication route handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::session::Session;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Build the identity router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/refresh", post(refresh))
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login request body.
///
/// The password is optional; when present it is verified.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
}

/// Refresh request body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// User payload plus the freshly issued token pair.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Token pair returned by a refresh.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthResponse {
    fn new(user: User, session: Session) -> Self {
        Self {
            user,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
        }
    }
}

fn auth_service(state: &AppState) -> AuthService<'_> {
    AuthService::new(
        state.pool(),
        state.config().access_token_ttl_secs,
        state.config().refresh_token_ttl_secs,
    )
}

/// Create a new account (and its cart) and establish a session.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let (user, session) = auth_service(&state)
        .register(&body.username, &body.password)
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, session))))
}

/// Establish a session for an existing user.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let (user, session) = auth_service(&state)
        .login(&body.username, body.password.as_deref())
        .await?;

    Ok(Json(AuthResponse::new(user, session)))
}

/// Rotate a token pair from a refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>> {
    let session = auth_service(&state).refresh(&body.refresh_token).await?;

    Ok(Json(TokenResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
    }))
}
