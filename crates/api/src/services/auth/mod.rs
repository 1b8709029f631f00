//! Authentication service.
//!
//! Registration, login, and refresh-token rotation over the user and
//! session repositories.
//!
//! Login is username-first: a missing user is `UserNotFound` and a supplied
//! password is verified against the stored argon2 hash, but a request that
//! omits the password is still accepted. That lookup-only flow reproduces
//! the contract this service replaces; see DESIGN.md for the flagged
//! open question around it.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use pomelo_core::{UserId, Username};

use crate::db::RepositoryError;
use crate::db::sessions::SessionRepository;
use crate::db::users::UserRepository;
use crate::models::session::Session;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Random bytes per token (encodes to 43 base64 characters).
const TOKEN_BYTES: usize = 32;

/// Authentication service.
///
/// Handles user registration, login, and bearer-token session management.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    sessions: SessionRepository<'a>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            users: UserRepository::new(pool),
            sessions: SessionRepository::new(pool),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Register a new user with username and password.
    ///
    /// Creates the user, their password hash, and their cart in one
    /// transaction, then establishes a session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(User, Session), AuthError> {
        let username = Username::parse(username)?;

        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create_with_password(&username, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        let session = self.issue_session(user.id).await?;

        Ok((user, session))
    }

    /// Login by username, optionally verifying a password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no such user exists; no session
    /// is established in that case.
    /// Returns `AuthError::InvalidCredentials` if a password was supplied
    /// and doesn't match.
    pub async fn login(
        &self,
        username: &str,
        password: Option<&str>,
    ) -> Result<(User, Session), AuthError> {
        let username = Username::parse(username)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(password) = password {
            let hash = password_hash.ok_or(AuthError::InvalidCredentials)?;
            verify_password(password, &hash)?;
        }

        let session = self.issue_session(user.id).await?;

        Ok((user, session))
    }

    /// Rotate a session's token pair from a live refresh token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for unknown or expired tokens.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .get_by_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let now = Utc::now();
        let session = self
            .sessions
            .rotate(
                session.id,
                &generate_token(),
                &generate_token(),
                now + Duration::seconds(self.access_ttl_secs),
                now + Duration::seconds(self.refresh_ttl_secs),
            )
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::InvalidToken,
                other => AuthError::Repository(other),
            })?;

        Ok(session)
    }

    /// Issue and store a fresh token pair for a user.
    async fn issue_session(&self, user_id: UserId) -> Result<Session, AuthError> {
        let now = Utc::now();
        let session = self
            .sessions
            .create(
                user_id,
                &generate_token(),
                &generate_token(),
                now + Duration::seconds(self.access_ttl_secs),
                now + Duration::seconds(self.refresh_ttl_secs),
            )
            .await?;

        Ok(session)
    }
}

/// Generate an opaque URL-safe token from 256 random bits.
fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::PasswordHash)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored argon2 hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_rejects_short() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough password").is_ok());
    }

    #[test]
    fn test_generate_token_shape() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 43); // 32 bytes, base64 without padding
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
