//! Session repository for bearer-token storage.
//!
//! Tokens are opaque random values generated by the auth service; this
//! repository only stores and resolves them. Expiry is enforced in the
//! queries so an expired token behaves exactly like an unknown one.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pomelo_core::{SessionId, UserId, Username};

use super::RepositoryError;
use crate::models::session::{CurrentUser, Session};

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: i32,
    user_id: i32,
    access_token: String,
    refresh_token: String,
    access_expires_at: DateTime<Utc>,
    refresh_expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(r: SessionRow) -> Self {
        Self {
            id: SessionId::new(r.id),
            user_id: UserId::new(r.user_id),
            access_token: r.access_token,
            refresh_token: r.refresh_token,
            access_expires_at: r.access_expires_at,
            refresh_expires_at: r.refresh_expires_at,
            created_at: r.created_at,
        }
    }
}

/// Repository for session database operations.
pub struct SessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a freshly issued token pair.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        access_token: &str,
        refresh_token: &str,
        access_expires_at: DateTime<Utc>,
        refresh_expires_at: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            INSERT INTO shop.sessions
                (user_id, access_token, refresh_token, access_expires_at, refresh_expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, access_token, refresh_token,
                      access_expires_at, refresh_expires_at, created_at
            ",
        )
        .bind(user_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(access_expires_at)
        .bind(refresh_expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Resolve a live access token to the caller's identity.
    ///
    /// Returns `None` for unknown and expired tokens alike.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored username is invalid.
    pub async fn resolve_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<CurrentUser>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct IdentityRow {
            id: i32,
            username: String,
        }

        let row = sqlx::query_as::<_, IdentityRow>(
            r"
            SELECT u.id, u.username
            FROM shop.sessions s
            JOIN shop.users u ON u.id = s.user_id
            WHERE s.access_token = $1
              AND s.access_expires_at > now()
            ",
        )
        .bind(access_token)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let username = Username::parse(&r.username).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
                })?;

                Ok(Some(CurrentUser {
                    id: UserId::new(r.id),
                    username,
                }))
            }
            None => Ok(None),
        }
    }

    /// Look up a session by a live refresh token.
    ///
    /// Returns `None` for unknown and expired tokens alike.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            SELECT id, user_id, access_token, refresh_token,
                   access_expires_at, refresh_expires_at, created_at
            FROM shop.sessions
            WHERE refresh_token = $1
              AND refresh_expires_at > now()
            ",
        )
        .bind(refresh_token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Replace a session's token pair (refresh rotation).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the session doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn rotate(
        &self,
        session_id: SessionId,
        access_token: &str,
        refresh_token: &str,
        access_expires_at: DateTime<Utc>,
        refresh_expires_at: DateTime<Utc>,
    ) -> Result<Session, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            UPDATE shop.sessions
            SET access_token = $2,
                refresh_token = $3,
                access_expires_at = $4,
                refresh_expires_at = $5
            WHERE id = $1
            RETURNING id, user_id, access_token, refresh_token,
                      access_expires_at, refresh_expires_at, created_at
            ",
        )
        .bind(session_id)
        .bind(access_token)
        .bind(refresh_token)
        .bind(access_expires_at)
        .bind(refresh_expires_at)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
