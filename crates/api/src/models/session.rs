//! Session domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pomelo_core::{SessionId, UserId, Username};

/// A bearer-token session.
///
/// Both tokens are opaque 256-bit random values; the access token is the
/// short-lived bearer credential, the refresh token rotates the pair.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session ID.
    pub id: SessionId,
    /// User this session belongs to.
    pub user_id: UserId,
    /// Opaque bearer credential.
    pub access_token: String,
    /// Opaque rotation credential.
    pub refresh_token: String,
    /// When the access token stops being accepted.
    pub access_expires_at: DateTime<Utc>,
    /// When the refresh token stops being accepted.
    pub refresh_expires_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// Identity of an authenticated caller, resolved from a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login name.
    pub username: Username,
}
