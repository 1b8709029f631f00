//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use pomelo_core::{UserId, Username};

/// A registered user (domain type).
///
/// The password hash lives in its own table and never appears on this type.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique across the system.
    pub username: Username,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
