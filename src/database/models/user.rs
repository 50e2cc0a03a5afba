use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `users` table. `password` holds a sha-256 hex digest,
/// never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub password: String,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
}
