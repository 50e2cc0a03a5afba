use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::database::models::UserRecord;
use crate::services::permission::LookupError;

/// Read-only user lookup backing the login flow
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn first_by_name(&self, name: &str) -> Result<UserRecord, LookupError>;
}

/// Hex sha-256 digest used for stored passwords
pub fn password_digest(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Directory over the `users` table
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn first_by_name(&self, name: &str) -> Result<UserRecord, LookupError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, password, role_id, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LookupError::Storage(e.to_string()))?;

        user.ok_or(LookupError::NotFound)
    }
}
