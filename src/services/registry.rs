use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::ClusterRecord;
use crate::services::permission::LookupError;

/// Read-only lookup of managed cluster connection profiles. Callers fetch
/// a fresh snapshot per request; nothing here is cached, so credential or
/// endpoint edits take effect on the very next request.
#[async_trait]
pub trait ClusterRegistry: Send + Sync {
    async fn first_by_id(&self, cluster_id: i32) -> Result<ClusterRecord, LookupError>;
    async fn list(&self) -> Result<Vec<ClusterRecord>, LookupError>;
}

/// Registry over the `etcd_servers` table
pub struct PgClusterRegistry {
    pool: PgPool,
}

impl PgClusterRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClusterRegistry for PgClusterRegistry {
    async fn first_by_id(&self, cluster_id: i32) -> Result<ClusterRecord, LookupError> {
        let record = sqlx::query_as::<_, ClusterRecord>(
            r#"
            SELECT id, name, version, address, tls_enable,
                   cert_file, key_file, ca_file, username, password
            FROM etcd_servers
            WHERE id = $1
            "#,
        )
        .bind(cluster_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LookupError::Storage(e.to_string()))?;

        record.ok_or(LookupError::NotFound)
    }

    async fn list(&self) -> Result<Vec<ClusterRecord>, LookupError> {
        let records = sqlx::query_as::<_, ClusterRecord>(
            r#"
            SELECT id, name, version, address, tls_enable,
                   cert_file, key_file, ca_file, username, password
            FROM etcd_servers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LookupError::Storage(e.to_string()))?;

        Ok(records)
    }
}
