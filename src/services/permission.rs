use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::Method;
use sqlx::PgPool;
use thiserror::Error;

use crate::database::models::GrantRecord;

/// Coarse permission category derived from the HTTP verb. Stored in the
/// grant relation's `type` column as 0 (read) / 1 (write).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationClass {
    Read,
    Write,
}

impl OperationClass {
    pub fn as_i32(self) -> i32 {
        match self {
            OperationClass::Read => 0,
            OperationClass::Write => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationClass::Read => "read",
            OperationClass::Write => "write",
        }
    }
}

/// Verb-to-class policy table. Methods absent from the table fall back to
/// Write, so new or exotic verbs fail closed onto the stricter class.
#[derive(Debug, Clone)]
pub struct MethodPolicy {
    classes: HashMap<Method, OperationClass>,
}

impl Default for MethodPolicy {
    fn default() -> Self {
        let mut classes = HashMap::new();
        classes.insert(Method::GET, OperationClass::Read);
        Self { classes }
    }
}

impl MethodPolicy {
    pub fn classify(&self, method: &Method) -> OperationClass {
        self.classes.get(method).copied().unwrap_or(OperationClass::Write)
    }

    /// Override or extend the verb mapping
    pub fn with_class(mut self, method: Method, class: OperationClass) -> Self {
        self.classes.insert(method, class);
        self
    }
}

/// Failure modes of the read-only lookup services. NotFound is a normal
/// outcome (deny, missing cluster); Storage is an infrastructure fault.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("not found")]
    NotFound,

    #[error("storage query error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for LookupError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => LookupError::NotFound,
            other => LookupError::Storage(other.to_string()),
        }
    }
}

/// Row-level permission check keyed by (role, cluster, operation class)
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn check(
        &self,
        role_id: i32,
        cluster_id: i32,
        class: OperationClass,
    ) -> Result<GrantRecord, LookupError>;
}

/// Oracle over the `role_etcd_servers` relation
pub struct PgPermissionOracle {
    pool: PgPool,
}

impl PgPermissionOracle {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionOracle for PgPermissionOracle {
    async fn check(
        &self,
        role_id: i32,
        cluster_id: i32,
        class: OperationClass,
    ) -> Result<GrantRecord, LookupError> {
        let grant = sqlx::query_as::<_, GrantRecord>(
            r#"
            SELECT role_id, etcd_server_id, type
            FROM role_etcd_servers
            WHERE role_id = $1 AND etcd_server_id = $2 AND type = $3
            "#,
        )
        .bind(role_id)
        .bind(cluster_id)
        .bind(class.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LookupError::Storage(e.to_string()))?;

        grant.ok_or(LookupError::NotFound)
    }
}
