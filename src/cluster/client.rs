use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cluster::ConnectionProfile;

/// One key-value pair as surfaced to the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
    pub version: i64,
}

/// Errors from cluster client construction and use. Messages are
/// operator-facing diagnostics and may be returned in response bodies.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid cluster configuration: {0}")]
    Config(String),

    #[error("unsupported etcd version: {0}")]
    UnsupportedVersion(String),

    #[error("failed to connect to etcd: {0}")]
    Connect(String),

    #[error("etcd request failed: {0}")]
    Request(String),

    #[error("client already closed")]
    Closed,
}

/// Live connection to one cluster, scoped to one request. Handlers borrow
/// it through request extensions; only the gate closes it.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<KeyValue>, ClientError>;
    async fn list(&self, prefix: &str) -> Result<Vec<KeyValue>, ClientError>;
    async fn put(&self, key: &str, value: &str) -> Result<(), ClientError>;
    async fn delete(&self, key: &str) -> Result<bool, ClientError>;

    /// Release the underlying connection. Safe to call once per handle;
    /// a second call is a no-op returning Ok.
    async fn close(&self) -> Result<(), ClientError>;
}

pub type SharedClusterClient = Arc<dyn ClusterClient>;

/// Connects a client for a tenant-specific profile. The wire protocol,
/// endpoint selection and retry policy all live behind this seam.
#[async_trait]
pub trait ClusterClientFactory: Send + Sync {
    async fn connect(&self, profile: &ConnectionProfile)
        -> Result<SharedClusterClient, ClientError>;
}
