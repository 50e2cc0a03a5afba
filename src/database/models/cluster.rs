use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `etcd_servers` table - one managed cluster's connection
/// profile as stored. Two legacy quirks carry over from the schema:
/// `address` is a comma-delimited endpoint list and `tls_enable` is the
/// string literal "true"/"false" rather than a boolean column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct ClusterRecord {
    pub id: i32,
    pub name: String,
    pub version: String,
    pub address: String,
    pub tls_enable: String,
    pub cert_file: String,
    pub key_file: String,
    pub ca_file: String,
    pub username: String,
    pub password: String,
}

/// Credential-free projection of a cluster row, safe to hand to the UI's
/// cluster selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub id: i32,
    pub name: String,
    pub version: String,
    pub address: String,
}

impl From<&ClusterRecord> for ClusterSummary {
    fn from(record: &ClusterRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            version: record.version.clone(),
            address: record.address.clone(),
        }
    }
}
