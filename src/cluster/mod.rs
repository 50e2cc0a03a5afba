pub mod client;
pub mod etcd;

pub use client::{ClientError, ClusterClient, ClusterClientFactory, KeyValue, SharedClusterClient};

use serde::{Deserialize, Serialize};

use crate::database::models::ClusterRecord;

/// Everything the client factory needs to dial one cluster. Built fresh
/// from a registry row on every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub cluster_id: i32,
    pub version: String,
    pub endpoints: Vec<String>,
    pub tls_enabled: bool,
    pub cert_file: String,
    pub key_file: String,
    pub ca_file: String,
    pub username: String,
    pub password: String,
}

impl ConnectionProfile {
    /// The stored row keeps endpoints as one comma-delimited string and
    /// the TLS flag as the string literal "true"; both quirks are decoded
    /// here and nowhere else.
    pub fn from_record(record: &ClusterRecord) -> Self {
        let endpoints = record
            .address
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            cluster_id: record.id,
            version: record.version.clone(),
            endpoints,
            tls_enabled: record.tls_enable == "true",
            cert_file: record.cert_file.clone(),
            key_file: record.key_file.clone(),
            ca_file: record.ca_file.clone(),
            username: record.username.clone(),
            password: record.password.clone(),
        }
    }
}
