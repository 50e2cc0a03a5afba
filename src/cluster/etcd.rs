use std::sync::Arc;

use async_trait::async_trait;
use etcd_client::{
    Certificate, Client, ConnectOptions, GetOptions, Identity as TlsIdentity, TlsOptions,
};
use tokio::sync::Mutex;

use crate::cluster::client::{
    ClientError, ClusterClient, ClusterClientFactory, KeyValue, SharedClusterClient,
};
use crate::cluster::ConnectionProfile;

/// Production factory over the etcd v3 gRPC client. Dials synchronously
/// in the request path so registry edits apply on the next request.
pub struct EtcdClientFactory;

#[async_trait]
impl ClusterClientFactory for EtcdClientFactory {
    async fn connect(
        &self,
        profile: &ConnectionProfile,
    ) -> Result<SharedClusterClient, ClientError> {
        if profile.endpoints.is_empty() {
            return Err(ClientError::Config("no endpoints configured".to_string()));
        }
        if profile.version != "v3" {
            return Err(ClientError::UnsupportedVersion(profile.version.clone()));
        }

        let mut options = ConnectOptions::new();
        if !profile.username.is_empty() {
            options = options.with_user(profile.username.clone(), profile.password.clone());
        }
        if profile.tls_enabled {
            options = options.with_tls(load_tls_options(profile).await?);
        }

        let client = Client::connect(profile.endpoints.clone(), Some(options))
            .await
            .map_err(|e| ClientError::Connect(e.to_string()))?;

        Ok(Arc::new(EtcdClusterClient::new(client)))
    }
}

async fn load_tls_options(profile: &ConnectionProfile) -> Result<TlsOptions, ClientError> {
    let ca = tokio::fs::read(&profile.ca_file)
        .await
        .map_err(|e| ClientError::Config(format!("read ca file {}: {}", profile.ca_file, e)))?;
    let cert = tokio::fs::read(&profile.cert_file)
        .await
        .map_err(|e| ClientError::Config(format!("read cert file {}: {}", profile.cert_file, e)))?;
    let key = tokio::fs::read(&profile.key_file)
        .await
        .map_err(|e| ClientError::Config(format!("read key file {}: {}", profile.key_file, e)))?;

    Ok(TlsOptions::new()
        .ca_certificate(Certificate::from_pem(ca))
        .identity(TlsIdentity::from_pem(cert, key)))
}

/// Handle over one dialed etcd client. The inner client is taken on close
/// so a second close is a no-op and post-close use reports Closed.
pub struct EtcdClusterClient {
    inner: Mutex<Option<Client>>,
}

impl EtcdClusterClient {
    pub fn new(client: Client) -> Self {
        Self { inner: Mutex::new(Some(client)) }
    }
}

fn decode_kv(kv: &etcd_client::KeyValue) -> KeyValue {
    KeyValue {
        key: String::from_utf8_lossy(kv.key()).into_owned(),
        value: String::from_utf8_lossy(kv.value()).into_owned(),
        version: kv.version(),
    }
}

#[async_trait]
impl ClusterClient for EtcdClusterClient {
    async fn get(&self, key: &str) -> Result<Option<KeyValue>, ClientError> {
        let mut guard = self.inner.lock().await;
        let client = guard.as_mut().ok_or(ClientError::Closed)?;
        let response = client
            .get(key, None)
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(response.kvs().first().map(decode_kv))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KeyValue>, ClientError> {
        let mut guard = self.inner.lock().await;
        let client = guard.as_mut().ok_or(ClientError::Closed)?;
        let response = client
            .get(prefix, Some(GetOptions::new().with_prefix()))
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(response.kvs().iter().map(decode_kv).collect())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut guard = self.inner.lock().await;
        let client = guard.as_mut().ok_or(ClientError::Closed)?;
        client
            .put(key, value, None)
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, ClientError> {
        let mut guard = self.inner.lock().await;
        let client = guard.as_mut().ok_or(ClientError::Closed)?;
        let response = client
            .delete(key, None)
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;
        Ok(response.deleted() > 0)
    }

    async fn close(&self) -> Result<(), ClientError> {
        // Dropping the client tears down its gRPC channel
        let _ = self.inner.lock().await.take();
        Ok(())
    }
}
