#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use tower::ServiceExt;

use etcd_console::app::app;
use etcd_console::cluster::{
    ClientError, ClusterClient, ClusterClientFactory, ConnectionProfile, KeyValue,
    SharedClusterClient,
};
use etcd_console::database::models::{ClusterRecord, GrantRecord, UserRecord};
use etcd_console::services::permission::{LookupError, MethodPolicy, OperationClass, PermissionOracle};
use etcd_console::services::registry::ClusterRegistry;
use etcd_console::services::users::{password_digest, UserDirectory};
use etcd_console::session::{login_key, Identity, MemorySessionStore, SessionStore};
use etcd_console::state::AppState;

/// Session store that counts lookups so tests can assert exempt routes
/// never touch it.
pub struct CountingSessionStore {
    inner: MemorySessionStore,
    pub gets: AtomicUsize,
}

impl CountingSessionStore {
    pub fn new() -> Self {
        Self {
            inner: MemorySessionStore::new(Duration::from_secs(600), 64),
            gets: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SessionStore for CountingSessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn put(&self, key: String, value: String) {
        self.inner.put(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.remove(key).await;
    }
}

/// Grant set held in memory; optionally fails every lookup to simulate a
/// storage outage.
pub struct MemoryOracle {
    grants: HashSet<(i32, i32, i32)>,
    pub checks: AtomicUsize,
    pub fail: AtomicBool,
}

impl MemoryOracle {
    pub fn new(grants: &[(i32, i32, OperationClass)]) -> Self {
        Self {
            grants: grants.iter().map(|(r, c, t)| (*r, *c, t.as_i32())).collect(),
            checks: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl PermissionOracle for MemoryOracle {
    async fn check(
        &self,
        role_id: i32,
        cluster_id: i32,
        class: OperationClass,
    ) -> Result<GrantRecord, LookupError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(LookupError::Storage("connection refused".to_string()));
        }
        if self.grants.contains(&(role_id, cluster_id, class.as_i32())) {
            Ok(GrantRecord { role_id, etcd_server_id: cluster_id, op_type: class.as_i32() })
        } else {
            Err(LookupError::NotFound)
        }
    }
}

pub struct MemoryRegistry {
    clusters: HashMap<i32, ClusterRecord>,
    pub fail: AtomicBool,
}

impl MemoryRegistry {
    pub fn new(clusters: Vec<ClusterRecord>) -> Self {
        Self {
            clusters: clusters.into_iter().map(|c| (c.id, c)).collect(),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ClusterRegistry for MemoryRegistry {
    async fn first_by_id(&self, cluster_id: i32) -> Result<ClusterRecord, LookupError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LookupError::Storage("connection refused".to_string()));
        }
        self.clusters.get(&cluster_id).cloned().ok_or(LookupError::NotFound)
    }

    async fn list(&self) -> Result<Vec<ClusterRecord>, LookupError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(LookupError::Storage("connection refused".to_string()));
        }
        let mut records: Vec<_> = self.clusters.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }
}

pub struct MemoryUserDirectory {
    users: Vec<UserRecord>,
}

impl MemoryUserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn first_by_name(&self, name: &str) -> Result<UserRecord, LookupError> {
        self.users
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or(LookupError::NotFound)
    }
}

/// In-memory stand-in for a dialed cluster client. Keys live in a map
/// shared across all clients the factory hands out, so data written
/// through one request is visible to the next.
pub struct FakeClient {
    data: Arc<tokio::sync::Mutex<HashMap<String, String>>>,
    closed: AtomicBool,
    closes: Arc<AtomicUsize>,
}

impl FakeClient {
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn live(&self) -> Result<(), ClientError> {
        if self.is_closed() {
            Err(ClientError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ClusterClient for FakeClient {
    async fn get(&self, key: &str) -> Result<Option<KeyValue>, ClientError> {
        self.live()?;
        let data = self.data.lock().await;
        Ok(data.get(key).map(|value| KeyValue {
            key: key.to_string(),
            value: value.clone(),
            version: 1,
        }))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<KeyValue>, ClientError> {
        self.live()?;
        let data = self.data.lock().await;
        let mut kvs: Vec<_> = data
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| KeyValue { key: k.clone(), value: v.clone(), version: 1 })
            .collect();
        kvs.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(kvs)
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.live()?;
        self.data.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, ClientError> {
        self.live()?;
        Ok(self.data.lock().await.remove(key).is_some())
    }

    async fn close(&self) -> Result<(), ClientError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Factory that records every connect and hands out fake clients over a
/// shared key space. Can be told to refuse connections.
pub struct RecordingFactory {
    data: Arc<tokio::sync::Mutex<HashMap<String, String>>>,
    pub connects: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
    pub refuse: AtomicBool,
    issued: tokio::sync::Mutex<Vec<Arc<FakeClient>>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            data: Arc::new(tokio::sync::Mutex::new(HashMap::new())),
            connects: AtomicUsize::new(0),
            closes: Arc::new(AtomicUsize::new(0)),
            refuse: AtomicBool::new(false),
            issued: tokio::sync::Mutex::new(Vec::new()),
        }
    }

    pub async fn seed(&self, key: &str, value: &str) {
        self.data.lock().await.insert(key.to_string(), value.to_string());
    }

    pub async fn issued(&self) -> Vec<Arc<FakeClient>> {
        self.issued.lock().await.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClusterClientFactory for RecordingFactory {
    async fn connect(
        &self,
        _profile: &ConnectionProfile,
    ) -> Result<SharedClusterClient, ClientError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(ClientError::Connect("connection refused".to_string()));
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        let client = Arc::new(FakeClient {
            data: self.data.clone(),
            closed: AtomicBool::new(false),
            closes: self.closes.clone(),
        });
        self.issued.lock().await.push(client.clone());
        Ok(client)
    }
}

/// Assembled app plus handles on the counting fakes behind it
pub struct Harness {
    pub app: Router,
    pub sessions: Arc<CountingSessionStore>,
    pub oracle: Arc<MemoryOracle>,
    pub registry: Arc<MemoryRegistry>,
    pub factory: Arc<RecordingFactory>,
}

pub const TEST_ROLE: i32 = 2;
pub const TEST_CLUSTER: i32 = 1;

pub fn cluster_record(id: i32) -> ClusterRecord {
    ClusterRecord {
        id,
        name: format!("cluster-{}", id),
        version: "v3".to_string(),
        address: "127.0.0.1:2379,127.0.0.2:2379".to_string(),
        tls_enable: "false".to_string(),
        ..Default::default()
    }
}

pub fn test_user() -> UserRecord {
    UserRecord {
        id: 1,
        name: "admin".to_string(),
        password: password_digest("admin123"),
        role_id: TEST_ROLE,
        created_at: Utc::now(),
    }
}

/// Build the app against in-memory fakes with the given grant fixture
pub fn harness(grants: &[(i32, i32, OperationClass)]) -> Harness {
    let sessions = Arc::new(CountingSessionStore::new());
    let oracle = Arc::new(MemoryOracle::new(grants));
    let registry = Arc::new(MemoryRegistry::new(vec![cluster_record(TEST_CLUSTER)]));
    let factory = Arc::new(RecordingFactory::new());
    let users = Arc::new(MemoryUserDirectory::new(vec![test_user()]));

    let state = AppState {
        sessions: sessions.clone(),
        oracle: oracle.clone(),
        registry: registry.clone(),
        users,
        factory: factory.clone(),
        method_policy: Arc::new(MethodPolicy::default()),
    };

    Harness { app: app(state), sessions, oracle, registry, factory }
}

/// Insert a live session directly and return its token
pub async fn login_session(harness: &Harness) -> String {
    let token = "test-token".to_string();
    let identity = Identity {
        user_id: 1,
        role_id: TEST_ROLE,
        name: "admin".to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    };
    harness
        .sessions
        .put(login_key(&token), serde_json::to_string(&identity).unwrap())
        .await;
    token
}

/// Drive one request through the router and collect status + body bytes
pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), 64 * 1024).await?;
    Ok((status, body.to_vec()))
}

pub fn json_msg(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("msg").and_then(|m| m.as_str()).map(String::from))
}
