use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::{Deserialize, Serialize};

/// Authenticated user snapshot stored against a login token. Immutable for
/// the lifetime of one request once resolved by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub user_id: i32,
    pub role_id: i32,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

/// Cache key under which a token's serialized identity is stored
pub fn login_key(token: &str) -> String {
    format!("login_token_{}", token)
}

/// Shared read-mostly session cache. Logins write, every authenticated
/// request reads; writes must be visible to subsequent reads immediately.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: String, value: String);
    async fn remove(&self, key: &str);
}

/// In-process session store over a TTL cache. Entries fall out on their
/// own once the session lifetime elapses; no sweeper task needed.
pub struct MemorySessionStore {
    cache: Cache<String, String>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration, max_sessions: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Store sized from the application config
    pub fn from_config(session: &crate::config::SessionConfig) -> Self {
        Self::new(Duration::from_secs(session.ttl_secs), session.max_sessions)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await
    }

    async fn put(&self, key: String, value: String) {
        self.cache.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}
