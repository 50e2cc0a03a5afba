use std::sync::Arc;

use sqlx::PgPool;

use crate::cluster::etcd::EtcdClientFactory;
use crate::cluster::ClusterClientFactory;
use crate::config::AppConfig;
use crate::services::permission::{MethodPolicy, PermissionOracle, PgPermissionOracle};
use crate::services::registry::{ClusterRegistry, PgClusterRegistry};
use crate::services::users::{PgUserDirectory, UserDirectory};
use crate::session::{MemorySessionStore, SessionStore};

/// Injected collaborators shared by the middleware and handlers. Every
/// field is a capability trait so tests can substitute in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub oracle: Arc<dyn PermissionOracle>,
    pub registry: Arc<dyn ClusterRegistry>,
    pub users: Arc<dyn UserDirectory>,
    pub factory: Arc<dyn ClusterClientFactory>,
    pub method_policy: Arc<MethodPolicy>,
}

impl AppState {
    /// Production wiring: Postgres lookups, in-process session cache,
    /// real etcd client factory.
    pub fn production(pool: PgPool, config: &AppConfig) -> Self {
        Self {
            sessions: Arc::new(MemorySessionStore::from_config(&config.session)),
            oracle: Arc::new(PgPermissionOracle::new(pool.clone())),
            registry: Arc::new(PgClusterRegistry::new(pool.clone())),
            users: Arc::new(PgUserDirectory::new(pool)),
            factory: Arc::new(EtcdClientFactory),
            method_policy: Arc::new(MethodPolicy::default()),
        }
    }
}
