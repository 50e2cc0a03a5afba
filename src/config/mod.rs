use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub http: HttpConfig,
    pub session: SessionConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Seconds a login session stays valid without re-authentication
    pub ttl_secs: u64,
    /// Upper bound on concurrently cached sessions
    pub max_sessions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, specific env vars override
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("HTTP_ADDRESS") {
            self.http.address = v;
        }
        if let Ok(v) = env::var("HTTP_PORT").or_else(|_| env::var("PORT")) {
            self.http.port = v.parse().unwrap_or(self.http.port);
        }

        if let Ok(v) = env::var("SESSION_TTL_SECS") {
            self.session.ttl_secs = v.parse().unwrap_or(self.session.ttl_secs);
        }
        if let Ok(v) = env::var("SESSION_MAX_SESSIONS") {
            self.session.max_sessions = v.parse().unwrap_or(self.session.max_sessions);
        }

        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            http: HttpConfig { address: "0.0.0.0".to_string(), port: 10280 },
            session: SessionConfig {
                ttl_secs: 60 * 60 * 24, // 1 day
                max_sessions: 10_000,
            },
            database: DatabaseConfig { max_connections: 10, connect_timeout_secs: 30 },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            http: HttpConfig { address: "0.0.0.0".to_string(), port: 10280 },
            session: SessionConfig { ttl_secs: 60 * 60 * 8, max_sessions: 10_000 },
            database: DatabaseConfig { max_connections: 20, connect_timeout_secs: 10 },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            http: HttpConfig { address: "0.0.0.0".to_string(), port: 10280 },
            session: SessionConfig { ttl_secs: 60 * 60 * 4, max_sessions: 50_000 },
            database: DatabaseConfig { max_connections: 50, connect_timeout_secs: 5 },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
