pub mod auth;
pub mod gate;

pub use auth::session_auth_middleware;
pub use gate::{cluster_gate_middleware, BoundClient};

/// Header carrying the opaque session token
pub const TOKEN_HEADER: &str = "Token";

/// Header selecting the target cluster by id
pub const CLUSTER_HEADER: &str = "EtcdID";

/// Paths reachable before login: authentication itself, the static UI,
/// uploads, and the liveness probe.
const IDENTITY_EXEMPT_PREFIXES: &[&str] = &["/v1/passport", "/ui", "/v1/upload", "/health"];

/// Paths that never operate on a bound cluster client. The /v1/server
/// prefix manages cluster records themselves, so it must work while no
/// cluster is selected (or reachable).
const CLUSTER_EXEMPT_PREFIXES: &[&str] =
    &["/v1/passport", "/ui", "/v1/upload", "/health", "/v1/server"];

pub fn is_identity_exempt(path: &str) -> bool {
    IDENTITY_EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

pub fn is_cluster_exempt(path: &str) -> bool {
    CLUSTER_EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}
