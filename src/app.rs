use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public};
use crate::middleware::{cluster_gate_middleware, session_auth_middleware};
use crate::state::AppState;

/// Assemble the router. Requests flow trace -> cors -> identity
/// resolution -> cluster gate -> handler; the two gate layers wrap every
/// route and decide per path prefix what to skip.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(passport_routes())
        .merge(server_routes())
        .merge(key_routes())
        .layer(middleware::from_fn_with_state(state.clone(), cluster_gate_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), session_auth_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn passport_routes() -> Router<AppState> {
    use public::passport;

    Router::new()
        .route("/v1/passport/login", post(passport::login))
        .route("/v1/passport/logout", post(passport::logout))
}

fn server_routes() -> Router<AppState> {
    use protected::server;

    Router::new().route("/v1/server/list", get(server::list))
}

fn key_routes() -> Router<AppState> {
    use protected::kv;

    Router::new()
        .route("/v1/key", get(kv::list).post(kv::put).delete(kv::delete))
        .route("/v1/key/get", get(kv::get))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "etcd-console",
        "version": version,
        "description": "Multi-cluster etcd administration gateway",
        "endpoints": {
            "passport": "/v1/passport/login, /v1/passport/logout (public)",
            "server": "/v1/server/list (Token)",
            "key": "/v1/key, /v1/key/get (Token + EtcdID)",
        }
    }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
