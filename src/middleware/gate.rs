use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use crate::cluster::{ConnectionProfile, SharedClusterClient};
use crate::error::ApiError;
use crate::middleware::{is_cluster_exempt, CLUSTER_HEADER};
use crate::services::permission::LookupError;
use crate::session::Identity;
use crate::state::AppState;

/// Cluster client bound to the current request. Inserted after the
/// permission check succeeds; handlers never see a client for a cluster
/// their role lacks the relevant grant on.
#[derive(Clone)]
pub struct BoundClient(pub SharedClusterClient);

/// The cluster gate: selection, operation classification, authorization,
/// client binding, dispatch and teardown, in that order. Requests without
/// an EtcdID header pass through unbound (cluster-agnostic routes);
/// exempt prefixes skip the gate entirely.
pub async fn cluster_gate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_cluster_exempt(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let header = request
        .headers()
        .get(CLUSTER_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if header.is_empty() {
        return Ok(next.run(request).await);
    }

    let cluster_id: i32 = header.parse().unwrap_or(0);
    if cluster_id <= 0 {
        return Err(ApiError::bad_request("please select an Etcd service"));
    }

    let identity = match request.extensions().get::<Identity>() {
        Some(identity) => identity.clone(),
        None => {
            warn!("cluster gate reached without a resolved identity");
            return Err(ApiError::unauthorized());
        }
    };

    let class = state.method_policy.classify(request.method());
    match state.oracle.check(identity.role_id, cluster_id, class).await {
        Ok(_) => {}
        Err(LookupError::NotFound) => {
            warn!(
                role_id = identity.role_id,
                cluster_id,
                class = class.as_str(),
                "operation denied, no grant"
            );
            return Err(ApiError::forbidden("no permission for this operation"));
        }
        Err(LookupError::Storage(err)) => {
            error!(error = %err, "permission lookup failed");
            return Err(ApiError::internal_server_error("storage query error"));
        }
    }

    // Fetched fresh every request so credential and endpoint edits take
    // effect without any cache invalidation
    let record = match state.registry.first_by_id(cluster_id).await {
        Ok(record) => record,
        Err(err) => {
            error!(cluster_id, error = %err, "failed to load cluster record");
            return Err(ApiError::internal_server_error("storage query error"));
        }
    };

    let profile = ConnectionProfile::from_record(&record);
    let client = match state.factory.connect(&profile).await {
        Ok(client) => client,
        Err(err) => {
            error!(cluster_id, error = %err, "failed to connect cluster");
            return Err(ApiError::bad_request(err.to_string()));
        }
    };

    request.extensions_mut().insert(BoundClient(client.clone()));
    let response = next.run(request).await;

    // Close only after the downstream handler has fully returned. The
    // response is returned unchanged even if close fails.
    if let Err(err) = client.close().await {
        error!(cluster_id, error = %err, "failed to close cluster client");
    }

    Ok(response)
}
