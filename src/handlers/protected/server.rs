// handlers/protected/server.rs - cluster record listing for the selector
use axum::extract::State;
use axum::Json;
use tracing::error;

use crate::database::models::cluster::ClusterSummary;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /v1/server/list - the clusters this operator can pick from.
/// Exempt from the cluster gate: it has to work while nothing is
/// selected. Credentials are stripped before the rows leave the service.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ClusterSummary>>, ApiError> {
    let records = state.registry.list().await.map_err(|err| {
        error!(error = %err, "cluster list failed");
        ApiError::internal_server_error("storage query error")
    })?;

    Ok(Json(records.iter().map(ClusterSummary::from).collect()))
}
