// handlers/public/passport.rs - login and logout
use axum::{extract::State, http::HeaderMap, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;
use crate::middleware::TOKEN_HEADER;
use crate::services::permission::LookupError;
use crate::services::users::password_digest;
use crate::session::{login_key, Identity};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub role_id: i32,
    pub expires_at: chrono::DateTime<Utc>,
}

/// POST /v1/passport/login - verify credentials and issue a session token.
/// Unknown names and wrong passwords get the same message so the endpoint
/// does not confirm which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = match state.users.first_by_name(&payload.name).await {
        Ok(user) => user,
        Err(LookupError::NotFound) => {
            warn!(name = %payload.name, "login for unknown user");
            return Err(ApiError::bad_request("incorrect user name or password"));
        }
        Err(LookupError::Storage(err)) => {
            error!(error = %err, "user lookup failed");
            return Err(ApiError::internal_server_error("storage query error"));
        }
    };

    if password_digest(&payload.password) != user.password {
        warn!(name = %user.name, "login with wrong password");
        return Err(ApiError::bad_request("incorrect user name or password"));
    }

    let ttl_secs = config::config().session.ttl_secs;
    let expires_at = Utc::now() + Duration::seconds(ttl_secs as i64);
    let identity = Identity {
        user_id: user.id,
        role_id: user.role_id,
        name: user.name.clone(),
        expires_at,
    };

    let token = Uuid::new_v4().simple().to_string();
    let raw = serde_json::to_string(&identity)
        .map_err(|_| ApiError::internal_server_error("failed to serialize session"))?;
    state.sessions.put(login_key(&token), raw).await;

    info!(name = %user.name, "login succeeded");
    Ok(Json(LoginResponse { token, name: user.name, role_id: user.role_id, expires_at }))
}

/// POST /v1/passport/logout - drop the session for the presented token.
/// Always succeeds; logging out an already-dead token is not an error.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        if !token.is_empty() {
            state.sessions.remove(&login_key(token)).await;
        }
    }
    Json(json!({ "msg": "ok" }))
}
