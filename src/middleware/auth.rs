use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::middleware::{is_identity_exempt, TOKEN_HEADER};
use crate::session::{login_key, Identity};
use crate::state::AppState;

/// Identity resolution: token header -> session store -> Identity in
/// request extensions. Exempt prefixes pass through untouched so login
/// and static assets stay reachable pre-authentication. Every failure
/// mode is a bare 401.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_identity_exempt(request.uri().path()) {
        let token = request
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if token.is_empty() {
            return Err(ApiError::unauthorized());
        }

        let key = login_key(token);
        let raw = match state.sessions.get(&key).await {
            Some(raw) => raw,
            None => {
                warn!("login session not found");
                return Err(ApiError::unauthorized());
            }
        };

        // A stored value that no longer parses is treated the same as an
        // expired session
        let identity: Identity = match serde_json::from_str(&raw) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(error = %err, "stored login session failed to parse");
                return Err(ApiError::unauthorized());
            }
        };

        request.extensions_mut().insert(identity);
    }

    Ok(next.run(request).await)
}
