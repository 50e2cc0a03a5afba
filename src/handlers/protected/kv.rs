// handlers/protected/kv.rs - key browsing on the bound cluster
use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::require_client;
use crate::cluster::KeyValue;
use crate::error::ApiError;
use crate::middleware::BoundClient;

#[derive(Debug, Deserialize)]
pub struct PrefixQuery {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct PutRequest {
    pub key: String,
    pub value: String,
}

/// GET /v1/key - list key-value pairs under a prefix
pub async fn list(
    client: Option<Extension<BoundClient>>,
    Query(params): Query<PrefixQuery>,
) -> Result<Json<Vec<KeyValue>>, ApiError> {
    let client = require_client(client)?;
    let kvs = client.list(&params.prefix).await?;
    Ok(Json(kvs))
}

/// GET /v1/key/get - fetch a single key
pub async fn get(
    client: Option<Extension<BoundClient>>,
    Query(params): Query<KeyQuery>,
) -> Result<Json<KeyValue>, ApiError> {
    let client = require_client(client)?;
    match client.get(&params.key).await? {
        Some(kv) => Ok(Json(kv)),
        None => Err(ApiError::not_found(format!("key not found: {}", params.key))),
    }
}

/// POST /v1/key - create or overwrite a key
pub async fn put(
    client: Option<Extension<BoundClient>>,
    Json(payload): Json<PutRequest>,
) -> Result<Json<Value>, ApiError> {
    let client = require_client(client)?;
    client.put(&payload.key, &payload.value).await?;
    Ok(Json(json!({ "msg": "ok" })))
}

/// DELETE /v1/key - delete a key
pub async fn delete(
    client: Option<Extension<BoundClient>>,
    Query(params): Query<KeyQuery>,
) -> Result<Json<Value>, ApiError> {
    let client = require_client(client)?;
    let deleted = client.delete(&params.key).await?;
    if !deleted {
        return Err(ApiError::not_found(format!("key not found: {}", params.key)));
    }
    Ok(Json(json!({ "msg": "ok" })))
}
