pub mod kv;
pub mod server;

use axum::extract::Extension;

use crate::cluster::SharedClusterClient;
use crate::error::ApiError;
use crate::middleware::BoundClient;

/// Unwrap the client the gate bound for this request. Routes under this
/// module need a cluster; reaching one without an EtcdID header means the
/// caller never selected a service.
pub(crate) fn require_client(
    client: Option<Extension<BoundClient>>,
) -> Result<SharedClusterClient, ApiError> {
    client
        .map(|Extension(BoundClient(client))| client)
        .ok_or_else(|| ApiError::bad_request("please select an Etcd service"))
}
