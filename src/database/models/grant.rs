use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `role_etcd_servers` relation. Presence of a row grants a
/// role one operation class on one cluster; read (type 0) and write
/// (type 1) are independent rows, neither implies the other.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GrantRecord {
    pub role_id: i32,
    pub etcd_server_id: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub op_type: i32,
}
