pub mod cluster;
pub mod grant;
pub mod user;

pub use cluster::ClusterRecord;
pub use grant::GrantRecord;
pub use user::UserRecord;
