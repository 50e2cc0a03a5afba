pub mod permission;
pub mod registry;
pub mod users;

pub use permission::{LookupError, MethodPolicy, OperationClass, PermissionOracle};
pub use registry::ClusterRegistry;
pub use users::UserDirectory;
