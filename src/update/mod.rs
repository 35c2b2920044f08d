//! Self-update notification

pub mod checker;
pub mod registry;
pub mod supervisor;
pub mod version;

pub use checker::UpdateChecker;
pub use registry::{DockerHubRegistry, VersionRegistry};
pub use supervisor::{run_with_update_check, UpdateCheck, UpdateTask};
pub use version::Version;
