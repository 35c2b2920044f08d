//! Arlington PDF Validator Library
//!
//! Runs the external Arlington engine against a PDF document and relays its
//! report, with a background check for newer releases of the tool.

pub mod config_file;
pub mod core;
pub mod error;
pub mod settings;
pub mod update;

pub use crate::core::orchestrator;
pub use crate::update::supervisor;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config_file::extract_config;
    pub use crate::core::{
        EngineCommand, EngineLocator, ExecutionResult, Orchestrator, OutputFormat,
        ProcessRunner, SpinnerRunner, SystemRunner, ValidationRequest,
    };
    pub use crate::error::{Error, ExecutionError, PreconditionError, UpdateCheckError};
    pub use crate::settings::Settings;
    pub use crate::update::{run_with_update_check, UpdateCheck, UpdateChecker, UpdateTask};
}
