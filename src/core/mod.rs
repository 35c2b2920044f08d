//! Validation pipeline around the external Arlington engine

pub mod engine;
pub mod orchestrator;
pub mod request;
pub mod runner;

pub use engine::{EngineCommand, EngineLocator};
pub use orchestrator::Orchestrator;
pub use request::{OutputFormat, ValidationRequest};
pub use runner::{ExecutionResult, ProcessRunner, SpinnerRunner, SystemRunner};
