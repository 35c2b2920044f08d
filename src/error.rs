//! Error types for validation runs and update checks

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the validation input, detected before the engine is launched
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("The input file '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Input file '{}' must be PDF", path.display())]
    NotPdf { path: PathBuf },
}

/// The engine could not be launched, or its results could not be delivered
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("failed to run validation engine `{program}`: {source}")]
    Process { program: String, source: io::Error },

    #[error("failed to write validation output to '{}': {source}", path.display())]
    WriteOutput { path: PathBuf, source: io::Error },

    #[error("failed to relay validation output: {source}")]
    Relay { source: io::Error },
}

/// Failure while checking the registry for a newer version.
///
/// Never leaves the update supervisor; it is logged and dropped there.
#[derive(Error, Debug)]
pub enum UpdateCheckError {
    #[error("registry request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not start update check runtime: {0}")]
    Runtime(io::Error),

    #[error("registry returned no release tags for {image}")]
    NoReleases { image: String },

    #[error("invalid version '{0}'")]
    InvalidVersion(String),
}

/// Top-level error for subcommand execution
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Failed to run validation: {0}")]
    Execution(#[from] ExecutionError),

    #[error("failed to extract config to '{}': {source}", path.display())]
    Config { path: PathBuf, source: io::Error },

    #[error("invalid value for {var}: {reason}")]
    Settings { var: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
