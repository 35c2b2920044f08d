//! Validation orchestration: preconditions, engine run and output routing

use std::fs;
use std::io::Write;

use super::engine::EngineLocator;
use super::request::ValidationRequest;
use super::runner::{ExecutionResult, ProcessRunner};
use crate::error::{ExecutionError, Result};

/// Drives one engine run per request
pub struct Orchestrator<R> {
    engine: EngineLocator,
    runner: R,
}

impl<R: ProcessRunner> Orchestrator<R> {
    pub fn new(engine: EngineLocator, runner: R) -> Self {
        Self { engine, runner }
    }

    /// Validate one document.
    ///
    /// The report goes to `request.output_path` when set and non-empty,
    /// otherwise to `out`.
    /// Engine stderr is always relayed to `err`. A non-zero engine exit is
    /// returned as data, not as an error.
    pub fn run<O: Write, E: Write>(
        &self,
        request: &ValidationRequest,
        out: &mut O,
        err: &mut E,
    ) -> Result<ExecutionResult> {
        request.check_preconditions()?;

        let command = self.engine.command_for(request);
        tracing::debug!(command = ?command.tokens(), "launching validation engine");

        let result = self
            .runner
            .run(&command)
            .map_err(|source| ExecutionError::Process {
                program: command.program.to_string_lossy().into_owned(),
                source,
            })?;

        tracing::debug!(
            exit_status = result.exit_status,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "validation engine finished"
        );

        let destination = request
            .output_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty());

        match destination {
            Some(path) => {
                fs::write(path, result.stdout.as_bytes()).map_err(|source| {
                    ExecutionError::WriteOutput {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
            }
            None => relay(out, &result.stdout)?,
        }

        if !result.stderr.is_empty() {
            relay(err, &result.stderr)?;
        }

        if !result.success() {
            tracing::warn!(
                exit_status = result.exit_status,
                input = %request.input_path.display(),
                "validation engine exited with non-zero status"
            );
        }

        Ok(result)
    }
}

/// Write a stream's content, terminated by a newline
fn relay<W: Write>(writer: &mut W, content: &str) -> std::result::Result<(), ExecutionError> {
    write_terminated(writer, content).map_err(|source| ExecutionError::Relay { source })
}

fn write_terminated<W: Write>(writer: &mut W, content: &str) -> std::io::Result<()> {
    writer.write_all(content.as_bytes())?;
    if !content.is_empty() && !content.ends_with('\n') {
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
