//! Child process execution

use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::process::{Command, Stdio};
use std::time::Duration;

use super::engine::EngineCommand;

/// Captured result of one engine run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// `-1` when the child was terminated by a signal
    pub exit_status: i32,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_status == 0
    }
}

/// Runs an engine command to completion
pub trait ProcessRunner {
    fn run(&self, command: &EngineCommand) -> io::Result<ExecutionResult>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, command: &EngineCommand) -> io::Result<ExecutionResult> {
        (**self).run(command)
    }
}

/// Spawns the real process and blocks until it exits. No timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &EngineCommand) -> io::Result<ExecutionResult> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ExecutionResult {
            stdout: decode("stdout", output.stdout)?,
            stderr: decode("stderr", output.stderr)?,
            exit_status: output.status.code().unwrap_or(-1),
        })
    }
}

/// Engine streams are text; invalid UTF-8 fails the run rather than being replaced
fn decode(stream: &str, bytes: Vec<u8>) -> io::Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("engine {stream} is not valid UTF-8: {}", e.utf8_error()),
        )
    })
}

/// Shows a spinner on stderr while the inner runner works.
///
/// The spinner is cleared before returning, so relayed engine output never
/// interleaves with it. Nothing is drawn when stderr is not a terminal.
pub struct SpinnerRunner<R> {
    inner: R,
    message: String,
}

impl<R: ProcessRunner> SpinnerRunner<R> {
    pub fn new(inner: R, message: impl Into<String>) -> Self {
        Self {
            inner,
            message: message.into(),
        }
    }
}

impl<R: ProcessRunner> ProcessRunner for SpinnerRunner<R> {
    fn run(&self, command: &EngineCommand) -> io::Result<ExecutionResult> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(self.message.clone());
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.inner.run(command);
        spinner.finish_and_clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn sh(script: &str) -> EngineCommand {
        EngineCommand {
            program: OsString::from("sh"),
            args: vec![OsString::from("-c"), OsString::from(script)],
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_streams_are_captured_separately() {
        let result = SystemRunner
            .run(&sh("echo report; echo warning >&2; exit 3"))
            .unwrap();

        assert_eq!(result.stdout, "report\n");
        assert_eq!(result.stderr, "warning\n");
        assert_eq!(result.exit_status, 3);
        assert!(!result.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_argument_is_not_shell_expanded() {
        let command = EngineCommand {
            program: OsString::from("printf"),
            args: vec![OsString::from("%s"), OsString::from("$HOME my doc.pdf")],
        };

        let result = SystemRunner.run(&command).unwrap();
        assert_eq!(result.stdout, "$HOME my doc.pdf");
        assert!(result.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_output_is_rejected() {
        let err = SystemRunner.run(&sh("printf 'a\\377b'")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("stdout"));
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let command = EngineCommand {
            program: OsString::from("definitely-not-an-arlington-engine"),
            args: Vec::new(),
        };

        let err = SystemRunner.run(&command).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_spinner_passes_result_through() {
        let runner = SpinnerRunner::new(SystemRunner, "Validating");
        let result = runner.run(&sh("printf ok")).unwrap();
        assert_eq!(result.stdout, "ok");
    }
}
