//! Command construction for the external Arlington engine

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::request::ValidationRequest;

/// Jar shipped next to the binary under `../res/`
pub const ENGINE_JAR_NAME: &str = "greenfield-apps-arlington-1.27.0-SNAPSHOT.jar";

/// How to start the engine: a program plus the arguments that precede the request flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineLocator {
    pub program: OsString,
    pub leading_args: Vec<OsString>,
}

/// Fully built engine invocation.
///
/// Arguments go straight to the child as an argv list, no shell is involved,
/// so an input path with spaces or metacharacters stays one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl EngineLocator {
    pub fn new(program: impl Into<OsString>, leading_args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    /// `<java> -jar <jar>`
    pub fn java_jar(java: impl Into<OsString>, jar: &Path) -> Self {
        Self::new(java, vec![OsString::from("-jar"), jar.as_os_str().to_owned()])
    }

    /// Build the invocation for a request
    pub fn command_for(&self, request: &ValidationRequest) -> EngineCommand {
        let mut args = self.leading_args.clone();
        args.push("--maxfailuresdisplayed".into());
        args.push(request.max_failures_displayed.to_string().into());
        args.push("--format".into());
        args.push(request.format.as_str().into());
        args.push(request.input_path.as_os_str().to_owned());

        EngineCommand {
            program: self.program.clone(),
            args,
        }
    }
}

/// Default jar location relative to the running executable.
///
/// Falls back to `res/<jar>` when the executable path cannot be resolved.
pub fn default_jar_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("..").join("res").join(ENGINE_JAR_NAME)))
        .unwrap_or_else(|| PathBuf::from("res").join(ENGINE_JAR_NAME))
}

impl EngineCommand {
    /// Program and arguments as display strings, for logs and tests
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }
}
