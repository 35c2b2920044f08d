//! Validation request and its preconditions

use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::PreconditionError;

/// Report format understood by the Arlington engine
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Raw,
    #[default]
    Xml,
    Html,
    Text,
    Json,
}

impl OutputFormat {
    /// Token passed to the engine's `--format` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Xml => "xml",
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation run
#[derive(Debug, Clone)]
pub struct ValidationRequest {
    pub input_path: PathBuf,
    /// Report destination; `None` sends the report to standard output
    pub output_path: Option<PathBuf>,
    /// Negative means unlimited
    pub max_failures_displayed: i64,
    pub format: OutputFormat,
}

impl ValidationRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: None,
            max_failures_displayed: -1,
            format: OutputFormat::default(),
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_max_failures(mut self, max: i64) -> Self {
        self.max_failures_displayed = max;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Check that the input exists and is a PDF.
    ///
    /// Existence is checked first so a missing `report.txt` is reported as missing.
    pub fn check_preconditions(&self) -> Result<(), PreconditionError> {
        if !self.input_path.is_file() {
            return Err(PreconditionError::InputNotFound {
                path: self.input_path.clone(),
            });
        }

        if !has_pdf_extension(&self.input_path) {
            return Err(PreconditionError::NotPdf {
                path: self.input_path.clone(),
            });
        }

        Ok(())
    }
}

/// Name ends in `.pdf`, any case; a bare `.pdf` file name counts
fn has_pdf_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}
