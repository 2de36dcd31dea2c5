//! Formatting of generated Go source.

use crate::error::{EnumgenError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Turns generated source into its final on-disk form.
pub trait SourceFormatter {
    fn name(&self) -> &str;

    fn format(&self, source: &str) -> Result<String>;
}

/// Leaves source untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl SourceFormatter for Verbatim {
    fn name(&self) -> &str {
        "verbatim"
    }

    fn format(&self, source: &str) -> Result<String> {
        Ok(source.to_string())
    }
}

/// Pipes source through a `gofmt`-compatible command (stdin to stdout).
#[derive(Debug, Clone)]
pub struct Gofmt {
    command: String,
}

impl Default for Gofmt {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_FORMAT_COMMAND)
    }
}

impl Gofmt {
    /// `command` is split on whitespace into program and arguments.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl SourceFormatter for Gofmt {
    fn name(&self) -> &str {
        &self.command
    }

    fn format(&self, source: &str) -> Result<String> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| EnumgenError::format("empty formatter command"))?;

        let child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| EnumgenError::format(format!("failed to spawn {}: {}", program, e)))?;

        child
            .stdin
            .as_ref()
            .ok_or_else(|| EnumgenError::format("failed to open formatter stdin"))?
            .write_all(source.as_bytes())
            .map_err(|e| EnumgenError::format(format!("failed to write to {}: {}", program, e)))?;

        let output = child
            .wait_with_output()
            .map_err(|e| EnumgenError::format(format!("failed to read {} output: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EnumgenError::format(format!(
                "{} failed ({}): {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| EnumgenError::format(format!("{} produced invalid UTF-8: {}", program, e)))
    }
}

/// Format `source`, falling back to the unformatted text so it can still be
/// inspected.
pub fn format_or_verbatim(formatter: &dyn SourceFormatter, source: String) -> String {
    match formatter.format(&source) {
        Ok(formatted) => {
            debug!(formatter = formatter.name(), "Formatted generated source");
            formatted
        }
        Err(e) => {
            warn!(
                formatter = formatter.name(),
                error = %e,
                "Formatting failed, writing unformatted source"
            );
            source
        }
    }
}
