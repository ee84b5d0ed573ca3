/// Command module for the `disclose` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes already-read input and returns `Ok(())` on success or a
/// [`CliError`] on failure. Shared plumbing for rule loading, JSON parsing
/// and stdout/stderr writing lives here.
pub mod record;
pub mod report;
pub mod rules;

use std::borrow::Cow;
use std::io::Write as _;
use std::path::Path;

use disclosure_core::PolicyTable;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::read_input;

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Returns the rule table named by `--rules`, or the built-in one.
pub fn load_rules(
    path: Option<&Path>,
    max_size: u64,
) -> Result<Cow<'static, PolicyTable>, CliError> {
    let Some(path) = path else {
        return Ok(Cow::Borrowed(PolicyTable::builtin()));
    };
    let content = read_input(&PathOrStdin::Path(path.to_path_buf()), max_size)?;
    let table =
        PolicyTable::from_json_str(&content).map_err(|error| CliError::InvalidRuleTable {
            path: path.to_path_buf(),
            error,
        })?;
    debug!(path = %path.display(), rules = table.rules().len(), "loaded rule table");
    Ok(Cow::Owned(table))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses `content` as JSON, labelling errors with `what`.
pub fn parse_json<T: DeserializeOwned>(content: &str, what: &str) -> Result<T, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::ParseFailed {
        detail: format!("{what}: line {}, column {}: {e}", e.line(), e.column()),
    })
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Stderr behavior shared by every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    /// Suppress the summary line.
    pub quiet: bool,
    /// Write trace entries as JSON lines.
    pub trace: bool,
}

impl Output {
    /// Writes the one-line summary to stderr unless quiet.
    pub fn summary(&self, line: &str) -> Result<(), CliError> {
        if self.quiet {
            return Ok(());
        }
        writeln!(std::io::stderr().lock(), "{line}").map_err(|e| stream_error("stderr", &e))
    }

    /// Writes each entry as one compact JSON line to stderr when tracing.
    pub fn trace_lines<T: Serialize>(&self, entries: &[T]) -> Result<(), CliError> {
        if !self.trace {
            return Ok(());
        }
        let stderr = std::io::stderr();
        let mut err_out = stderr.lock();
        for entry in entries {
            let line = serde_json::to_string(entry).map_err(|e| CliError::InternalError {
                detail: format!("JSON serialization of trace entry failed: {e}"),
            })?;
            writeln!(err_out, "{line}").map_err(|e| stream_error("stderr", &e))?;
        }
        Ok(())
    }
}

/// Writes `value` to stdout as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::InternalError {
        detail: format!("JSON serialization of output failed: {e}"),
    })?;
    writeln!(std::io::stdout().lock(), "{json}").map_err(|e| stream_error("stdout", &e))
}

fn stream_error(stream: &str, e: &std::io::Error) -> CliError {
    CliError::IoError {
        source: stream.to_owned(),
        detail: e.to_string(),
    }
}
