/// CLI error types with associated exit codes.
///
/// Every variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. A record, consent list or report could
///   not be read or parsed, so no policy was evaluated.
/// - Exit code **1**: configuration failure. The rule table was rejected, or
///   the tool failed while writing its output.
use std::fmt;
use std::path::PathBuf;

use disclosure_core::PolicyTableError;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `disclose` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// `"-"`, `"stdout"`, `"stderr"`, or the filesystem path.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The input is not the JSON shape the command expects.
    ParseFailed {
        /// What was being parsed and where it failed.
        detail: String,
    },

    // --- Exit code 1: configuration failures ---
    /// The rule table given with `--rules` was rejected.
    InvalidRuleTable {
        /// The rule table path.
        path: PathBuf,
        /// The loader's error.
        error: PolicyTableError,
    },

    /// An output could not be produced.
    InternalError {
        /// What went wrong.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. } => 2,

            Self::InvalidRuleTable { .. } | Self::InternalError { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ParseFailed { detail } => format!("error: parse failed: {detail}"),
            Self::InvalidRuleTable { path, error } => {
                format!("error: invalid rule table {}: {error}", path.display())
            }
            Self::InternalError { detail } => format!("error: internal error: {detail}"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRuleTable { error, .. } => Some(error),
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InternalError { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::error::Error as _;

    use disclosure_core::PolicyTable;

    use super::*;

    fn bad_table() -> CliError {
        let error = PolicyTable::from_json_str(r#"{ "version": "9.9" }"#)
            .expect_err("unsupported version");
        CliError::InvalidRuleTable {
            path: PathBuf::from("rules.json"),
            error,
        }
    }

    #[test]
    fn input_failures_are_exit_2() {
        let errors = [
            CliError::FileNotFound {
                path: PathBuf::from("r.json"),
            },
            CliError::PermissionDenied {
                path: PathBuf::from("/root/r.json"),
            },
            CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: 10,
                actual: None,
            },
            CliError::InvalidUtf8 {
                source: "r.json".to_owned(),
                byte_offset: 3,
            },
            CliError::StdinReadError {
                detail: "closed".to_owned(),
            },
            CliError::ParseFailed {
                detail: "record: line 1, column 1: EOF".to_owned(),
            },
        ];
        for e in errors {
            assert_eq!(e.exit_code(), 2, "{e}");
        }
    }

    #[test]
    fn configuration_failures_are_exit_1() {
        assert_eq!(bad_table().exit_code(), 1);
        let e = CliError::InternalError {
            detail: "serialize".to_owned(),
        };
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn messages_start_with_error_prefix() {
        let e = CliError::FileTooLarge {
            source: "big.json".to_owned(),
            limit: 1024,
            actual: Some(2048),
        };
        assert_eq!(
            e.message(),
            "error: file too large: big.json is 2048 bytes, limit is 1024 bytes"
        );
        assert!(bad_table().message().starts_with("error: invalid rule table rules.json:"));
    }

    #[test]
    fn rule_table_error_is_the_source() {
        let e = bad_table();
        let source = e.source().expect("has a source");
        assert!(source.to_string().contains("9.9"), "{source}");
    }
}
