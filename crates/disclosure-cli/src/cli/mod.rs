//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use disclosure_core::{DisclosureLevel, Role};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for the `rules` subcommand.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text listing (default).
    Human,
    /// The rule table as a loadable JSON document.
    Json,
}

/// Disclosure level as accepted on the command line.
///
/// The wire spellings (`FULL`, `PARENT_SAFE`, `ANONYMIZED`) are accepted as
/// aliases so values can be pasted from request payloads.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LevelArg {
    /// No level transform.
    #[value(alias = "FULL")]
    Full,
    /// Scrub discipline entries of other people and staff.
    #[value(alias = "PARENT_SAFE")]
    ParentSafe,
    /// Parent-safe, plus pseudonymized names and no direct identifiers.
    #[value(alias = "ANONYMIZED")]
    Anonymized,
}

impl From<LevelArg> for DisclosureLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Full => DisclosureLevel::Full,
            LevelArg::ParentSafe => DisclosureLevel::ParentSafe,
            LevelArg::Anonymized => DisclosureLevel::Anonymized,
        }
    }
}

/// All top-level subcommands exposed by the `disclose` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Compute the view of a subject record for a viewer role.
    Record {
        /// Path to a subject record JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Viewer role (e.g. Teacher, EPP, GovAnalyst). Unknown names are
        /// evaluated as least privileged.
        #[arg(long)]
        role: Role,
        /// Disclosure level applied after the role rules.
        #[arg(long, value_enum, default_value = "full")]
        level: LevelArg,
        /// JSON array of consent records for the subject.
        #[arg(long, value_name = "FILE")]
        consents: Option<PathBuf>,
    },

    /// Filter the sections of a report for a disclosure level.
    Report {
        /// Path to a JSON array of report sections, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Disclosure level for the report audience.
        #[arg(long, value_enum, default_value = "full")]
        level: LevelArg,
    },

    /// Print the effective rule table.
    Rules {
        /// Output format: human (default) or json.
        #[arg(long, short = 'f', value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

/// Root CLI struct for the `disclose` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "disclose",
    version,
    about = "Policy-driven redaction of subject records and reports",
    long_about = "Computes what a viewer may see of a subject record, and filters\n\
                  report sections for an audience, using a data-driven rule table."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Rule table JSON file replacing the built-in table.
    #[arg(long, global = true, env = "DISCLOSE_RULES", value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every policy decision at debug level (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Emit the disclosure trace to stderr as JSON lines.
    #[arg(long, global = true)]
    pub trace: bool,

    /// Maximum input file size in bytes.
    ///
    /// Applies to every input, including the rule table and consents.
    /// Default: 67108864 (64 MiB).
    #[arg(
        long,
        global = true,
        env = "DISCLOSE_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,
}
