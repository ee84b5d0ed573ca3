//! `disclose`: file and stdin front-end for the disclosure policy engine.
//!
//! All reading happens here; `disclosure-core` never touches the filesystem.
//! Views go to stdout as pretty JSON, summaries and traces go to stderr.
mod cli;
mod cmd;
mod error;
mod io;
mod logging;

use clap::Parser;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use crate::error::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

/// Loads the effective rule table and dispatches to the active subcommand.
fn run(cli: &Cli) -> Result<(), CliError> {
    let table = cmd::load_rules(cli.rules.as_deref(), cli.max_file_size)?;
    let output = cmd::Output {
        quiet: cli.quiet,
        trace: cli.trace,
    };

    match &cli.command {
        Command::Record {
            file,
            role,
            level,
            consents,
        } => {
            let content = io::read_input(file, cli.max_file_size)?;
            let consents = match consents {
                Some(path) => Some(io::read_input(
                    &PathOrStdin::Path(path.clone()),
                    cli.max_file_size,
                )?),
                None => None,
            };
            cmd::record::run(
                &content,
                consents.as_deref(),
                role,
                (*level).into(),
                &table,
                output,
            )
        }
        Command::Report { file, level } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::report::run(&content, (*level).into(), output)
        }
        Command::Rules { format } => cmd::rules::run(&table, format),
    }
}
