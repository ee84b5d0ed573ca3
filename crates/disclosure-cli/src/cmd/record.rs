//! Implementation of `disclose record <file> --role <role>`.
//!
//! Reads a subject record (and optionally a consent list), computes the view
//! for the role at the requested level, and writes it to stdout. A summary
//! line goes to stderr, followed by the action trace when `--trace` is set.
use disclosure_core::{
    ConsentRecord, DisclosureLevel, FieldDisclosure, FieldPolicy, PolicyTable, Role,
    SubjectRecord,
};
use tracing::warn;

use crate::cmd::{Output, parse_json, write_json};
use crate::error::CliError;

/// Runs the `record` command.
///
/// # Errors
///
/// [`CliError::ParseFailed`] when the record or consent list is not valid.
pub fn run(
    content: &str,
    consents: Option<&str>,
    role: &Role,
    level: DisclosureLevel,
    table: &PolicyTable,
    output: Output,
) -> Result<(), CliError> {
    let disclosure = disclose(content, consents, role, level, table)?;

    output.summary(&format!(
        "disclosure complete: record={}, role={role}, level={level}, actions={}, suppressed={}",
        disclosure.record.id,
        disclosure.actions.len(),
        disclosure.is_suppressed()
    ))?;
    output.trace_lines(&disclosure.actions)?;
    write_json(&disclosure.record)
}

/// Parses the inputs and evaluates the field policy.
pub fn disclose(
    content: &str,
    consents: Option<&str>,
    role: &Role,
    level: DisclosureLevel,
    table: &PolicyTable,
) -> Result<FieldDisclosure, CliError> {
    let record: SubjectRecord = parse_json(content, "record")?;
    let consents: Vec<ConsentRecord> = match consents {
        Some(text) => parse_json(text, "consents")?,
        None => Vec::new(),
    };

    if let Role::Unrecognized(name) = role {
        warn!(role = %name, "unrecognized role; evaluating as least privileged");
    }

    Ok(FieldPolicy::new(table).evaluate_traced(&record, role, &consents, level))
}
