//! Implementation of `disclose rules`.
//!
//! Prints the effective rule table: the built-in one, or the file given with
//! `--rules`. The JSON form is a loadable rule table document.
use std::io::Write as _;

use disclosure_core::{KnownRole, PolicyTable, RoleSet};

use crate::OutputFormat;
use crate::cmd::write_json;
use crate::error::CliError;

/// Runs the `rules` command.
pub fn run(table: &PolicyTable, format: &OutputFormat) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(&table.to_document()),
        OutputFormat::Human => {
            let text = render_human(table);
            let stdout = std::io::stdout();
            stdout.lock().write_all(text.as_bytes()).map_err(|e| {
                CliError::IoError {
                    source: "stdout".to_owned(),
                    detail: e.to_string(),
                }
            })
        }
    }
}

fn role_list(set: &RoleSet) -> String {
    if set.is_empty() {
        return "(nobody)".to_owned();
    }
    set.iter().map(KnownRole::as_str).collect::<Vec<_>>().join(", ")
}

/// Renders the table as an aligned plain-text listing.
pub fn render_human(table: &PolicyTable) -> String {
    let width = table
        .rules()
        .iter()
        .map(|r| r.path.len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        format!("privileged roles: {}", role_list(table.privileged_roles())),
        String::new(),
        format!("rules ({}):", table.rules().len()),
    ];
    lines.extend(
        table
            .rules()
            .iter()
            .map(|rule| format!("  {:<width$}  {}", &*rule.path, role_list(&rule.allowed))),
    );
    lines.push(String::new());
    lines.push(format!("consent gates ({}):", table.consent_gates().len()));
    lines.extend(table.consent_gates().iter().map(|gate| {
        format!(
            "  {} sees {} only with a granted {} consent",
            gate.role, gate.section, gate.category
        )
    }));
    lines.push(String::new());
    lines.push("paths without a rule are visible to every role".to_owned());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
