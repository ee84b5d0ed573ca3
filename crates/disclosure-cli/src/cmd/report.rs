//! Implementation of `disclose report <file> --level <level>`.
//!
//! Reads a JSON array of report sections and writes the filtered array to
//! stdout. With `--trace`, one JSON line per dropped or rewritten section is
//! written to stderr.
use disclosure_core::{DisclosureLevel, Section, SectionDisclosure, SectionId, SectionPolicy};
use serde::Serialize;

use crate::cmd::{Output, parse_json, write_json};
use crate::error::CliError;

/// A trace line for one affected section.
#[derive(Debug, Serialize)]
pub struct SectionTrace<'a> {
    /// The section id.
    pub section: &'a SectionId,
    /// `dropped` or `rewritten`.
    pub action: &'static str,
}

/// Runs the `report` command.
pub fn run(content: &str, level: DisclosureLevel, output: Output) -> Result<(), CliError> {
    let sections: Vec<Section> = parse_json(content, "report")?;
    let disclosure = SectionPolicy::new().evaluate_traced(&sections, level);

    output.summary(&format!(
        "report filtered: level={level}, sections_in={}, sections_out={}, dropped={}, rewritten={}",
        sections.len(),
        disclosure.sections.len(),
        disclosure.dropped.len(),
        disclosure.rewritten.len()
    ))?;
    output.trace_lines(&trace_entries(&disclosure))?;
    write_json(&disclosure.sections)
}

/// Flattens the dropped and rewritten ids into trace lines.
pub fn trace_entries(disclosure: &SectionDisclosure) -> Vec<SectionTrace<'_>> {
    let dropped = disclosure.dropped.iter().map(|id| SectionTrace {
        section: id,
        action: "dropped",
    });
    let rewritten = disclosure.rewritten.iter().map(|id| SectionTrace {
        section: id,
        action: "rewritten",
    });
    dropped.chain(rewritten).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn trace_lists_dropped_then_rewritten() {
        let sections: Vec<Section> = parse_json(
            r#"[
                { "id": "a", "content": "x [[internal]]y[[/internal]]" },
                { "id": "b", "content": "hidden", "internalOnly": true },
                { "id": "c", "content": "plain" }
            ]"#,
            "report",
        )
        .expect("valid report");
        let disclosure = SectionPolicy::new().evaluate_traced(&sections, DisclosureLevel::ParentSafe);
        let lines = serde_json::to_value(trace_entries(&disclosure)).expect("serialize");
        assert_eq!(
            lines,
            json!([
                { "section": "b", "action": "dropped" },
                { "section": "a", "action": "rewritten" }
            ])
        );
    }
}
