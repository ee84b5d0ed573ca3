//! Integration tests for `disclose report`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{Value, json};

fn disclose_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("disclose");
    path
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("../../tests/fixtures");
    path.push(name);
    path.to_str().expect("utf-8 path").to_owned()
}

fn report(args: &[&str]) -> Output {
    Command::new(disclose_bin())
        .arg("report")
        .arg(fixture("report-sections.json"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run disclose report")
}

fn sections(out: &Output) -> Vec<Value> {
    assert_eq!(
        out.status.code(),
        Some(0),
        "expected exit 0; stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).expect("stdout is a JSON array")
}

fn ids(sections: &[Value]) -> Vec<&str> {
    sections
        .iter()
        .map(|s| s["id"].as_str().expect("id"))
        .collect()
}

#[test]
fn full_level_returns_every_section_unchanged() {
    let out = sections(&report(&[]));
    let input: Vec<Value> = serde_json::from_str(
        &std::fs::read_to_string(fixture("report-sections.json")).expect("read fixture"),
    )
    .expect("fixture is JSON");
    assert_eq!(out, input);
}

#[test]
fn parent_safe_drops_internal_sections_and_spans() {
    let out = sections(&report(&["--level", "parent-safe"]));
    assert_eq!(ids(&out), vec!["summary", "plan"]);
    let plan = out[1]["content"].as_str().expect("content");
    assert!(plan.contains("[REDACTED SECTION]"), "{plan}");
    assert!(!plan.contains("funding"), "{plan}");
    assert_eq!(out[0]["content"], json!("Assessed by Dr. Patel on 4/3/2024."));
}

#[test]
fn anonymized_redacts_names_and_dates_and_keeps_metadata() {
    let out = sections(&report(&["--level", "anonymized"]));
    assert_eq!(out[0]["content"], json!("Assessed by [NAME] on [DATE]."));
    assert_eq!(out[0]["author"], json!("u-17"));
    assert_eq!(out[0]["title"], json!("Summary"));
}

#[test]
fn summary_and_trace_go_to_stderr() {
    let out = report(&["--level", "parent-safe", "--trace"]);
    assert_eq!(out.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains(
            "report filtered: level=PARENT_SAFE, sections_in=3, sections_out=2, dropped=1, rewritten=1"
        ),
        "stderr: {stderr}"
    );
    assert!(
        stderr.contains(r#"{"section":"clinician-notes","action":"dropped"}"#),
        "stderr: {stderr}"
    );
    assert!(
        stderr.contains(r#"{"section":"plan","action":"rewritten"}"#),
        "stderr: {stderr}"
    );
}

#[test]
fn record_input_is_rejected_as_a_report() {
    let out = Command::new(disclose_bin())
        .args(["report", &fixture("student-standard.json")])
        .output()
        .expect("run disclose report");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error: parse failed: report:"), "stderr: {stderr}");
}
