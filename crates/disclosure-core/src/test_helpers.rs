//! Shared constructors for unit-test fixtures.
//!
//! Compiled only in test builds. Integration tests in
//! `crates/disclosure-core/tests/` define their own helpers because they link
//! against the non-test library build where this module is not available.
#![allow(clippy::expect_used)]

use serde_json::{Value, json};

use crate::enums::{KnownRole, Role};
use crate::record::{ConsentRecord, SubjectRecord};
use crate::section::Section;

/// Wraps `value` in an envelope with school-sourced, unverified metadata.
pub fn env(value: Value) -> Value {
    json!({ "value": value, "metadata": { "source": "school", "verified": false } })
}

/// Deserializes a record, panicking on invalid input (test-only).
pub fn record(value: Value) -> SubjectRecord {
    serde_json::from_value(value).expect("valid SubjectRecord")
}

/// A fully populated standard-privacy record touching every ruled section.
pub fn full_record() -> SubjectRecord {
    record(json!({
        "id": "stu-001",
        "tenantId": "tenant-a",
        "meta": { "privacyLevel": "standard" },
        "identity": {
            "firstName": env(json!("Ada")),
            "lastName": env(json!("Lovelace")),
            "dateOfBirth": env(json!("2012-05-01")),
            "nationalId": env(json!("AB123456C")),
            "preferredName": "Addie"
        },
        "education": {
            "school": env(json!("Hillside Primary")),
            "yearGroup": env(json!(6))
        },
        "family": {
            "guardians": [ { "name": env(json!("Anne")) } ]
        },
        "health": {
            "conditions": env(json!(["asthma"]))
        },
        "careHistory": {
            "placements": [ { "from": "2019-01-01", "carer": "Foster Team B" } ]
        },
        "discipline": [
            {
                "date": "2024-01-10",
                "summary": env(json!("Disrupted lesson")),
                "involvedStudents": ["stu-002", "stu-003"],
                "staffMember": env(json!("Mr. Brown"))
            },
            {
                "date": "2024-02-02",
                "summary": env(json!("Late to class")),
                "witnesses": env(json!(["stu-004"])),
                "reportedBy": "Ms. Green"
            }
        ],
        "address": {
            "line1": env(json!("1 High Street"))
        }
    }))
}

/// Deserializes a consent record, panicking on invalid input (test-only).
pub fn consent(category: &str, status: &str) -> ConsentRecord {
    serde_json::from_value(json!({ "category": category, "status": status }))
        .expect("valid ConsentRecord")
}

/// Shorthand for a known role.
pub fn role(r: KnownRole) -> Role {
    Role::Known(r)
}

/// Builds a section, panicking on an invalid id (test-only).
pub fn section(id: &str, content: &str, internal_only: bool) -> Section {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("Title {id}"),
        "content": content,
        "internalOnly": internal_only
    }))
    .expect("valid Section")
}
