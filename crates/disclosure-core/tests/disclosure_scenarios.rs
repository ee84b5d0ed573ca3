//! End-to-end disclosure scenarios through the public API.
//!
//! Each test reads like a product requirement: a viewer, a record or report,
//! a level, and the exact view that must come out.
#![allow(clippy::expect_used)]

use std::borrow::Cow;

use disclosure_core::{
    ConsentRecord, DisclosureLevel, KnownRole, PolicyTable, Role, Section, SectionPolicy,
    SubjectRecord, evaluate_field_policy, evaluate_section_policy,
};
use serde_json::{Value, json};

fn env(value: Value) -> Value {
    json!({ "value": value, "metadata": { "source": "school", "verified": true } })
}

fn student() -> SubjectRecord {
    serde_json::from_value(json!({
        "id": "stu-001",
        "tenantId": "tenant-north",
        "meta": { "privacyLevel": "standard" },
        "identity": {
            "firstName": env(json!("Maya")),
            "lastName": env(json!("Okafor")),
            "dateOfBirth": env(json!("2013-09-14")),
            "nationalId": env(json!("QQ123456C"))
        },
        "education": { "school": env(json!("Riverside Academy")), "sen": env(json!(true)) },
        "careHistory": { "status": env(json!("looked after")) },
        "family": { "siblings": env(json!(2)) }
    }))
    .expect("valid record")
}

fn sections(value: Value) -> Vec<Section> {
    serde_json::from_value(value).expect("valid sections")
}

fn granted(category: &str) -> ConsentRecord {
    serde_json::from_value(json!({ "category": category, "status": "granted" }))
        .expect("valid consent")
}

fn role(r: KnownRole) -> Role {
    Role::Known(r)
}

// ---------------------------------------------------------------------------
// Field policy
// ---------------------------------------------------------------------------

#[test]
fn school_admin_loses_care_history() {
    let out = evaluate_field_policy(
        &student(),
        &role(KnownRole::SchoolAdmin),
        &[],
        DisclosureLevel::Full,
    );
    assert!(out.section("careHistory").is_none());
    assert!(out.section("education").is_some());
}

#[test]
fn epp_keeps_care_history_unchanged() {
    let record = student();
    let out = evaluate_field_policy(&record, &role(KnownRole::Epp), &[], DisclosureLevel::Full);
    assert_eq!(out.section("careHistory"), record.section("careHistory"));
}

#[test]
fn anonymized_replaces_first_name_and_removes_national_id() {
    let out = evaluate_field_policy(
        &student(),
        &role(KnownRole::Epp),
        &[],
        DisclosureLevel::Anonymized,
    );
    let json = serde_json::to_value(&out).expect("serialize");
    assert_eq!(json["identity"]["firstName"]["value"], json!("Student"));
    assert_eq!(json["identity"]["firstName"]["metadata"]["source"], json!("system"));
    assert_eq!(json["identity"]["lastName"]["value"], json!("ANON-c3fa29ad"));
    assert!(json["identity"].get("nationalId").is_none());
    assert!(json.get("careHistory").is_none());
    assert!(json.get("family").is_none());
}

#[test]
fn gov_analyst_sees_education_only_with_consent() {
    let record = student();
    let analyst = role(KnownRole::GovAnalyst);

    let without = evaluate_field_policy(&record, &analyst, &[], DisclosureLevel::Full);
    assert!(without.section("education").is_none());

    let consents = [granted("education_share")];
    let with = evaluate_field_policy(&record, &analyst, &consents, DisclosureLevel::Full);
    assert_eq!(with.section("education"), record.section("education"));
    assert!(with.section("careHistory").is_none());
}

#[test]
fn restricted_record_collapses_to_stub() {
    let mut record = student();
    record.meta.privacy_level = disclosure_core::PrivacyLevel::Restricted;
    let out = evaluate_field_policy(
        &record,
        &role(KnownRole::TenantAdmin),
        &[],
        DisclosureLevel::Full,
    );
    assert_eq!(
        serde_json::to_value(&out).expect("serialize"),
        json!({ "id": "stu-001", "tenantId": "tenant-north", "meta": { "privacyLevel": "restricted" } })
    );
}

#[test]
fn custom_table_without_rules_discloses_everything() {
    let table = PolicyTable::from_json_str(r#"{ "version": "1.0" }"#).expect("valid table");
    let record = student();
    let out = disclosure_core::FieldPolicy::new(&table).evaluate(
        &record,
        &Role::Unrecognized("Anyone".to_owned()),
        &[],
        DisclosureLevel::Full,
    );
    assert_eq!(out, record);
}

#[test]
fn concurrent_evaluation_matches_sequential() {
    let record = student();
    let expected: Vec<SubjectRecord> = KnownRole::ALL
        .into_iter()
        .map(|r| evaluate_field_policy(&record, &role(r), &[], DisclosureLevel::ParentSafe))
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = KnownRole::ALL
            .into_iter()
            .map(|r| {
                let record = &record;
                scope.spawn(move || {
                    evaluate_field_policy(record, &role(r), &[], DisclosureLevel::ParentSafe)
                })
            })
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            let got = handle.join().expect("evaluation thread");
            assert_eq!(&got, want);
        }
    });
}

// ---------------------------------------------------------------------------
// Section policy
// ---------------------------------------------------------------------------

fn report() -> Vec<Section> {
    sections(json!([
        { "id": "summary", "title": "Summary", "content": "Seen by Dr. Patel on 4/3/2024." },
        { "id": "notes", "title": "Clinician notes", "content": "Private", "internalOnly": true },
        { "id": "plan", "title": "Plan", "content": "A[[internal]]B[[/internal]]C" }
    ]))
}

#[test]
fn internal_only_section_kept_at_full_dropped_at_parent_safe() {
    let input = report();

    let full = evaluate_section_policy(&input, DisclosureLevel::Full);
    assert!(matches!(full, Cow::Borrowed(_)));
    assert_eq!(full.len(), 3);

    let parent = evaluate_section_policy(&input, DisclosureLevel::ParentSafe);
    let ids: Vec<&str> = parent.iter().map(|s| &*s.id).collect();
    assert_eq!(ids, vec!["summary", "plan"]);
    assert_eq!(parent[1].title, "Plan");
}

#[test]
fn inline_span_is_scrubbed_at_every_non_full_level() {
    let input = report();
    for level in [DisclosureLevel::ParentSafe, DisclosureLevel::Anonymized] {
        let out = evaluate_section_policy(&input, level);
        let plan = out.iter().find(|s| &*s.id == "plan").expect("plan section");
        assert_eq!(plan.content, "A [REDACTED SECTION] C", "{level}");
    }
}

#[test]
fn anonymized_report_replaces_names_and_dates() {
    let input = report();
    let out = evaluate_section_policy(&input, DisclosureLevel::Anonymized);
    assert_eq!(out[0].content, "Seen by [NAME] on [DATE].");
}

#[test]
fn section_metadata_is_preserved() {
    let input = sections(json!([
        { "id": "s1", "title": "T", "content": "x", "author": "u-7", "order": 3 }
    ]));
    let out = evaluate_section_policy(&input, DisclosureLevel::Anonymized);
    assert_eq!(
        serde_json::to_value(&*out).expect("serialize"),
        json!([{ "id": "s1", "title": "T", "content": "x", "author": "u-7", "order": 3 }])
    );
}

#[test]
fn section_evaluation_is_idempotent() {
    let input = report();
    for level in DisclosureLevel::ALL {
        let once = evaluate_section_policy(&input, level).into_owned();
        let twice = evaluate_section_policy(&once, level).into_owned();
        assert_eq!(once, twice, "{level}");
    }
}

#[test]
fn custom_pii_strategy_replaces_default() {
    let policy = SectionPolicy::with_redactor(|s: &str| s.replace("Patel", "[CLINICIAN]"));
    let input = report();
    let out = policy.evaluate(&input, DisclosureLevel::Anonymized);
    assert_eq!(out[0].content, "Seen by Dr. [CLINICIAN] on 4/3/2024.");
}
