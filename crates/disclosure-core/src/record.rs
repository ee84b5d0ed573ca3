/// Subject records and the consent records that accompany them.
///
/// A [`SubjectRecord`] keeps three reserved top-level keys as typed fields
/// (`id`, `tenantId`, `meta`) and captures every other top-level key into the
/// flattened [`SubjectRecord::sections`] map. Section payloads are schema-free
/// JSON values; see [`crate::payload`].
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::JsonObject;
use crate::enums::{ConsentStatus, PrivacyLevel};
use crate::newtypes::{RecordId, TenantId};

/// Top-level keys that are not sections and can never be addressed by a rule.
pub const RESERVED_KEYS: [&str; 3] = ["id", "tenantId", "meta"];

// ---------------------------------------------------------------------------
// SubjectRecord
// ---------------------------------------------------------------------------

/// Record-wide metadata (`meta`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    /// Record-wide privacy attribute. Missing means `standard`.
    #[serde(default)]
    pub privacy_level: PrivacyLevel,

    /// Any other metadata keys, carried through unchanged.
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// A sensitive entity keyed by semantic sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    /// Identifier of the subject.
    pub id: RecordId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Record-wide metadata.
    #[serde(default)]
    pub meta: RecordMeta,
    /// Every other top-level key (`identity`, `education`, `family`, ...).
    #[serde(flatten)]
    pub sections: JsonObject,
}

impl SubjectRecord {
    /// Builds the suppressed form of this record: `id`, `tenantId` and
    /// `meta.privacyLevel` only.
    pub fn stub(&self) -> SubjectRecord {
        SubjectRecord {
            id: self.id.clone(),
            tenant_id: self.tenant_id.clone(),
            meta: RecordMeta {
                privacy_level: self.meta.privacy_level,
                extra: JsonObject::new(),
            },
            sections: JsonObject::new(),
        }
    }

    /// Returns the named top-level section, if present.
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }
}

// ---------------------------------------------------------------------------
// ConsentRecord
// ---------------------------------------------------------------------------

/// An entry of the externally owned consent ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    /// Consent category, e.g. `education_share`.
    pub category: String,
    /// Whether consent is currently granted.
    pub status: ConsentStatus,
    /// The subject the consent was given for. A consent without a subject
    /// applies to whichever record it is evaluated against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<RecordId>,
    /// Other ledger fields (timestamps, grantor, ...), carried through.
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ConsentRecord {
    /// Returns `true` if this record grants `category` for the record `subject`.
    pub fn grants(&self, category: &str, subject: &RecordId) -> bool {
        self.status == ConsentStatus::Granted
            && self.category == category
            && self.subject_id.as_ref().is_none_or(|s| s == subject)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use serde_json::json;

    use super::*;

    fn record(value: serde_json::Value) -> SubjectRecord {
        serde_json::from_value(value).expect("valid record")
    }

    fn consent(value: serde_json::Value) -> ConsentRecord {
        serde_json::from_value(value).expect("valid consent")
    }

    #[test]
    fn record_splits_reserved_keys_from_sections() {
        let r = record(json!({
            "id": "stu-1",
            "tenantId": "t-1",
            "meta": { "privacyLevel": "restricted", "createdBy": "u-9" },
            "identity": { "firstName": { "value": "Ada", "metadata": {} } },
            "education": {}
        }));
        assert_eq!(&*r.id, "stu-1");
        assert!(r.meta.privacy_level.is_restricted());
        assert!(r.meta.extra.contains_key("createdBy"));
        assert_eq!(
            r.sections.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["education", "identity"]
        );
    }

    #[test]
    fn missing_meta_defaults_to_standard() {
        let r = record(json!({ "id": "stu-1", "tenantId": "t-1" }));
        assert_eq!(r.meta.privacy_level, PrivacyLevel::Standard);
        assert!(r.sections.is_empty());
    }

    #[test]
    fn null_privacy_level_reads_as_missing() {
        let r = record(json!({ "id": "stu-1", "tenantId": "t-1", "meta": { "privacyLevel": null } }));
        assert_eq!(r.meta.privacy_level, PrivacyLevel::Standard);

        let r = record(json!({ "id": "stu-1", "tenantId": "t-1", "meta": { "privacyLevel": 2 } }));
        assert!(r.meta.privacy_level.is_restricted());
    }

    #[test]
    fn record_without_id_is_rejected() {
        let bad: Result<SubjectRecord, _> = serde_json::from_value(json!({ "tenantId": "t-1" }));
        assert!(bad.is_err());
        let bad: Result<SubjectRecord, _> =
            serde_json::from_value(json!({ "id": "", "tenantId": "t-1" }));
        assert!(bad.is_err());
    }

    #[test]
    fn record_serializes_back_to_camel_case() {
        let r = record(json!({
            "id": "stu-1",
            "tenantId": "t-1",
            "meta": { "privacyLevel": "standard" },
            "health": { "notes": "x" }
        }));
        let out = serde_json::to_value(&r).expect("serialize");
        assert_eq!(
            out,
            json!({
                "id": "stu-1",
                "tenantId": "t-1",
                "meta": { "privacyLevel": "standard" },
                "health": { "notes": "x" }
            })
        );
    }

    #[test]
    fn section_payloads_keep_numeric_fidelity() {
        let input = json!({
            "id": "stu-1",
            "tenantId": "t-1",
            "meta": { "privacyLevel": "standard" },
            "health": { "counts": [u64::MAX, -3, 2.5, null] }
        });
        let out = serde_json::to_value(record(input.clone())).expect("serialize");
        assert_eq!(out, input);
    }

    #[test]
    fn stub_keeps_identity_and_privacy_level_only() {
        let r = record(json!({
            "id": "stu-1",
            "tenantId": "t-1",
            "meta": { "privacyLevel": "restricted", "note": "keep out" },
            "identity": {}
        }));
        let out = serde_json::to_value(r.stub()).expect("serialize");
        assert_eq!(
            out,
            json!({ "id": "stu-1", "tenantId": "t-1", "meta": { "privacyLevel": "restricted" } })
        );
    }

    #[test]
    fn consent_grant_matching() {
        let subject = RecordId::try_from("stu-1").expect("valid id");
        let other = RecordId::try_from("stu-2").expect("valid id");

        let c = consent(json!({ "category": "education_share", "status": "granted" }));
        assert!(c.grants("education_share", &subject));
        assert!(!c.grants("health_share", &subject));

        let c = consent(json!({
            "category": "education_share",
            "status": "granted",
            "subjectId": "stu-1"
        }));
        assert!(c.grants("education_share", &subject));
        assert!(!c.grants("education_share", &other));

        let c = consent(json!({ "category": "education_share", "status": "revoked" }));
        assert!(!c.grants("education_share", &subject));
    }
}
