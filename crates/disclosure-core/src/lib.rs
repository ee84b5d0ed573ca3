#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod enums;
pub mod envelope;
pub mod field_policy;
pub mod newtypes;
pub mod payload;
pub mod pii;
pub mod policy;
pub mod pseudonym;
pub mod record;
mod rule_tree;
pub mod section;
pub mod section_policy;
pub mod trace;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use enums::{ConsentStatus, DisclosureLevel, KnownRole, PrivacyLevel, Role};
pub use envelope::{REDACTED, is_envelope};
pub use field_policy::{FieldPolicy, evaluate_field_policy, evaluate_field_policy_traced};
pub use newtypes::{FieldPath, NewtypeError, RecordId, SectionId, TenantId};
pub use payload::JsonObject;
pub use pii::{PatternPiiRedactor, PiiRedactor};
pub use policy::{
    ConsentGate, FieldRule, PolicyDocument, PolicyTable, PolicyTableError, RoleSet,
};
pub use record::{ConsentRecord, RecordMeta, SubjectRecord};
pub use section::Section;
pub use section_policy::{
    INTERNAL_SPAN_PLACEHOLDER, SectionPolicy, evaluate_section_policy, scrub_internal_spans,
};
pub use trace::{FieldAction, FieldActionKind, FieldDisclosure, SectionDisclosure, Stage};

/// Returns the current version of the disclosure-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
