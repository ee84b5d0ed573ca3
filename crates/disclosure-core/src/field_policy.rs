/// Field Policy Evaluator: computes the view of a subject record for a viewer.
///
/// Evaluation is a pure function of `(record, role, consents, level)` and runs
/// four stages, strictly in order:
///
/// 1. **Record gate.** A `restricted` record seen by a role outside the table's
///    privileged set is reduced to its stub (`id`, `tenantId`,
///    `meta.privacyLevel`). Nothing else runs.
/// 2. **Field rules.** The record's sections are walked together with the
///    compiled rule trie. A denied envelope is masked (value replaced with
///    [`REDACTED`], metadata kept); any other denied value is removed. Keys
///    without a rule are copied through (default-allow).
/// 3. **Level transform.** Levels are cumulative: `PARENT_SAFE` scrubs the
///    `discipline` section, and `ANONYMIZED` does that and then replaces name
///    fields with pseudonyms and removes direct identifiers.
/// 4. **Consent gates.** For each gate naming the viewer's role, the gated
///    section is removed unless a `granted` consent for its category applies
///    to this record.
///
/// The input record is never modified. The output is built fresh in stage 2,
/// and stages 3 and 4 edit that owned copy in place.
use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::enums::{DisclosureLevel, Role};
use crate::envelope::{
    METADATA_KEY, REDACTED, VALUE_KEY, is_envelope, is_masked, mask_envelope, system_envelope,
};
use crate::newtypes::RecordId;
use crate::payload::{JsonObject, join_index, join_key};
use crate::policy::PolicyTable;
use crate::pseudonym::{FIRST_NAME_PSEUDONYM, surname_token};
use crate::record::{ConsentRecord, SubjectRecord};
use crate::rule_tree::RuleNode;
use crate::trace::{FieldAction, FieldActionKind, FieldDisclosure, Stage};

/// Section scrubbed at `PARENT_SAFE` and above.
pub const DISCIPLINE_SECTION: &str = "discipline";

/// Keys inside a discipline entry listing other people involved; emptied.
pub const INVOLVED_KEYS: [&str; 3] = ["involvedStudents", "involvedParties", "witnesses"];

/// Keys inside a discipline entry naming staff; masked.
pub const STAFF_KEYS: [&str; 3] = ["staffMember", "reportedBy", "recordedBy"];

/// Section holding name and identifier fields.
pub const IDENTITY_SECTION: &str = "identity";

/// Fields of the identity section removed when anonymized.
pub const ANONYMIZED_IDENTITY_FIELDS: [&str; 2] = ["dateOfBirth", "nationalId"];

/// Top-level sections removed when anonymized.
pub const ANONYMIZED_SECTIONS: [&str; 3] = ["family", "careHistory", "address"];

/// Path recorded for actions that affect the whole record.
const WHOLE_RECORD: &str = "*";

// ---------------------------------------------------------------------------
// FieldPolicy
// ---------------------------------------------------------------------------

/// Field evaluator bound to a rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldPolicy<'t> {
    table: &'t PolicyTable,
}

impl FieldPolicy<'static> {
    /// Creates an evaluator over [`PolicyTable::builtin`].
    pub fn builtin() -> Self {
        Self::new(PolicyTable::builtin())
    }
}

impl<'t> FieldPolicy<'t> {
    /// Creates an evaluator over `table`.
    pub fn new(table: &'t PolicyTable) -> Self {
        Self { table }
    }

    /// Returns the rule table this evaluator applies.
    pub fn table(&self) -> &'t PolicyTable {
        self.table
    }

    /// Returns the view of `record` for `role`.
    pub fn evaluate(
        &self,
        record: &SubjectRecord,
        role: &Role,
        consents: &[ConsentRecord],
        level: DisclosureLevel,
    ) -> SubjectRecord {
        self.evaluate_traced(record, role, consents, level).record
    }

    /// Returns the view of `record` for `role` along with every action taken.
    pub fn evaluate_traced(
        &self,
        record: &SubjectRecord,
        role: &Role,
        consents: &[ConsentRecord],
        level: DisclosureLevel,
    ) -> FieldDisclosure {
        let mut actions = Vec::new();

        if record.meta.privacy_level.is_restricted() && !self.table.is_privileged(role) {
            debug!(record = %record.id, role = %role, "record suppressed by privacy gate");
            actions.push(FieldAction::new(
                Stage::RecordGate,
                WHOLE_RECORD,
                FieldActionKind::Suppressed,
            ));
            return FieldDisclosure {
                record: record.stub(),
                actions,
            };
        }

        let mut sections = filter_map(
            &record.sections,
            self.table.tree().roots(),
            role,
            "",
            &mut actions,
        );

        if level.applies(DisclosureLevel::ParentSafe) {
            if let Some(discipline) = sections.get_mut(DISCIPLINE_SECTION) {
                scrub_discipline(discipline, DISCIPLINE_SECTION, &mut actions);
            }
        }
        if level.applies(DisclosureLevel::Anonymized) {
            anonymize(&mut sections, &record.id, &mut actions);
        }

        if let Some(known) = role.known() {
            for gate in self.table.consent_gates().iter().filter(|g| g.role == known) {
                let granted = consents
                    .iter()
                    .any(|c| c.grants(&gate.category, &record.id));
                if !granted && sections.remove(&gate.section).is_some() {
                    actions.push(FieldAction::new(
                        Stage::Consent,
                        gate.section.as_str(),
                        FieldActionKind::Removed,
                    ));
                }
            }
        }

        debug!(
            record = %record.id,
            role = %role,
            level = %level,
            actions = actions.len(),
            "evaluated field policy"
        );

        FieldDisclosure {
            record: SubjectRecord {
                id: record.id.clone(),
                tenant_id: record.tenant_id.clone(),
                meta: record.meta.clone(),
                sections,
            },
            actions,
        }
    }
}

/// Returns the view of `record` for `role` under the built-in rule table.
pub fn evaluate_field_policy(
    record: &SubjectRecord,
    role: &Role,
    consents: &[ConsentRecord],
    level: DisclosureLevel,
) -> SubjectRecord {
    FieldPolicy::builtin().evaluate(record, role, consents, level)
}

/// Traced form of [`evaluate_field_policy`].
pub fn evaluate_field_policy_traced(
    record: &SubjectRecord,
    role: &Role,
    consents: &[ConsentRecord],
    level: DisclosureLevel,
) -> FieldDisclosure {
    FieldPolicy::builtin().evaluate_traced(record, role, consents, level)
}

// ---------------------------------------------------------------------------
// Stage 2: field rules
// ---------------------------------------------------------------------------

/// Builds the filtered copy of `map` under the trie level `rules`.
fn filter_map(
    map: &JsonObject,
    rules: &BTreeMap<String, RuleNode>,
    role: &Role,
    prefix: &str,
    actions: &mut Vec<FieldAction>,
) -> JsonObject {
    let mut out = JsonObject::new();
    for (key, value) in map {
        let Some(node) = rules.get(key) else {
            out.insert(key.clone(), value.clone());
            continue;
        };
        let path = join_key(prefix, key);

        if node.denies(role) {
            if is_envelope(value) {
                out.insert(key.clone(), mask_envelope(value));
                actions.push(FieldAction::new(Stage::FieldRule, path, FieldActionKind::Masked));
            } else {
                actions.push(FieldAction::new(Stage::FieldRule, path, FieldActionKind::Removed));
            }
            continue;
        }

        out.insert(key.clone(), filter_value(value, &node.children, role, &path, actions));
    }
    out
}

/// Applies the deeper rules `rules` to a permitted value.
///
/// Rules see through arrays and envelopes: every element of an array is
/// filtered under the same trie level, and an envelope has its wrapped value
/// filtered while its metadata is copied.
fn filter_value(
    value: &Value,
    rules: &BTreeMap<String, RuleNode>,
    role: &Role,
    path: &str,
    actions: &mut Vec<FieldAction>,
) -> Value {
    if rules.is_empty() {
        return value.clone();
    }
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| filter_value(item, rules, role, &join_index(path, i), actions))
                .collect(),
        ),
        Value::Object(map) if is_envelope(value) => {
            let mut envelope = JsonObject::new();
            for (key, inner) in map {
                let kept = if key == VALUE_KEY {
                    filter_value(inner, rules, role, path, actions)
                } else {
                    inner.clone()
                };
                envelope.insert(key.clone(), kept);
            }
            Value::Object(envelope)
        }
        Value::Object(map) => Value::Object(filter_map(map, rules, role, path, actions)),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => value.clone(),
    }
}

// ---------------------------------------------------------------------------
// Stage 3: level transforms
// ---------------------------------------------------------------------------

/// Empties involved-people lists and masks staff fields at any depth of the
/// discipline section. Substantive content is left alone.
fn scrub_discipline(value: &mut Value, path: &str, actions: &mut Vec<FieldAction>) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                scrub_discipline(item, &join_index(path, i), actions);
            }
        }
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                let child_path = join_key(path, key);
                if INVOLVED_KEYS.contains(&key.as_str()) {
                    if clear_list(child) {
                        actions.push(FieldAction::new(
                            Stage::Level,
                            child_path,
                            FieldActionKind::Cleared,
                        ));
                    }
                } else if STAFF_KEYS.contains(&key.as_str()) {
                    if mask_staff(child) {
                        actions.push(FieldAction::new(
                            Stage::Level,
                            child_path,
                            FieldActionKind::Masked,
                        ));
                    }
                } else if key != METADATA_KEY {
                    scrub_discipline(child, &child_path, actions);
                }
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Empties a list of involved people. Returns `true` if anything changed.
fn clear_list(value: &mut Value) -> bool {
    if is_envelope(value) {
        return match value.as_object_mut().and_then(|m| m.get_mut(VALUE_KEY)) {
            Some(inner) => clear_list(inner),
            None => false,
        };
    }
    match value {
        Value::Array(items) => {
            let changed = !items.is_empty();
            items.clear();
            changed
        }
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
            *value = Value::Array(Vec::new());
            true
        }
    }
}

/// Masks a staff-identifying value. Returns `true` if anything changed.
fn mask_staff(value: &mut Value) -> bool {
    if is_envelope(value) {
        if is_masked(value) {
            return false;
        }
        let masked = mask_envelope(value);
        *value = masked;
        return true;
    }
    match value {
        Value::Null => false,
        Value::String(s) if s.as_str() == REDACTED => false,
        Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Array(_)
        | Value::Object(_) => {
            *value = Value::from(REDACTED);
            true
        }
    }
}

/// Replaces name fields with pseudonyms and removes direct identifiers.
///
/// Only fields that are present are touched; nothing is created.
fn anonymize(sections: &mut JsonObject, id: &RecordId, actions: &mut Vec<FieldAction>) {
    if let Some(identity) = sections
        .get_mut(IDENTITY_SECTION)
        .and_then(Value::as_object_mut)
    {
        if let Some(first) = identity.get_mut("firstName") {
            *first = system_envelope(FIRST_NAME_PSEUDONYM);
            actions.push(FieldAction::new(
                Stage::Level,
                "identity.firstName",
                FieldActionKind::Replaced,
            ));
        }
        if let Some(last) = identity.get_mut("lastName") {
            *last = system_envelope(surname_token(id));
            actions.push(FieldAction::new(
                Stage::Level,
                "identity.lastName",
                FieldActionKind::Replaced,
            ));
        }
        for field in ANONYMIZED_IDENTITY_FIELDS {
            if identity.remove(field).is_some() {
                actions.push(FieldAction::new(
                    Stage::Level,
                    join_key(IDENTITY_SECTION, field),
                    FieldActionKind::Removed,
                ));
            }
        }
    }

    for section in ANONYMIZED_SECTIONS {
        if sections.remove(section).is_some() {
            actions.push(FieldAction::new(
                Stage::Level,
                section,
                FieldActionKind::Removed,
            ));
        }
    }
}
