/// Disclosure traces: what each evaluator did to produce a view.
///
/// The engine persists nothing. A caller that must keep an audit trail asks
/// for the traced variant of an evaluator and records the returned actions
/// itself. Actions name paths and section ids only, never values.
use serde::Serialize;

use crate::newtypes::SectionId;
use crate::record::SubjectRecord;
use crate::section::Section;

/// The field evaluator stage that took an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Record-level privacy gate.
    RecordGate,
    /// Rule table.
    FieldRule,
    /// Disclosure level transform.
    Level,
    /// Consent-gated disclosure.
    Consent,
}

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldActionKind {
    /// The whole record was reduced to its stub.
    Suppressed,
    /// The key was deleted.
    Removed,
    /// The envelope value was replaced with the redaction sentinel.
    Masked,
    /// The value was replaced with a pseudonym.
    Replaced,
    /// A list of involved individuals was emptied.
    Cleared,
}

/// One action taken by the field evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldAction {
    /// Stage that took the action.
    pub stage: Stage,
    /// Affected path. Array elements appear as `discipline[0].staffMember`.
    pub path: String,
    /// What was done.
    pub kind: FieldActionKind,
}

impl FieldAction {
    pub(crate) fn new(stage: Stage, path: impl Into<String>, kind: FieldActionKind) -> Self {
        Self {
            stage,
            path: path.into(),
            kind,
        }
    }
}

/// Output of the traced field evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDisclosure {
    /// The redacted record.
    pub record: SubjectRecord,
    /// Actions in the order they were taken.
    pub actions: Vec<FieldAction>,
}

impl FieldDisclosure {
    /// Returns `true` if the record-level gate suppressed the record.
    pub fn is_suppressed(&self) -> bool {
        self.actions
            .iter()
            .any(|a| a.kind == FieldActionKind::Suppressed)
    }

    /// Returns the actions taken by `stage`.
    pub fn actions_in(&self, stage: Stage) -> impl Iterator<Item = &FieldAction> {
        self.actions.iter().filter(move |a| a.stage == stage)
    }
}

/// Output of the traced section evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionDisclosure {
    /// The filtered sections, in input order.
    pub sections: Vec<Section>,
    /// Ids of sections dropped as internal-only.
    pub dropped: Vec<SectionId>,
    /// Ids of sections whose content was rewritten.
    pub rewritten: Vec<SectionId>,
}
