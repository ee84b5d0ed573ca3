/// The policy rule table: field path to the set of roles permitted to see it.
///
/// The table is data, not code. It is loaded from a JSON document (the
/// built-in one ships as `policy/default_rules.json`), validated once, and
/// compiled into a [`RuleTree`] that the field evaluator walks alongside the
/// record.
///
/// # Default-allow
///
/// A path with no entry in the table is **not restricted**: every role sees
/// it. Forgetting to add a rule for a new sensitive field therefore discloses
/// that field to everyone. This is the documented behavior of the table and is
/// exercised by tests; protect new sections by adding them here.
///
/// Rules hold flat allow-lists. There is no role hierarchy: a role sees a path
/// only if it is listed for that path. An empty list means no role may see it.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enums::{KnownRole, Role};
use crate::newtypes::{FieldPath, NewtypeError};
use crate::record::RESERVED_KEYS;
use crate::rule_tree::RuleTree;

/// The only rule table format version this crate reads.
pub const SUPPORTED_VERSION: &str = "1.0";

/// Source of the built-in rule table.
pub const DEFAULT_RULES_JSON: &str = include_str!("policy/default_rules.json");

static BUILTIN: LazyLock<PolicyTable> = LazyLock::new(|| {
    PolicyTable::from_json_str(DEFAULT_RULES_JSON)
        .unwrap_or_else(|e| unreachable!("built-in rule table is valid: {e}"))
});

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while loading a rule table.
#[derive(Debug)]
pub enum PolicyTableError {
    /// The document is not valid JSON or does not have the table's shape.
    Parse(serde_json::Error),
    /// The `version` field names a format this crate does not read.
    UnsupportedVersion(String),
    /// A rule path or consent-gate section is not a valid field path.
    InvalidPath(NewtypeError),
    /// A rule path starts with a reserved top-level key.
    ReservedPath(String),
    /// The same path appears in more than one rule.
    DuplicatePath(String),
    /// A role name is not a known role.
    UnknownRole {
        /// Where the name appeared (`privileged_roles`, a rule path, ...).
        context: String,
        /// The unrecognised name.
        role: String,
    },
    /// A consent gate is malformed.
    InvalidConsentGate(String),
}

impl fmt::Display for PolicyTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "rule table is not valid JSON: {e}"),
            Self::UnsupportedVersion(v) => write!(
                f,
                "unsupported rule table version {v:?}; only {SUPPORTED_VERSION:?} is supported"
            ),
            Self::InvalidPath(e) => write!(f, "invalid rule path: {e}"),
            Self::ReservedPath(p) => {
                write!(f, "rule path {p:?} addresses a reserved key (id, tenantId, meta)")
            }
            Self::DuplicatePath(p) => write!(f, "duplicate rule for path {p:?}"),
            Self::UnknownRole { context, role } => {
                write!(f, "unknown role {role:?} in {context}")
            }
            Self::InvalidConsentGate(msg) => write!(f, "invalid consent gate: {msg}"),
        }
    }
}

impl std::error::Error for PolicyTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::InvalidPath(e) => Some(e),
            Self::UnsupportedVersion(_)
            | Self::ReservedPath(_)
            | Self::DuplicatePath(_)
            | Self::UnknownRole { .. }
            | Self::InvalidConsentGate(_) => None,
        }
    }
}

impl From<serde_json::Error> for PolicyTableError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<NewtypeError> for PolicyTableError {
    fn from(e: NewtypeError) -> Self {
        Self::InvalidPath(e)
    }
}

// ---------------------------------------------------------------------------
// RoleSet
// ---------------------------------------------------------------------------

/// A flat allow-list of known roles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleSet(BTreeSet<KnownRole>);

impl RoleSet {
    /// Creates an empty set, which permits nobody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `role` is listed. Unrecognised roles are never listed.
    pub fn permits(&self, role: &Role) -> bool {
        match role {
            Role::Known(k) => self.0.contains(k),
            Role::Unrecognized(_) => false,
        }
    }

    /// Returns `true` if the known role is listed.
    pub fn contains(&self, role: KnownRole) -> bool {
        self.0.contains(&role)
    }

    /// Iterates the listed roles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = KnownRole> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of listed roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no role is listed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<KnownRole> for RoleSet {
    fn from_iter<I: IntoIterator<Item = KnownRole>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Rules and consent gates
// ---------------------------------------------------------------------------

/// One entry of the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// The field or section the rule addresses.
    pub path: FieldPath,
    /// Roles permitted to see it.
    pub allowed: RoleSet,
}

/// A section that a role may only see with a granted consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentGate {
    /// The gated viewer role.
    pub role: KnownRole,
    /// Consent category that unlocks the section.
    pub category: String,
    /// Top-level section removed when no consent is granted.
    pub section: String,
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// JSON shape of a rule table document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDocument {
    /// Format version; must be [`SUPPORTED_VERSION`].
    pub version: String,
    /// Roles that pass the record-level privacy gate.
    #[serde(default)]
    pub privileged_roles: Vec<String>,
    /// Field path to permitted role names.
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<String>>,
    /// Consent-gated sections.
    #[serde(default)]
    pub consent_gates: Vec<ConsentGateDocument>,
}

/// JSON shape of a consent gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsentGateDocument {
    /// Role name of the gated viewer.
    pub role: String,
    /// Consent category.
    pub category: String,
    /// Gated top-level section.
    pub section: String,
}

fn parse_role(name: &str, context: &str) -> Result<KnownRole, PolicyTableError> {
    KnownRole::from_name(name).ok_or_else(|| PolicyTableError::UnknownRole {
        context: context.to_owned(),
        role: name.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// PolicyTable
// ---------------------------------------------------------------------------

/// A validated, compiled rule table. Immutable once built.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    privileged: RoleSet,
    rules: Vec<FieldRule>,
    consent_gates: Vec<ConsentGate>,
    tree: RuleTree,
}

impl PolicyTable {
    /// Returns the built-in table, parsed on first use.
    pub fn builtin() -> &'static PolicyTable {
        &BUILTIN
    }

    /// Parses and validates a table from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyTableError> {
        let doc: PolicyDocument = serde_json::from_str(json)?;
        Self::from_document(&doc)
    }

    /// Validates a parsed document and compiles it.
    pub fn from_document(doc: &PolicyDocument) -> Result<Self, PolicyTableError> {
        if doc.version != SUPPORTED_VERSION {
            return Err(PolicyTableError::UnsupportedVersion(doc.version.clone()));
        }

        let privileged = doc
            .privileged_roles
            .iter()
            .map(|name| parse_role(name, "privileged_roles"))
            .collect::<Result<RoleSet, _>>()?;

        let mut rules = Vec::with_capacity(doc.rules.len());
        for (path, roles) in &doc.rules {
            let path = FieldPath::try_from(path.as_str())?;
            let context = format!("rule \"{path}\"");
            let allowed = roles
                .iter()
                .map(|name| parse_role(name, &context))
                .collect::<Result<RoleSet, _>>()?;
            rules.push(FieldRule { path, allowed });
        }

        let mut consent_gates = Vec::with_capacity(doc.consent_gates.len());
        for gate in &doc.consent_gates {
            let role = parse_role(&gate.role, "consent_gates")?;
            consent_gates.push(ConsentGate {
                role,
                category: gate.category.clone(),
                section: gate.section.clone(),
            });
        }

        Self::from_parts(privileged, rules, consent_gates)
    }

    /// Builds a table from already-typed parts.
    ///
    /// Rejects rules on reserved keys, duplicate paths, and consent gates that
    /// do not name a single top-level section.
    pub fn from_parts(
        privileged: RoleSet,
        mut rules: Vec<FieldRule>,
        consent_gates: Vec<ConsentGate>,
    ) -> Result<Self, PolicyTableError> {
        rules.sort_by(|a, b| a.path.cmp(&b.path));
        let duplicate = rules.windows(2).find_map(|pair| match pair {
            [a, b] if a.path == b.path => Some(a.path.to_string()),
            _ => None,
        });
        if let Some(path) = duplicate {
            return Err(PolicyTableError::DuplicatePath(path));
        }
        for rule in &rules {
            if RESERVED_KEYS.contains(&rule.path.section()) {
                return Err(PolicyTableError::ReservedPath(rule.path.to_string()));
            }
        }

        for gate in &consent_gates {
            let section = FieldPath::try_from(gate.section.as_str())?;
            if section.depth() != 1 {
                return Err(PolicyTableError::InvalidConsentGate(format!(
                    "section {:?} must be a single top-level key",
                    gate.section
                )));
            }
            if RESERVED_KEYS.contains(&section.section()) {
                return Err(PolicyTableError::ReservedPath(gate.section.clone()));
            }
            if gate.category.trim().is_empty() {
                return Err(PolicyTableError::InvalidConsentGate(format!(
                    "gate on {:?} has an empty category",
                    gate.section
                )));
            }
        }

        let tree = RuleTree::build(&rules);
        debug!(
            rules = rules.len(),
            consent_gates = consent_gates.len(),
            privileged = privileged.len(),
            "compiled rule table"
        );

        Ok(Self {
            privileged,
            rules,
            consent_gates,
            tree,
        })
    }

    /// Returns `true` if `role` passes the record-level privacy gate.
    pub fn is_privileged(&self, role: &Role) -> bool {
        self.privileged.permits(role)
    }

    /// Returns the privileged roles.
    pub fn privileged_roles(&self) -> &RoleSet {
        &self.privileged
    }

    /// Returns the rule addressing exactly `path`, if any.
    pub fn rule_for(&self, path: &str) -> Option<&FieldRule> {
        self.rules
            .binary_search_by(|r| (*r.path).cmp(path))
            .ok()
            .and_then(|i| self.rules.get(i))
    }

    /// Returns every rule, sorted by path.
    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Returns every consent gate, in document order.
    pub fn consent_gates(&self) -> &[ConsentGate] {
        &self.consent_gates
    }

    /// Returns `true` if `role` may see `path` according to the table alone.
    ///
    /// A path is visible unless it, or one of its ancestors, has a rule that
    /// does not list the role. Unruled paths are visible (default-allow).
    pub fn allows(&self, role: &Role, path: &FieldPath) -> bool {
        self.tree.allows(role, path)
    }

    pub(crate) fn tree(&self) -> &RuleTree {
        &self.tree
    }

    /// Converts the table back into its wire form.
    pub fn to_document(&self) -> PolicyDocument {
        let names = |set: &RoleSet| -> Vec<String> {
            set.iter().map(|r| r.as_str().to_owned()).collect()
        };
        PolicyDocument {
            version: SUPPORTED_VERSION.to_owned(),
            privileged_roles: names(&self.privileged),
            rules: self
                .rules
                .iter()
                .map(|r| (r.path.to_string(), names(&r.allowed)))
                .collect(),
            consent_gates: self
                .consent_gates
                .iter()
                .map(|g| ConsentGateDocument {
                    role: g.role.as_str().to_owned(),
                    category: g.category.clone(),
                    section: g.section.clone(),
                })
                .collect(),
        }
    }
}
