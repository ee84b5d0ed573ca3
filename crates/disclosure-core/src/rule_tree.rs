/// Path trie compiled from the rule table.
///
/// The field evaluator walks a record and this trie in lockstep: a map key
/// with no trie node is copied through untouched, a key whose node carries a
/// role set is checked, and a key whose node only has children is descended
/// into. Cost is proportional to the retained data plus the number of rules.
use std::collections::BTreeMap;

use crate::enums::Role;
use crate::newtypes::FieldPath;
use crate::policy::{FieldRule, RoleSet};

/// One node of the trie, keyed by path segment in its parent.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleNode {
    /// Roles permitted at this exact path, if a rule addresses it.
    pub(crate) allowed: Option<RoleSet>,
    /// Rules addressing deeper paths.
    pub(crate) children: BTreeMap<String, RuleNode>,
}

impl RuleNode {
    /// Returns `true` if a rule at this node exists and does not list `role`.
    pub(crate) fn denies(&self, role: &Role) -> bool {
        self.allowed.as_ref().is_some_and(|set| !set.permits(role))
    }
}

/// Root of the trie: the top-level section names that carry rules.
#[derive(Debug, Clone, Default)]
pub(crate) struct RuleTree {
    root: BTreeMap<String, RuleNode>,
}

impl RuleTree {
    /// Builds the trie. Paths are assumed unique.
    pub(crate) fn build(rules: &[FieldRule]) -> Self {
        let mut root: BTreeMap<String, RuleNode> = BTreeMap::new();
        for rule in rules {
            let mut level = &mut root;
            let mut segments = rule.path.segments().peekable();
            while let Some(segment) = segments.next() {
                let node = level.entry(segment.to_owned()).or_default();
                if segments.peek().is_none() {
                    node.allowed = Some(rule.allowed.clone());
                }
                level = &mut node.children;
            }
        }
        Self { root }
    }

    /// Returns the top-level nodes.
    pub(crate) fn roots(&self) -> &BTreeMap<String, RuleNode> {
        &self.root
    }

    /// Returns `true` unless `path` or one of its ancestors denies `role`.
    pub(crate) fn allows(&self, role: &Role, path: &FieldPath) -> bool {
        let mut level = &self.root;
        for segment in path.segments() {
            match level.get(segment) {
                Some(node) if node.denies(role) => return false,
                Some(node) => level = &node.children,
                None => return true,
            }
        }
        true
    }
}
