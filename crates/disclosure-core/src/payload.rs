/// Schema-free section payloads of a subject record.
///
/// Record sections (`identity`, `family`, `careHistory`, ...) are owned by the
/// case-management flows and evolve without this crate being recompiled. The
/// engine therefore holds them as plain JSON values and addresses fields by
/// dotted path, which is what lets a newly sensitive field be protected by a
/// rule-table edit alone.
///
/// Paths reported in traces extend the rule-table syntax with array indices:
/// a key inside the third discipline entry is `discipline[2].reportedBy`.
use serde_json::{Map, Value};

/// A string-keyed JSON object: the section map of a record, an envelope, or
/// the pass-through keys of a typed wrapper.
///
/// `serde_json` keeps object keys sorted, so two evaluations of the same input
/// serialize identically.
pub type JsonObject = Map<String, Value>;

/// Appends `key` to a dotted trace path.
pub(crate) fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Appends an array index to a trace path.
pub(crate) fn join_index(prefix: &str, index: usize) -> String {
    format!("{prefix}[{index}]")
}
