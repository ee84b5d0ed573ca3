/// Report sections: the free-text input of the section policy.
use serde::{Deserialize, Serialize};

use crate::payload::JsonObject;
use crate::newtypes::SectionId;

/// One section of a report document.
///
/// Only `content` is ever rewritten by the engine; `id`, `title` and any other
/// keys pass through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable identifier of the section within its report.
    pub id: SectionId,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Free-text body, possibly containing `[[internal]]...[[/internal]]` spans.
    #[serde(default)]
    pub content: String,
    /// Marks a section meant only for professionals. Absent means `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_only: Option<bool>,
    /// Any other keys (author, ordering hints, ...), carried through.
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Section {
    /// Returns `true` when the section is flagged `internalOnly: true`.
    pub fn is_internal_only(&self) -> bool {
        self.internal_only.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn internal_only_defaults_to_false() {
        let s: Section = serde_json::from_value(json!({
            "id": "s1",
            "title": "Summary",
            "content": "text"
        }))
        .expect("valid section");
        assert!(!s.is_internal_only());
        assert_eq!(s.internal_only, None);
    }

    #[test]
    fn section_round_trips_extra_keys_and_flag() {
        let input = json!({
            "id": "s2",
            "title": "Notes",
            "content": "text",
            "internalOnly": true,
            "author": "u-3"
        });
        let s: Section = serde_json::from_value(input.clone()).expect("valid section");
        assert!(s.is_internal_only());
        assert_eq!(serde_json::to_value(&s).expect("serialize"), input);
    }
}
