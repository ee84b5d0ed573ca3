/// Section Policy Evaluator: filters report sections for a disclosure level.
///
/// At [`DisclosureLevel::Full`] the input is returned as-is (borrowed). At
/// every other level, each section is handled in order:
///
/// 1. A section flagged `internalOnly: true` is dropped; the remaining
///    sections keep their relative order.
/// 2. Every `[[internal]] ... [[/internal]]` span in `content` is replaced with
///    [`INTERNAL_SPAN_PLACEHOLDER`]. Matching is non-greedy, case-insensitive,
///    and crosses line breaks.
/// 3. At [`DisclosureLevel::Anonymized`] only, the [`PiiRedactor`] rewrites
///    what is left of `content`.
///
/// `id`, `title` and every other section key pass through unchanged.
use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::enums::DisclosureLevel;
use crate::pii::{PatternPiiRedactor, PiiRedactor};
use crate::section::Section;
use crate::trace::SectionDisclosure;

/// Replacement for an inline internal span. Includes the surrounding spaces.
pub const INTERNAL_SPAN_PLACEHOLDER: &str = " [REDACTED SECTION] ";

static INTERNAL_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\[\[internal\]\].*?\[\[/internal\]\]")
        .unwrap_or_else(|_| unreachable!("internal span pattern is a valid regex"))
});

/// Replaces every inline internal span in `text`, borrowing when there is none.
///
/// An opening marker without a closing one is left in place.
pub fn scrub_internal_spans(text: &str) -> Cow<'_, str> {
    INTERNAL_SPAN_RE.replace_all(text, NoExpand(INTERNAL_SPAN_PLACEHOLDER))
}

/// Section evaluator parameterised by its PII strategy.
#[derive(Debug, Clone, Default)]
pub struct SectionPolicy<R = PatternPiiRedactor> {
    redactor: R,
}

impl SectionPolicy {
    /// Creates an evaluator using [`PatternPiiRedactor`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: PiiRedactor> SectionPolicy<R> {
    /// Creates an evaluator using a caller-supplied PII strategy.
    pub fn with_redactor(redactor: R) -> Self {
        Self { redactor }
    }

    /// Filters `sections` for `level`.
    pub fn evaluate<'a>(
        &self,
        sections: &'a [Section],
        level: DisclosureLevel,
    ) -> Cow<'a, [Section]> {
        if level.is_full() {
            return Cow::Borrowed(sections);
        }
        Cow::Owned(self.evaluate_traced(sections, level).sections)
    }

    /// Filters `sections` for `level` and reports which sections were dropped
    /// or rewritten.
    pub fn evaluate_traced(
        &self,
        sections: &[Section],
        level: DisclosureLevel,
    ) -> SectionDisclosure {
        let mut out = SectionDisclosure {
            sections: Vec::with_capacity(sections.len()),
            dropped: Vec::new(),
            rewritten: Vec::new(),
        };

        if level.is_full() {
            out.sections.extend_from_slice(sections);
            return out;
        }

        for section in sections {
            if section.is_internal_only() {
                out.dropped.push(section.id.clone());
                continue;
            }
            let content = self.rewrite(&section.content, level);
            let changed = *content != *section.content;
            if changed {
                out.rewritten.push(section.id.clone());
            }
            out.sections.push(Section {
                id: section.id.clone(),
                title: section.title.clone(),
                content: content.into_owned(),
                internal_only: section.internal_only,
                extra: section.extra.clone(),
            });
        }

        debug!(
            level = %level,
            sections = sections.len(),
            dropped = out.dropped.len(),
            rewritten = out.rewritten.len(),
            "evaluated section policy"
        );
        out
    }

    fn rewrite<'a>(&self, content: &'a str, level: DisclosureLevel) -> Cow<'a, str> {
        let scrubbed = scrub_internal_spans(content);
        if !level.applies(DisclosureLevel::Anonymized) {
            return scrubbed;
        }
        match scrubbed {
            Cow::Borrowed(text) => self.redactor.redact(text),
            Cow::Owned(text) => Cow::Owned(self.redactor.redact(&text).into_owned()),
        }
    }
}

/// Filters `sections` for `level` with the default PII strategy.
pub fn evaluate_section_policy(
    sections: &[Section],
    level: DisclosureLevel,
) -> Cow<'_, [Section]> {
    SectionPolicy::new().evaluate(sections, level)
}
