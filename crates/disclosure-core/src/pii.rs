/// Replaceable PII recognition for free-text section content.
///
/// The default [`PatternPiiRedactor`] is a best-effort heuristic with two
/// literal patterns, applied in order:
///
/// - `(Mr|Mrs|Ms|Dr)\. [A-Z][a-z]+`: an honorific, one space, a capitalised
///   word (`Mr. Smith`, `Dr. Okafor`).
/// - `\d{1,2}/\d{1,2}/\d{2,4}`: a numeric date (`3/11/2024`).
///
/// Neither pattern is anchored to word boundaries. `Dr.  Okafor` (two spaces)
/// or `Dr.\nOkafor` is missed, and the tail of `123/11/2024` is rewritten as a
/// date. Bare names, spelled-out dates, addresses and phone numbers are not
/// recognised at all. Callers with stronger requirements supply their own
/// [`PiiRedactor`].
use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::trace;

/// Placeholder substituted for a recognised personal name.
pub const NAME_PLACEHOLDER: &str = "[NAME]";

/// Placeholder substituted for a recognised date.
pub const DATE_PLACEHOLDER: &str = "[DATE]";

/// A strategy that rewrites personal data out of free text.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait PiiRedactor {
    /// Returns `text` with recognised PII replaced, borrowing when nothing
    /// matched.
    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

impl<F> PiiRedactor for F
where
    F: Fn(&str) -> String,
{
    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Owned(self(text))
    }
}

// ---------------------------------------------------------------------------
// Pattern catalogue
// ---------------------------------------------------------------------------

/// One entry of the default catalogue.
struct PiiPattern {
    /// Short identifier, used in debug logs.
    name: &'static str,
    pattern: &'static str,
    placeholder: &'static str,
}

/// Applied in order: names first, then dates.
static PATTERNS: &[PiiPattern] = &[
    PiiPattern {
        name: "honorific_name",
        pattern: r"(?:Mr|Mrs|Ms|Dr)\. [A-Z][a-z]+",
        placeholder: NAME_PLACEHOLDER,
    },
    PiiPattern {
        name: "numeric_date",
        pattern: r"\d{1,2}/\d{1,2}/\d{2,4}",
        placeholder: DATE_PLACEHOLDER,
    },
];

static COMPILED: LazyLock<Vec<(&'static str, Regex, &'static str)>> = LazyLock::new(|| {
    PATTERNS
        .iter()
        .map(|p| {
            let re = Regex::new(p.pattern)
                .unwrap_or_else(|_| unreachable!("PII pattern {} is a valid regex", p.name));
            (p.name, re, p.placeholder)
        })
        .collect()
});

/// The default regex-based redactor.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternPiiRedactor;

impl PiiRedactor for PatternPiiRedactor {
    fn redact<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(text);
        for (name, re, placeholder) in COMPILED.iter() {
            let replaced = match re.replace_all(&out, NoExpand(*placeholder)) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(s) = replaced {
                trace!(pattern = *name, "PII pattern matched");
                out = Cow::Owned(s);
            }
        }
        out
    }
}
