//! Report section builders.

use disclosure_core::{JsonObject, Section, SectionId};
use rand::Rng;
use rand::rngs::StdRng;

use super::GeneratorConfig;

const TITLES: &[&str] = &[
    "Background",
    "Assessment",
    "Observations",
    "Recommendations",
    "Plan",
    "Clinician notes",
];

const PLAIN: &[&str] = &[
    "The pupil engaged well with structured tasks.",
    "Reading age is below the expected range.",
    "Attention was sustained for short periods.",
    "Small-group support is recommended.",
    "Progress will be reviewed next term.",
    "Working memory scores were within the average range.",
];

const HONORIFICS: &[&str] = &["Mr.", "Mrs.", "Ms.", "Dr."];

const SURNAMES: &[&str] = &["Patel", "Brown", "Green", "Okafor", "Murphy"];

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn sentence(rng: &mut StdRng, config: &GeneratorConfig) -> String {
    let text = if rng.gen_bool(config.pii_fraction) {
        let title = pick(rng, HONORIFICS);
        let surname = pick(rng, SURNAMES);
        let day = rng.gen_range(1..=28);
        let month = rng.gen_range(1..=12);
        let year = rng.gen_range(2020..=2025);
        format!("Seen by {title} {surname} on {day}/{month}/{year}.")
    } else {
        pick(rng, PLAIN).to_owned()
    };
    if rng.gen_bool(config.span_fraction) {
        format!("[[internal]]{text}[[/internal]]")
    } else {
        text
    }
}

fn section_id(index: usize) -> SectionId {
    let s = format!("sec-{index:03}");
    SectionId::try_from(s.as_str()).unwrap_or_else(|_| unreachable!())
}

/// Generates a report of `config.num_sections` sections.
pub fn gen_report(rng: &mut StdRng, config: &GeneratorConfig) -> Vec<Section> {
    (0..config.num_sections)
        .map(|index| {
            let content = (0..config.sentences_per_section)
                .map(|_| sentence(rng, config))
                .collect::<Vec<_>>()
                .join(" ");
            let internal_only = rng.gen_bool(config.internal_fraction).then_some(true);
            let mut extra = JsonObject::new();
            extra.insert("order".to_owned(), serde_json::json!(index));
            Section {
                id: section_id(index),
                title: pick(rng, TITLES).to_owned(),
                content,
                internal_only,
                extra,
            }
        })
        .collect()
}
