//! Subject record and report generator.
//!
//! Produces valid [`SubjectRecord`](disclosure_core::SubjectRecord)s with
//! every ruled section populated at a configurable density, plus report
//! documents with internal-only sections, inline internal spans and
//! name/date mentions for the section evaluator.

pub mod records;
pub mod sections;

use disclosure_core::{ConsentRecord, Section, SubjectRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Configuration for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of subject records in a cohort.
    pub num_records: usize,
    /// Maximum discipline entries per record.
    pub max_discipline_entries: usize,
    /// Maximum placements in a care history.
    pub max_placements: usize,
    /// Fraction of records marked `restricted` (0.0-1.0).
    pub restricted_fraction: f64,
    /// Fraction of leaves wrapped in provenance envelopes (0.0-1.0).
    pub envelope_fraction: f64,
    /// Fraction of records with a granted `education_share` consent.
    pub consent_fraction: f64,
    /// Number of sections in a generated report.
    pub num_sections: usize,
    /// Sentences per report section.
    pub sentences_per_section: usize,
    /// Fraction of sections flagged `internalOnly`.
    pub internal_fraction: f64,
    /// Fraction of sentences wrapped in an internal span.
    pub span_fraction: f64,
    /// Fraction of sentences mentioning a titled name or a numeric date.
    pub pii_fraction: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 10 records, 5 report sections.
    Small,
    /// 200 records, 40 report sections.
    Medium,
    /// 2000 records, 300 report sections.
    Large,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_records: 10,
                max_discipline_entries: 2,
                max_placements: 2,
                restricted_fraction: 0.1,
                envelope_fraction: 0.8,
                consent_fraction: 0.5,
                num_sections: 5,
                sentences_per_section: 4,
                internal_fraction: 0.2,
                span_fraction: 0.1,
                pii_fraction: 0.3,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_records: 200,
                max_discipline_entries: 5,
                max_placements: 4,
                restricted_fraction: 0.1,
                envelope_fraction: 0.8,
                consent_fraction: 0.5,
                num_sections: 40,
                sentences_per_section: 8,
                internal_fraction: 0.15,
                span_fraction: 0.1,
                pii_fraction: 0.3,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_records: 2000,
                max_discipline_entries: 10,
                max_placements: 6,
                restricted_fraction: 0.05,
                envelope_fraction: 0.9,
                consent_fraction: 0.5,
                num_sections: 300,
                sentences_per_section: 12,
                internal_fraction: 0.1,
                span_fraction: 0.15,
                pii_fraction: 0.4,
            },
        }
    }
}

/// One generated subject: a record and its consent ledger entries.
#[derive(Debug, Clone)]
pub struct Subject {
    /// The subject record.
    pub record: SubjectRecord,
    /// Consents recorded for this subject.
    pub consents: Vec<ConsentRecord>,
}

/// Generates a cohort of subjects.
pub fn generate_cohort(config: &GeneratorConfig) -> Vec<Subject> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    (0..config.num_records)
        .map(|index| {
            let record = records::gen_record(&mut rng, config, index);
            let consents = records::gen_consents(&mut rng, config, &record.id);
            Subject { record, consents }
        })
        .collect()
}

/// Generates a report document.
pub fn generate_report(config: &GeneratorConfig) -> Vec<Section> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    sections::gen_report(&mut rng, config)
}
