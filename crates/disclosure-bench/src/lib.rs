//! Synthetic cohort and report generator for benchmarking `disclosure-core`.
//!
//! Generation is deterministic for a given seed, so benchmark inputs are
//! identical across runs and machines.

pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, Subject, generate_cohort, generate_report};
