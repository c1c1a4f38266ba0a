//! Relicsim analysis engine
//!
//! Platform-agnostic curve derivation for relic simulation batches: result
//! label decoding, stepped curve interpolation, cutoff selection, percent-gain
//! reference curves, weight string encoding and weighted table combination.
//! No I/O, no logging; findings are handed to a [`DiagnosticSink`].

pub mod analysis;
pub mod catalog;
pub mod combiner;
pub mod config;
pub mod constants;
pub mod curve;
pub mod cutoff;
pub mod diagnostics;
pub mod gain;
pub mod interpolate;
pub mod label;
pub mod numbers;
pub mod parser;
pub mod profileset;
pub mod weights;

// Re-export commonly used types
pub use analysis::{AnalysisError, Analyzer, BatchAnalysis};
pub use catalog::{
    CatalogError, ItemLevelConfig, RelicList, TraitCatalog, TraitDescriptor, TraitKind,
    tokenize_name, weapon_item_id,
};
pub use combiner::{CombinedTable, CompositeKey, WeightedTable, combine_tables};
pub use config::{AnalysisConfig, ConfigError, PercentGrid};
pub use curve::{Curve, CurveSet, GainCurve, GainPoint};
pub use cutoff::{Cutoff, apply_cutoff, reference_max, select_bound};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use gain::build_gain_curve;
pub use interpolate::interpolate_steps;
pub use label::{SampleLabel, decode_label};
pub use parser::{MetricSample, ParsedResults, ResultBatch, parse_results};
pub use profileset::{BatchTarget, build_profilesets};
pub use weights::{WeightEncoder, WeightString};
