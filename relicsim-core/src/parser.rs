//! Turns raw engine results into a curve set and a baseline.
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;
use crate::curve::CurveSet;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::label::{SampleLabel, decode_label};

/// One raw measurement: profileset label and its mean DPS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub label: String,
    pub value: f64,
}

impl MetricSample {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Output of [`parse_results`] before the baseline precondition is checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResults {
    pub baseline: Option<f64>,
    pub curves: CurveSet,
}

/// Curve set of one batch with its established baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultBatch {
    pub baseline: f64,
    pub curves: CurveSet,
}

impl ParsedResults {
    /// Require a baseline before any derived computation runs.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::MissingBaseline` when no sample carried the
    /// baseline label.
    pub fn into_batch(self, baseline_label: &str) -> Result<ResultBatch, AnalysisError> {
        let baseline = self.baseline.ok_or_else(|| AnalysisError::MissingBaseline {
            label: baseline_label.to_string(),
        })?;
        Ok(ResultBatch {
            baseline,
            curves: self.curves,
        })
    }
}

/// Sort samples into curves. Unrecognized labels are skipped and a repeated
/// baseline keeps the first value seen.
pub fn parse_results(
    samples: &[MetricSample],
    baseline_label: &str,
    sink: &mut dyn DiagnosticSink,
) -> ParsedResults {
    let mut parsed = ParsedResults::default();
    for sample in samples {
        match decode_label(&sample.label, baseline_label) {
            SampleLabel::Baseline => match parsed.baseline {
                None => parsed.baseline = Some(sample.value),
                Some(kept) if kept.to_bits() != sample.value.to_bits() => {
                    sink.report(Diagnostic::DuplicateBaseline {
                        kept,
                        ignored: sample.value,
                    });
                }
                Some(_) => {}
            },
            SampleLabel::CurveSample { curve, rank } => {
                parsed.curves.entry(curve).insert(rank, sample.value);
            }
            SampleLabel::Unrecognized => sink.report(Diagnostic::UnrecognizedLabel {
                label: sample.label.clone(),
            }),
        }
    }
    parsed
}
