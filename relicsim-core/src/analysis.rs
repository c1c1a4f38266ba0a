//! Batch pipeline: parse, interpolate, cut off, build the gain curve.
use serde::Serialize;
use thiserror::Error;

use crate::catalog::TraitCatalog;
use crate::config::{AnalysisConfig, ConfigError};
use crate::curve::{Curve, CurveSet, GainCurve};
use crate::cutoff::{Cutoff, apply_cutoff, reference_max};
use crate::diagnostics::DiagnosticSink;
use crate::gain::build_gain_curve;
use crate::interpolate::interpolate_steps;
use crate::parser::{MetricSample, ResultBatch, parse_results};
use crate::weights::{WeightEncoder, WeightString};

/// Fatal conditions of the analysis pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("no baseline sample labelled {label:?}")]
    MissingBaseline { label: String },
    #[error("curve {curve:?} has no usable samples")]
    MissingCurve { curve: String },
    #[error("curve {curve:?} has no sampled step at rank {rank}")]
    MissingStep { curve: String, rank: u32 },
    #[error("curve {curve:?} has no sample at rank {rank}")]
    MissingRank { curve: String, rank: u32 },
    #[error(
        "first stepped value {first_step} does not differ from baseline {baseline}; weights cannot be normalized"
    )]
    DegenerateNormalization { baseline: f64, first_step: f64 },
    #[error("invalid analysis config: {0}")]
    Config(#[from] ConfigError),
}

/// Everything derived from one batch of engine results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchAnalysis {
    pub baseline: f64,
    /// Curves with the stepped curve densified and trimmed.
    pub curves: CurveSet,
    pub cutoff: Cutoff,
    pub gain: GainCurve,
}

/// Runs the pipeline under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> Analyzer<'a> {
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &'a AnalysisConfig {
        self.config
    }

    /// Analyze raw engine samples.
    ///
    /// Unrecognized labels and curves that cannot act as a reference are
    /// reported to `sink` and do not fail the batch.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Config` for an invalid configuration,
    /// `MissingBaseline` when no baseline sample exists, `MissingCurve` when
    /// the stepped curve is absent and `MissingStep` for a gap in it.
    pub fn analyze(
        &self,
        samples: &[MetricSample],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<BatchAnalysis, AnalysisError> {
        self.config.validate()?;
        let label = self.config.baseline_label.as_str();
        let batch = parse_results(samples, label, sink).into_batch(label)?;
        self.analyze_batch(batch, sink)
    }

    /// Run the curve stages on an already parsed batch.
    ///
    /// # Errors
    ///
    /// Same as [`Self::analyze`], minus configuration and baseline checks.
    pub fn analyze_batch(
        &self,
        batch: ResultBatch,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<BatchAnalysis, AnalysisError> {
        let ResultBatch {
            baseline,
            mut curves,
        } = batch;
        let stepped_name = self.config.stepped_curve.as_str();

        interpolate_steps(
            stepped_mut(&mut curves, stepped_name)?,
            stepped_name,
            baseline,
            self.config.step_size,
        )?;

        let reference = reference_max(&curves, stepped_name, self.config.reference_rank, sink);
        let stepped = stepped_mut(&mut curves, stepped_name)?;
        let cutoff = apply_cutoff(stepped, reference);
        let bound_value = stepped.get(cutoff.bound).unwrap_or(reference);
        let gain = build_gain_curve(
            baseline,
            reference.max(bound_value),
            &self.config.percent_grid,
        );

        Ok(BatchAnalysis {
            baseline,
            curves,
            cutoff,
            gain,
        })
    }

    /// Weight string of an analyzed batch for the weapon `item_id`.
    ///
    /// # Errors
    ///
    /// See [`WeightEncoder::encode`].
    pub fn encode_weights(
        &self,
        analysis: &BatchAnalysis,
        catalog: &TraitCatalog,
        item_id: u64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<WeightString, AnalysisError> {
        WeightEncoder::new(self.config, catalog).encode(
            &analysis.curves,
            analysis.baseline,
            item_id,
            sink,
        )
    }
}

fn stepped_mut<'c>(curves: &'c mut CurveSet, name: &str) -> Result<&'c mut Curve, AnalysisError> {
    curves
        .get_mut(name)
        .filter(|curve| !curve.is_empty())
        .ok_or_else(|| AnalysisError::MissingCurve {
            curve: name.to_string(),
        })
}
