//! Non-fatal findings raised while a batch is analyzed.
//!
//! The pipeline never logs on its own. Callers hand in a [`DiagnosticSink`]
//! and decide where findings go: the CLI forwards them to the `log` facade,
//! tests collect them into a `Vec<Diagnostic>`.
use std::fmt;

/// How loudly a finding should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Warning,
}

/// A data-shape mismatch that was skipped instead of aborting the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Label that is neither the baseline nor `<curve>_<rank>`.
    UnrecognizedLabel { label: String },
    /// Baseline label seen again after it was already established.
    DuplicateBaseline { kept: f64, ignored: f64 },
    /// Curve without enough ranks to take part in the cutoff reference.
    MissingReferenceRank { curve: String, position: u32 },
    /// Curve with no trait descriptor, left out of the weight string.
    UnknownTrait { curve: String },
    /// Simple trait curve without a rank-1 sample.
    MissingSimpleRank { curve: String },
}

impl Diagnostic {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnrecognizedLabel { .. } | Self::MissingReferenceRank { .. } => Severity::Debug,
            Self::DuplicateBaseline { .. }
            | Self::UnknownTrait { .. }
            | Self::MissingSimpleRank { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedLabel { label } => {
                write!(f, "ignoring unrecognized result label {label:?}")
            }
            Self::DuplicateBaseline { kept, ignored } => write!(
                f,
                "baseline reported twice; keeping {kept} and ignoring {ignored}"
            ),
            Self::MissingReferenceRank { curve, position } => write!(
                f,
                "curve {curve} has fewer than {position} ranks; left out of the cutoff reference"
            ),
            Self::UnknownTrait { curve } => write!(
                f,
                "no spell id for trait {curve} found; ignoring in weight string"
            ),
            Self::MissingSimpleRank { curve } => write!(
                f,
                "trait {curve} has no rank 1 result; ignoring in weight string"
            ),
        }
    }
}

/// Receiver for non-fatal findings.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_split_noise_from_warnings() {
        let noise = Diagnostic::UnrecognizedLabel {
            label: "Raid Events".to_string(),
        };
        let warning = Diagnostic::UnknownTrait {
            curve: "Shadowy Trait".to_string(),
        };
        assert_eq!(noise.severity(), Severity::Debug);
        assert_eq!(warning.severity(), Severity::Warning);
        assert!(warning.to_string().contains("Shadowy Trait"));
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.report(Diagnostic::UnknownTrait {
            curve: "a".to_string(),
        });
        sink.report(Diagnostic::MissingSimpleRank {
            curve: "b".to_string(),
        });
        assert_eq!(sink.len(), 2);
        assert!(matches!(sink[0], Diagnostic::UnknownTrait { .. }));
    }
}
