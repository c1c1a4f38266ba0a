//! Weight string consumed by the in-game crucible weight addon.
//!
//! Every trait's marginal DPS is expressed in units of "one weapon item
//! level", i.e. divided by the first interpolated stepped increment.
//!
//! Format: `cruweight^<itemId>^ilvl^1^` then, per rank-keyed trait,
//! `<spellId>^<rank>:<weight> <rank>:<weight>...^`, per simple trait
//! `<spellId>^<weight>^`, and finally `end`.
use serde::Serialize;
use std::fmt;

use crate::analysis::AnalysisError;
use crate::catalog::{TraitCatalog, TraitKind};
use crate::config::AnalysisConfig;
use crate::constants::{
    WEIGHT_DECIMALS, WEIGHT_DELIMITER, WEIGHT_ITEM_LEVEL_TOKEN, WEIGHT_ITEM_LEVEL_UNIT,
    WEIGHT_PREFIX, WEIGHT_RANK_SEPARATOR, WEIGHT_TERMINATOR,
};
use crate::curve::{Curve, CurveSet};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::numbers::{format_decimal, round_to};

/// Serialized weights, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WeightString(String);

impl WeightString {
    fn from_tokens(tokens: &[String]) -> Self {
        Self(tokens.join(WEIGHT_DELIMITER))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tokens between delimiters, terminator included.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(WEIGHT_DELIMITER)
    }
}

impl fmt::Display for WeightString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes the curves of one batch against a trait catalog.
pub struct WeightEncoder<'a> {
    config: &'a AnalysisConfig,
    catalog: &'a TraitCatalog,
}

impl<'a> WeightEncoder<'a> {
    #[must_use]
    pub const fn new(config: &'a AnalysisConfig, catalog: &'a TraitCatalog) -> Self {
        Self { config, catalog }
    }

    /// DPS gained by the first stepped rank over the baseline.
    ///
    /// # Errors
    ///
    /// Fails when the stepped curve or its first rank is missing, or when the
    /// increment is zero or not finite.
    pub fn unit_increment(&self, curves: &CurveSet, baseline: f64) -> Result<f64, AnalysisError> {
        let stepped_name = self.config.stepped_curve.as_str();
        let stepped = curves
            .get(stepped_name)
            .ok_or_else(|| AnalysisError::MissingCurve {
                curve: stepped_name.to_string(),
            })?;
        let first_step = stepped.get(1).ok_or_else(|| AnalysisError::MissingRank {
            curve: stepped_name.to_string(),
            rank: 1,
        })?;
        let unit = first_step - baseline;
        if unit == 0.0 || !unit.is_finite() {
            return Err(AnalysisError::DegenerateNormalization {
                baseline,
                first_step,
            });
        }
        Ok(unit)
    }

    /// Build the weight string for the weapon `item_id`.
    ///
    /// Curves without a trait descriptor are reported to `sink` and skipped.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::unit_increment`] failures and
    /// `AnalysisError::MissingRank` for a rank-keyed curve with a gap.
    pub fn encode(
        &self,
        curves: &CurveSet,
        baseline: f64,
        item_id: u64,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<WeightString, AnalysisError> {
        let unit = self.unit_increment(curves, baseline)?;
        let mut tokens = vec![
            WEIGHT_PREFIX.to_string(),
            item_id.to_string(),
            WEIGHT_ITEM_LEVEL_TOKEN.to_string(),
            WEIGHT_ITEM_LEVEL_UNIT.to_string(),
        ];

        let excluded = [
            self.config.stepped_curve.as_str(),
            self.config.gain_curve.as_str(),
        ];
        for (name, curve) in curves.iter_except(&excluded) {
            match self.catalog.lookup(name) {
                Some(TraitKind::Primary(descriptor)) => {
                    tokens.push(descriptor.spell_id.to_string());
                    tokens.push(self.rank_weights(name, curve, baseline, unit)?);
                }
                Some(TraitKind::Simple(descriptor)) => {
                    let Some(value) = curve.get(1) else {
                        sink.report(Diagnostic::MissingSimpleRank {
                            curve: name.clone(),
                        });
                        continue;
                    };
                    tokens.push(descriptor.spell_id.to_string());
                    tokens.push(format_weight((value - baseline) / unit));
                }
                None => sink.report(Diagnostic::UnknownTrait {
                    curve: name.clone(),
                }),
            }
        }

        tokens.push(WEIGHT_TERMINATOR.to_string());
        Ok(WeightString::from_tokens(&tokens))
    }

    fn rank_weights(
        &self,
        name: &str,
        curve: &Curve,
        baseline: f64,
        unit: f64,
    ) -> Result<String, AnalysisError> {
        let min_rank = curve.min_rank();
        let mut pairs = Vec::with_capacity(curve.len());
        for (rank, value) in curve.iter() {
            let prev = if rank == 1 || Some(rank) == min_rank {
                baseline
            } else {
                curve
                    .get(rank - 1)
                    .ok_or_else(|| AnalysisError::MissingRank {
                        curve: name.to_string(),
                        rank: rank - 1,
                    })?
            };
            let external_rank = rank.saturating_add(self.config.rank_offset);
            pairs.push(format!(
                "{external_rank}:{}",
                format_weight((value - prev) / unit)
            ));
        }
        Ok(pairs.join(WEIGHT_RANK_SEPARATOR))
    }
}

fn format_weight(weight: f64) -> String {
    format_decimal(round_to(weight, WEIGHT_DECIMALS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TraitDescriptor;

    fn catalog() -> TraitCatalog {
        TraitCatalog {
            primary: vec![
                TraitDescriptor::new("Fortune's Strike", 210_615),
                TraitDescriptor::new("Shadow Wave", 210_620),
            ],
            simple: vec![TraitDescriptor::new("Light Speed", 252_088)],
        }
    }

    fn curves() -> CurveSet {
        let mut set = CurveSet::new();
        set.insert(
            "Weapon Item Level",
            (1..=10).map(|r| (r, 1000.0 + f64::from(r) * 10.0)).collect(),
        );
        set.insert(
            "Fortune's Strike",
            [(1, 1020.0), (2, 1035.0), (3, 1045.0)].into_iter().collect(),
        );
        set.insert("Light Speed", [(1, 1005.0), (2, 1010.0)].into_iter().collect());
        set
    }

    #[test]
    fn encodes_rank_and_simple_traits() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let encoder = WeightEncoder::new(&config, &catalog);
        let weights = encoder
            .encode(&curves(), 1000.0, 128_860, &mut Vec::new())
            .unwrap();
        assert_eq!(
            weights.as_str(),
            "cruweight^128860^ilvl^1^210615^5:2.0 6:1.5 7:1.0^252088^0.5^end"
        );
    }

    #[test]
    fn unknown_curves_are_skipped_with_a_warning() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let mut set = curves();
        set.insert("Mystery", [(1, 1100.0)].into_iter().collect());
        let mut sink = Vec::new();
        let weights = WeightEncoder::new(&config, &catalog)
            .encode(&set, 1000.0, 1, &mut sink)
            .unwrap();
        assert!(!weights.as_str().contains("1100"));
        assert_eq!(
            sink,
            vec![Diagnostic::UnknownTrait {
                curve: "Mystery".to_string()
            }]
        );
    }

    #[test]
    fn baseline_equal_rank_one_weighs_exactly_zero() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let mut set = curves();
        set.insert(
            "Shadow Wave",
            [(1, 1000.0), (2, 1010.0)].into_iter().collect(),
        );
        let weights = WeightEncoder::new(&config, &catalog)
            .encode(&set, 1000.0, 1, &mut Vec::new())
            .unwrap();
        assert!(weights.as_str().contains("^210620^5:0.0 6:1.0^"));
    }

    #[test]
    fn minimum_rank_is_measured_from_baseline() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let mut set = curves();
        set.insert(
            "Shadow Wave",
            [(5, 1080.0), (6, 1090.0), (7, 1095.0)].into_iter().collect(),
        );
        let weights = WeightEncoder::new(&config, &catalog)
            .encode(&set, 1000.0, 1, &mut Vec::new())
            .unwrap();
        assert!(weights.as_str().contains("^210620^9:8.0 10:1.0 11:0.5^"));
    }

    #[test]
    fn zero_denominator_is_detected() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let mut set = curves();
        set.insert("Weapon Item Level", [(1, 1000.0)].into_iter().collect());
        let err = WeightEncoder::new(&config, &catalog)
            .encode(&set, 1000.0, 1, &mut Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::DegenerateNormalization {
                baseline: 1000.0,
                first_step: 1000.0
            }
        );
    }

    #[test]
    fn gaps_in_rank_curves_are_errors() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let mut set = curves();
        set.insert(
            "Shadow Wave",
            [(1, 1010.0), (3, 1030.0)].into_iter().collect(),
        );
        let err = WeightEncoder::new(&config, &catalog)
            .encode(&set, 1000.0, 1, &mut Vec::new())
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::MissingRank {
                curve: "Shadow Wave".to_string(),
                rank: 2
            }
        );
    }

    #[test]
    fn simple_traits_without_rank_one_are_skipped() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let mut set = curves();
        set.insert("Light Speed", [(2, 1010.0)].into_iter().collect());
        let mut sink = Vec::new();
        let weights = WeightEncoder::new(&config, &catalog)
            .encode(&set, 1000.0, 1, &mut sink)
            .unwrap();
        assert!(!weights.as_str().contains("252088"));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn tokens_end_with_terminator() {
        let config = AnalysisConfig::default();
        let catalog = catalog();
        let weights = WeightEncoder::new(&config, &catalog)
            .encode(&curves(), 1000.0, 7, &mut Vec::new())
            .unwrap();
        assert_eq!(weights.tokens().last(), Some("end"));
        assert_eq!(weights.tokens().next(), Some("cruweight"));
    }
}
