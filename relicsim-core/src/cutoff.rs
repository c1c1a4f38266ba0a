//! Trims stepped samples that carry no decision value.
//!
//! Once the stepped curve reaches the best third-rank value of any other
//! curve, higher item levels only restate that it wins. One extra rank past
//! the crossing is kept for context.
use serde::Serialize;

use crate::curve::{Curve, CurveSet};
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Result of the cutoff selection for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Cutoff {
    /// Highest reference-rank value among the non-stepped curves.
    pub reference_max: f64,
    /// Largest stepped rank kept.
    pub bound: u32,
}

/// Highest value at the `position`-th rank of every curve except `stepped_name`.
///
/// Starts from 0; curves with fewer ranks than `position` are skipped.
pub fn reference_max(
    curves: &CurveSet,
    stepped_name: &str,
    position: u32,
    sink: &mut dyn DiagnosticSink,
) -> f64 {
    let mut max = 0.0_f64;
    for (name, curve) in curves.iter_except(&[stepped_name]) {
        match curve.nth_value(position) {
            Some(value) => max = max.max(value),
            None => sink.report(Diagnostic::MissingReferenceRank {
                curve: name.clone(),
                position,
            }),
        }
    }
    max
}

/// First stepped rank whose value reaches `threshold`, plus one, capped at
/// the number of stepped ranks. Without a crossing the bound is that count.
#[must_use]
pub fn select_bound(stepped: &Curve, threshold: f64) -> u32 {
    let total = u32::try_from(stepped.len()).unwrap_or(u32::MAX);
    stepped
        .iter()
        .find(|&(_, value)| value >= threshold)
        .map_or(total, |(rank, _)| rank.saturating_add(1).min(total))
}

/// Drop every rank above `bound`. Values are never touched.
pub fn trim_to(stepped: &mut Curve, bound: u32) {
    stepped.retain(|rank, _| rank <= bound);
}

/// Select the bound for `stepped` against `reference` and trim to it.
pub fn apply_cutoff(stepped: &mut Curve, reference: f64) -> Cutoff {
    let bound = select_bound(stepped, reference);
    trim_to(stepped, bound);
    Cutoff {
        reference_max: reference,
        bound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(start: f64, increment: f64, len: u32) -> Curve {
        (1..=len)
            .map(|rank| (rank, start + f64::from(rank) * increment))
            .collect()
    }

    fn curve_set() -> CurveSet {
        let mut set = CurveSet::new();
        set.insert("Weapon Item Level", dense(1000.0, 10.0, 20));
        set.insert(
            "Fortune's Strike",
            [(1, 1020.0), (2, 1035.0), (3, 1045.0)].into_iter().collect(),
        );
        set.insert(
            "Shadow Wave",
            [(1, 1030.0), (2, 1050.0), (3, 1072.0)].into_iter().collect(),
        );
        set
    }

    #[test]
    fn reference_ignores_stepped_curve() {
        let set = curve_set();
        let max = reference_max(&set, "Weapon Item Level", 3, &mut Vec::new());
        assert!((max - 1072.0).abs() < f64::EPSILON);
    }

    #[test]
    fn short_curves_are_reported_and_skipped() {
        let mut set = curve_set();
        set.insert("Experimental", [(1, 5000.0)].into_iter().collect());
        let mut sink = Vec::new();
        let max = reference_max(&set, "Weapon Item Level", 3, &mut sink);
        assert!((max - 1072.0).abs() < f64::EPSILON);
        assert_eq!(
            sink,
            vec![Diagnostic::MissingReferenceRank {
                curve: "Experimental".to_string(),
                position: 3
            }]
        );
    }

    #[test]
    fn bound_is_one_past_the_crossing() {
        let mut stepped = dense(1000.0, 10.0, 20);
        let cutoff = apply_cutoff(&mut stepped, 1072.0);
        // rank 8 = 1080 is the first value >= 1072
        assert_eq!(cutoff.bound, 9);
        assert_eq!(stepped.max_rank(), Some(9));
        assert_eq!(stepped.get(9), Some(1090.0));
    }

    #[test]
    fn no_crossing_keeps_everything() {
        let mut stepped = dense(1000.0, 1.0, 10);
        let cutoff = apply_cutoff(&mut stepped, 5000.0);
        assert_eq!(cutoff.bound, 10);
        assert_eq!(stepped.len(), 10);
    }

    #[test]
    fn crossing_on_last_rank_is_capped() {
        let mut stepped = dense(1000.0, 10.0, 5);
        let cutoff = apply_cutoff(&mut stepped, 1050.0);
        assert_eq!(cutoff.bound, 5);
        assert_eq!(stepped.len(), 5);
    }

    #[test]
    fn trimming_is_idempotent() {
        for threshold in [0.0, 1001.0, 1072.0, 1200.0, 9999.0] {
            let mut stepped = dense(1000.0, 10.0, 20);
            let first = apply_cutoff(&mut stepped, threshold);
            let snapshot = stepped.clone();
            let second = apply_cutoff(&mut stepped, threshold);
            assert_eq!(first.bound, second.bound, "threshold {threshold}");
            assert_eq!(stepped, snapshot);
        }
    }
}
