//! Percent-gain reference curve.
use crate::config::PercentGrid;
use crate::curve::GainCurve;
use crate::numbers::round_to;

/// Absolute DPS for each percent gain over `baseline`, stopping at the first
/// grid point whose value exceeds `max_relevant` (that point included).
#[must_use]
pub fn build_gain_curve(baseline: f64, max_relevant: f64, grid: &PercentGrid) -> GainCurve {
    let mut gain = GainCurve::new();
    for index in 0..grid.len() {
        let percent = grid.point(index);
        let value = round_to(baseline * (1.0 + percent / 100.0), 0);
        gain.push(percent, value);
        if value > max_relevant {
            break;
        }
    }
    gain
}
